use crate::models::{Profile, MatchResult, ScoringWeights, NeighborPolicy};
use crate::core::{
    error::{MatchError, ORDINAL_MAX, ORDINAL_MIN},
    heuristic::heuristic_score,
    similarity::similarity_by_index,
};

/// Number of matches shown on the dashboard when the caller does not say
pub const DEFAULT_LIMIT: usize = 5;

/// Neighbour count used by the similarity search by default
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Main matching orchestrator - blends, ranks and caps candidate scores
///
/// # Pipeline Stages
/// 1. Input validation (ordinal ranges, subject exclusion)
/// 2. Heuristic scoring per candidate
/// 3. Population-relative similarity over the whole snapshot
/// 4. Weighted blend, stable sort and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    neighbors: usize,
    policy: NeighborPolicy,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, neighbors: usize, policy: NeighborPolicy) -> Self {
        Self {
            weights,
            neighbors,
            policy,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_NEIGHBORS, NeighborPolicy::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank candidates for a subject
    ///
    /// # Arguments
    /// * `subject` - The profile matches are computed for
    /// * `candidates` - Consistent snapshot of every other profile
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// At most `limit` matches ordered by combined score, ties keeping the
    /// snapshot order. Fails without partial output if any profile carries
    /// an out-of-range ordinal or the subject appears among the candidates.
    pub fn rank(
        &self,
        subject: &Profile,
        candidates: &[Profile],
        limit: usize,
    ) -> Result<Vec<MatchResult>, MatchError> {
        validate_profile(subject)?;
        for candidate in candidates {
            validate_profile(candidate)?;
            if candidate.user_id == subject.user_id {
                return Err(MatchError::SubjectInCandidates(subject.user_id.clone()));
            }
        }

        let similarities = similarity_by_index(subject, candidates, self.neighbors, self.policy);

        let mut matches: Vec<MatchResult> = candidates
            .iter()
            .zip(similarities)
            .map(|(candidate, similarity)| {
                let heuristic = heuristic_score(subject, candidate, &self.weights.heuristic);

                MatchResult {
                    target_user_id: candidate.user_id.clone(),
                    display_name: candidate.display_name.clone(),
                    heuristic_score: heuristic,
                    similarity_score: similarity,
                    combined_score: self.combine(heuristic, similarity.unwrap_or(0)),
                    sleep_schedule: candidate.sleep_schedule.clone(),
                    cleanliness_level: candidate.cleanliness_level,
                    phone_number: candidate.phone_number.clone(),
                }
            })
            .collect();

        // sort_by is stable: equal scores keep snapshot order
        matches.sort_by(|a, b| b.combined_score.cmp(&a.combined_score));
        matches.truncate(limit);

        tracing::debug!(
            "Ranked {} candidates for {}, returning {}",
            candidates.len(),
            subject.user_id,
            matches.len()
        );

        Ok(matches)
    }

    /// Weighted blend of the two signals, rounded to an integer score
    #[inline]
    pub fn combine(&self, heuristic: u8, similarity: u8) -> u8 {
        let blend = &self.weights.blend;
        let combined = blend.heuristic * heuristic as f64 + blend.similarity * similarity as f64;
        combined.round().clamp(0.0, 100.0) as u8
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn validate_profile(profile: &Profile) -> Result<(), MatchError> {
    let ordinals = [
        ("cleanliness_level", profile.cleanliness_level),
        ("noise_tolerance", profile.noise_tolerance),
    ];

    for (field, value) in ordinals {
        if !(ORDINAL_MIN..=ORDINAL_MAX).contains(&value) {
            return Err(MatchError::InvalidOrdinal {
                user_id: profile.user_id.clone(),
                field,
                value,
            });
        }
    }

    Ok(())
}
