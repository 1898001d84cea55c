use std::collections::HashMap;

use crate::core::features::{extract, FeatureVector, FEATURE_DIMENSIONS};
use crate::models::{NeighborPolicy, Profile};

/// Keeps the normalization finite when every candidate coincides with the subject
pub const SIMILARITY_EPSILON: f64 = 1e-6;

/// Standardize each feature column in place (z-scores)
///
/// Uses the sample standard deviation over every row. A column without
/// variance, or a matrix with fewer than two rows, becomes all zeros.
pub fn standardize(rows: &mut [FeatureVector]) {
    let n = rows.len();
    if n == 0 {
        return;
    }

    for dim in 0..FEATURE_DIMENSIONS {
        let first = rows[0].0[dim];
        if n < 2 || rows.iter().all(|row| row.0[dim] == first) {
            rows.iter_mut().for_each(|row| row.0[dim] = 0.0);
            continue;
        }

        let mean = rows.iter().map(|row| row.0[dim]).sum::<f64>() / n as f64;
        let variance = rows
            .iter()
            .map(|row| (row.0[dim] - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        let std_dev = variance.sqrt();

        for row in rows.iter_mut() {
            row.0[dim] = (row.0[dim] - mean) / std_dev;
        }
    }
}

/// Population-relative similarity (0-100) of every candidate to the subject
///
/// Keyed by candidate `user_id`. Scores are relative to the farthest
/// candidate in this pool, so they move whenever the pool changes.
pub fn similarity_scores(
    subject: &Profile,
    candidates: &[Profile],
    k: usize,
    policy: NeighborPolicy,
) -> HashMap<String, u8> {
    similarity_by_index(subject, candidates, k, policy)
        .into_iter()
        .zip(candidates)
        .filter_map(|(score, candidate)| score.map(|s| (candidate.user_id.clone(), s)))
        .collect()
}

/// Same as [`similarity_scores`], aligned with `candidates` by position
///
/// `None` marks a candidate that received no score.
pub(crate) fn similarity_by_index(
    subject: &Profile,
    candidates: &[Profile],
    k: usize,
    policy: NeighborPolicy,
) -> Vec<Option<u8>> {
    let mut scores = vec![None; candidates.len()];
    let neighbors = k.min(candidates.len());
    if neighbors == 0 {
        return scores;
    }

    // Subject goes last so its row index is stable
    let mut matrix: Vec<FeatureVector> = candidates.iter().map(extract).collect();
    matrix.push(extract(subject));
    standardize(&mut matrix);

    let (subject_row, candidate_rows) = match matrix.split_last() {
        Some(split) => split,
        None => return scores,
    };

    let distances: Vec<f64> = candidate_rows
        .iter()
        .map(|row| subject_row.euclidean_distance(row))
        .collect();

    let max_distance = distances.iter().copied().fold(0.0_f64, f64::max);

    let scored: Vec<usize> = match policy {
        NeighborPolicy::AllCandidates => (0..distances.len()).collect(),
        NeighborPolicy::NearestOnly => {
            // Stable: equidistant candidates are admitted in snapshot order
            let mut order: Vec<usize> = (0..distances.len()).collect();
            order.sort_by(|&a, &b| {
                distances[a]
                    .partial_cmp(&distances[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            order.truncate(neighbors);
            order
        }
    };

    for idx in scored {
        scores[idx] = Some(normalize_distance(distances[idx], max_distance));
    }

    scores
}

#[inline]
fn normalize_distance(distance: f64, max_distance: f64) -> u8 {
    let similarity = (1.0 - distance / (max_distance + SIMILARITY_EPSILON)) * 100.0;
    similarity.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SleepSchedule, StudyHabit};

    fn create_profile(id: &str, sleep: SleepSchedule, cleanliness: u8, noise: u8) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: format!("User {}", id),
            sleep_schedule: sleep,
            study_habit: StudyHabit::Morning,
            cleanliness_level: cleanliness,
            noise_tolerance: noise,
            phone_number: None,
        }
    }

    #[test]
    fn test_standardize_columns() {
        let mut rows = vec![
            FeatureVector([0.0, 1.0, 3.0, 0.5]),
            FeatureVector([1.0, 3.0, 3.0, 0.5]),
            FeatureVector([0.5, 5.0, 3.0, 0.5]),
        ];
        standardize(&mut rows);

        // Column 1: mean 3, sample std 2
        assert!((rows[0].0[1] + 1.0).abs() < 1e-12);
        assert!(rows[1].0[1].abs() < 1e-12);
        assert!((rows[2].0[1] - 1.0).abs() < 1e-12);

        // Constant columns collapse to zero
        for row in &rows {
            assert_eq!(row.0[2], 0.0);
            assert_eq!(row.0[3], 0.0);
        }
    }

    #[test]
    fn test_empty_candidates() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let scores = similarity_scores(&subject, &[], 5, NeighborPolicy::AllCandidates);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_zero_k_scores_nothing() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let candidates = vec![create_profile("1", SleepSchedule::Late, 2, 4)];
        let scores = similarity_scores(&subject, &candidates, 0, NeighborPolicy::AllCandidates);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_single_candidate_scores_zero() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let candidates = vec![create_profile("1", SleepSchedule::Late, 2, 4)];
        let scores = similarity_scores(&subject, &candidates, 5, NeighborPolicy::AllCandidates);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["1"], 0);
    }

    #[test]
    fn test_coincident_candidate_scores_hundred() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let candidates = vec![create_profile("1", SleepSchedule::Early, 3, 3)];
        let scores = similarity_scores(&subject, &candidates, 5, NeighborPolicy::AllCandidates);
        assert_eq!(scores["1"], 100);
    }

    #[test]
    fn test_nearest_and_farthest() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let candidates = vec![
            create_profile("same", SleepSchedule::Early, 3, 3),
            create_profile("close", SleepSchedule::Early, 4, 3),
            create_profile("far", SleepSchedule::Late, 5, 1),
        ];
        let scores = similarity_scores(&subject, &candidates, 5, NeighborPolicy::AllCandidates);

        assert_eq!(scores.len(), 3);
        assert_eq!(scores["same"], 100);
        assert_eq!(scores["far"], 0);
        assert!(scores["close"] > 0 && scores["close"] < 100);
    }

    #[test]
    fn test_k_does_not_limit_by_default() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let candidates = vec![
            create_profile("1", SleepSchedule::Early, 3, 3),
            create_profile("2", SleepSchedule::Early, 4, 3),
            create_profile("3", SleepSchedule::Late, 5, 1),
        ];
        let scores = similarity_scores(&subject, &candidates, 1, NeighborPolicy::AllCandidates);
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn test_nearest_only_policy() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let candidates = vec![
            create_profile("far", SleepSchedule::Late, 5, 1),
            create_profile("same", SleepSchedule::Early, 3, 3),
            create_profile("close", SleepSchedule::Early, 4, 3),
        ];
        let scores = similarity_by_index(&subject, &candidates, 2, NeighborPolicy::NearestOnly);

        assert_eq!(scores[0], None);
        assert_eq!(scores[1], Some(100));
        assert!(scores[2].is_some());
    }

    #[test]
    fn test_nearest_only_ties_follow_snapshot_order() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let above = create_profile("above", SleepSchedule::Early, 4, 3);
        let below = create_profile("below", SleepSchedule::Early, 2, 3);
        let far = create_profile("far", SleepSchedule::Late, 3, 1);

        let scores = similarity_by_index(
            &subject,
            &[above.clone(), below.clone(), far.clone()],
            1,
            NeighborPolicy::NearestOnly,
        );
        assert!(scores[0].is_some());
        assert_eq!(scores[1], None);
        assert_eq!(scores[2], None);

        let scores = similarity_by_index(&subject, &[below, above, far], 1, NeighborPolicy::NearestOnly);
        assert!(scores[0].is_some());
        assert_eq!(scores[1], None);
        assert_eq!(scores[2], None);

        // Both neighbours admitted once k covers the tie, with equal scores
        let scores = similarity_scores(
            &subject,
            &[
                create_profile("above", SleepSchedule::Early, 4, 3),
                create_profile("below", SleepSchedule::Early, 2, 3),
                create_profile("far", SleepSchedule::Late, 3, 1),
            ],
            2,
            NeighborPolicy::NearestOnly,
        );
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["above"], scores["below"]);
        assert!(scores["above"] > 0);
    }

    #[test]
    fn test_population_shift_changes_scores() {
        let subject = create_profile("me", SleepSchedule::Early, 3, 3);
        let close = create_profile("close", SleepSchedule::Early, 4, 3);
        let far = create_profile("far", SleepSchedule::Late, 5, 1);
        let farther = create_profile("farther", SleepSchedule::Late, 1, 5);

        let before = similarity_scores(
            &subject,
            &[close.clone(), far.clone()],
            5,
            NeighborPolicy::AllCandidates,
        );
        let after = similarity_scores(
            &subject,
            &[close, far, farther],
            5,
            NeighborPolicy::AllCandidates,
        );

        assert_ne!(before["close"], after["close"]);
    }
}
