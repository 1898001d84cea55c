//! Roomie Algo - Roommate compatibility matching service
//!
//! This library provides the match-scoring engine: a rule-based heuristic
//! blended with a population-relative nearest-neighbour similarity, ranked
//! and capped per subject. Persistence and profile loading sit behind the
//! [`MatchRecorder`] and [`ProfileSource`] traits.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, MatchRecorder, ProfileSource, heuristic_score, similarity_scores};
pub use models::{Profile, SleepSchedule, StudyHabit, MatchResult, ScoringWeights, NeighborPolicy, RankRequest, RankResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.weights(), &ScoringWeights::default());
    }
}
