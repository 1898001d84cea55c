use crate::models::{HeuristicPenalties, Profile};

const PERFECT_SCORE: i64 = 100;

/// Rule-based compatibility score (0-100) between two profiles
///
/// Scoring formula:
/// score = 100
///     - sleep            # sleep schedules differ
///     - study            # study habits differ
///     - cleanliness_step * |cleanliness difference|
///     - noise_step * |noise tolerance difference|
///
/// clamped at 0. Every term is a symmetric difference, so the score does not
/// depend on which profile is the subject.
pub fn heuristic_score(
    subject: &Profile,
    candidate: &Profile,
    penalties: &HeuristicPenalties,
) -> u8 {
    let mut score = PERFECT_SCORE;

    if subject.sleep_schedule != candidate.sleep_schedule {
        score -= penalties.sleep as i64;
    }

    if subject.study_habit != candidate.study_habit {
        score -= penalties.study as i64;
    }

    score -= penalties.cleanliness_step as i64
        * ordinal_gap(subject.cleanliness_level, candidate.cleanliness_level);
    score -= penalties.noise_step as i64
        * ordinal_gap(subject.noise_tolerance, candidate.noise_tolerance);

    score.clamp(0, PERFECT_SCORE) as u8
}

#[inline]
fn ordinal_gap(a: u8, b: u8) -> i64 {
    (a as i64 - b as i64).abs()
}
