use crate::models::{Profile, SleepSchedule, StudyHabit};

/// Number of dimensions in a feature vector
pub const FEATURE_DIMENSIONS: usize = 4;

/// Neutral midpoint for categorical values outside the known set
const NEUTRAL: f64 = 0.5;

/// Numeric view of a profile: `[sleep, cleanliness, noise, study]`
///
/// Vectors only live for one ranking call; the population they are
/// normalized against can change between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_DIMENSIONS]);

impl FeatureVector {
    #[inline]
    pub fn euclidean_distance(&self, other: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// Map a profile to its feature vector
#[inline]
pub fn extract(profile: &Profile) -> FeatureVector {
    let sleep = match profile.sleep_schedule {
        SleepSchedule::Early => 0.0,
        SleepSchedule::Late => 1.0,
        SleepSchedule::Unknown(_) => NEUTRAL,
    };

    let study = match profile.study_habit {
        StudyHabit::Morning => 0.0,
        StudyHabit::Night => 1.0,
        StudyHabit::Mix | StudyHabit::Unknown(_) => NEUTRAL,
    };

    FeatureVector([
        sleep,
        profile.cleanliness_level as f64,
        profile.noise_tolerance as f64,
        study,
    ])
}
