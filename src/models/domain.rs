use serde::{Deserialize, Serialize};

/// Preferred sleep schedule
///
/// Labels are matched case-insensitively. Anything else is kept verbatim
/// (trimmed, lowercased) so two different unrecognised answers still differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SleepSchedule {
    Early,
    Late,
    Unknown(String),
}

/// Preferred study time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StudyHabit {
    Morning,
    Night,
    Mix,
    Unknown(String),
}

fn normalize_label(value: &str) -> String {
    value.trim().to_lowercase()
}

impl SleepSchedule {
    pub fn as_str(&self) -> &str {
        match self {
            SleepSchedule::Early => "early",
            SleepSchedule::Late => "late",
            SleepSchedule::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for SleepSchedule {
    fn from(value: &str) -> Self {
        let label = normalize_label(value);
        match label.as_str() {
            "early" => SleepSchedule::Early,
            "late" => SleepSchedule::Late,
            _ => SleepSchedule::Unknown(label),
        }
    }
}

impl From<String> for SleepSchedule {
    fn from(value: String) -> Self {
        SleepSchedule::from(value.as_str())
    }
}

impl From<SleepSchedule> for String {
    fn from(value: SleepSchedule) -> Self {
        value.as_str().to_string()
    }
}

impl StudyHabit {
    pub fn as_str(&self) -> &str {
        match self {
            StudyHabit::Morning => "morning",
            StudyHabit::Night => "night",
            StudyHabit::Mix => "mix",
            StudyHabit::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for StudyHabit {
    fn from(value: &str) -> Self {
        let label = normalize_label(value);
        match label.as_str() {
            "morning" => StudyHabit::Morning,
            "night" => StudyHabit::Night,
            "mix" => StudyHabit::Mix,
            _ => StudyHabit::Unknown(label),
        }
    }
}

impl From<String> for StudyHabit {
    fn from(value: String) -> Self {
        StudyHabit::from(value.as_str())
    }
}

impl From<StudyHabit> for String {
    fn from(value: StudyHabit) -> Self {
        value.as_str().to_string()
    }
}

/// Self-reported lifestyle attributes of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "sleepSchedule")]
    pub sleep_schedule: SleepSchedule,
    #[serde(rename = "studyHabit")]
    pub study_habit: StudyHabit,
    /// 1 (relaxed) to 5 (spotless)
    #[serde(rename = "cleanlinessLevel")]
    pub cleanliness_level: u8,
    /// 1 (needs quiet) to 5 (anything goes)
    #[serde(rename = "noiseTolerance")]
    pub noise_tolerance: u8,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
}

impl Profile {
    /// A profile without a phone number cannot be contacted yet
    pub fn is_contactable(&self) -> bool {
        self.phone_number
            .as_deref()
            .map(|phone| !phone.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Scored match shown to the subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "heuristicScore")]
    pub heuristic_score: u8,
    /// `None` when the candidate was outside the scored neighbourhood
    #[serde(rename = "similarityScore")]
    pub similarity_score: Option<u8>,
    #[serde(rename = "combinedScore")]
    pub combined_score: u8,
    #[serde(rename = "sleepSchedule")]
    pub sleep_schedule: SleepSchedule,
    #[serde(rename = "cleanlinessLevel")]
    pub cleanliness_level: u8,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
}

/// Penalties subtracted from a perfect heuristic score of 100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicPenalties {
    pub sleep: u32,
    pub study: u32,
    /// Per level of cleanliness difference
    pub cleanliness_step: u32,
    /// Per level of noise tolerance difference
    pub noise_step: u32,
}

impl Default for HeuristicPenalties {
    fn default() -> Self {
        Self {
            sleep: 25,
            study: 15,
            cleanliness_step: 5,
            noise_step: 5,
        }
    }
}

/// Blend between the rule-based and the population-relative signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub heuristic: f64,
    pub similarity: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            heuristic: 0.6,
            similarity: 0.4,
        }
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringWeights {
    pub heuristic: HeuristicPenalties,
    pub blend: BlendWeights,
}

/// How the neighbour count `k` limits similarity scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborPolicy {
    /// Every candidate receives a similarity score, `k` only bounds the search
    #[default]
    AllCandidates,
    /// Only the `k` nearest candidates are scored
    NearestOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_categories_deserialize() {
        let json = r#"{
            "userId": "u1",
            "displayName": "Sam",
            "sleepSchedule": "whenever",
            "studyHabit": "mix",
            "cleanlinessLevel": 3,
            "noiseTolerance": 2
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.sleep_schedule, SleepSchedule::Unknown("whenever".to_string()));
        assert_eq!(profile.study_habit, StudyHabit::Mix);
        assert_eq!(profile.phone_number, None);
        assert!(!profile.is_contactable());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(SleepSchedule::from(" Late "), SleepSchedule::Late);
        assert_eq!(SleepSchedule::from(" Noon"), SleepSchedule::Unknown("noon".to_string()));
        assert_eq!(StudyHabit::from("MORNING"), StudyHabit::Morning);
        assert_eq!(StudyHabit::from(StudyHabit::Mix.as_str()), StudyHabit::Mix);
    }

    #[test]
    fn test_capitalized_labels_deserialize() {
        let json = r#"{
            "userId": "u2",
            "sleepSchedule": "Late",
            "studyHabit": "Night",
            "cleanlinessLevel": 1,
            "noiseTolerance": 5
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.sleep_schedule, SleepSchedule::Late);
        assert_eq!(profile.study_habit, StudyHabit::Night);
    }

    #[test]
    fn test_unknown_label_serializes_verbatim() {
        let value = serde_json::to_value(SleepSchedule::from("Whenever")).unwrap();
        assert_eq!(value, serde_json::json!("whenever"));
        assert_eq!(serde_json::to_value(StudyHabit::Mix).unwrap(), serde_json::json!("mix"));
    }

    #[test]
    fn test_blank_phone_is_not_contactable() {
        let mut profile = Profile {
            user_id: "u1".to_string(),
            display_name: "Sam".to_string(),
            sleep_schedule: SleepSchedule::Early,
            study_habit: StudyHabit::Morning,
            cleanliness_level: 3,
            noise_tolerance: 3,
            phone_number: Some("   ".to_string()),
        };
        assert!(!profile.is_contactable());

        profile.phone_number = Some("+1 555 0100".to_string());
        assert!(profile.is_contactable());
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.heuristic.sleep, 25);
        assert_eq!(weights.heuristic.study, 15);
        assert_eq!(weights.blend.heuristic, 0.6);
        assert_eq!(weights.blend.similarity, 0.4);
    }
}
