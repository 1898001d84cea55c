use thiserror::Error;

/// Lowest valid value of an ordinal profile field
pub const ORDINAL_MIN: u8 = 1;
/// Highest valid value of an ordinal profile field
pub const ORDINAL_MAX: u8 = 5;

/// Caller contract violations detected before scoring
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Profile {user_id}: {field} must be between 1 and 5, got {value}")]
    InvalidOrdinal {
        user_id: String,
        field: &'static str,
        value: u8,
    },

    #[error("Candidate set contains the subject {0}")]
    SubjectInCandidates(String),
}
