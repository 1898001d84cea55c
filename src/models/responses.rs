use serde::{Deserialize, Serialize};
use crate::core::recorder::{MatchStats, RecordedMatch};
use crate::models::domain::MatchResult;

/// Response for the ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Recorded matches for one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedMatchesResponse {
    pub matches: Vec<RecordedMatch>,
    pub stats: MatchStats,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
