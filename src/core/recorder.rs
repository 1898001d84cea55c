use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::MatchResult;
use crate::services::StoreError;

/// Latest combined score shown for one (subject, target) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedMatch {
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    #[serde(rename = "combinedScore")]
    pub combined_score: u8,
    #[serde(rename = "recordedAt")]
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate view over a subject's recorded matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    #[serde(rename = "totalRecorded")]
    pub total_recorded: u64,
    #[serde(rename = "averageScore")]
    pub average_score: Option<f64>,
    #[serde(rename = "topScore")]
    pub top_score: Option<u8>,
    #[serde(rename = "lastRecordedAt")]
    pub last_recorded_at: Option<DateTime<Utc>>,
}

impl MatchStats {
    pub fn from_records(subject_id: &str, records: &[RecordedMatch]) -> Self {
        let total = records.len();
        let average_score = (total > 0).then(|| {
            records.iter().map(|r| r.combined_score as f64).sum::<f64>() / total as f64
        });

        Self {
            subject_id: subject_id.to_string(),
            total_recorded: total as u64,
            average_score,
            top_score: records.iter().map(|r| r.combined_score).max(),
            last_recorded_at: records.iter().map(|r| r.recorded_at).max(),
        }
    }
}

/// Persists the matches shown to a subject
///
/// `record` is an upsert keyed by (subject, target): recording the same pair
/// again replaces its score and timestamp.
#[async_trait]
pub trait MatchRecorder: Send + Sync {
    async fn record(&self, subject_id: &str, matches: &[MatchResult]) -> Result<(), StoreError>;

    /// Recorded pairs for a subject, highest score first
    async fn recorded(&self, subject_id: &str) -> Result<Vec<RecordedMatch>, StoreError>;

    async fn stats(&self, subject_id: &str) -> Result<MatchStats, StoreError> {
        let records = self.recorded(subject_id).await?;
        Ok(MatchStats::from_records(subject_id, &records))
    }
}

/// Process-local recorder used when no database is configured
#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    records: RwLock<HashMap<(String, String), RecordedMatch>>,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRecorder for InMemoryRecorder {
    async fn record(&self, subject_id: &str, matches: &[MatchResult]) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut records = self.records.write().await;

        for m in matches {
            records.insert(
                (subject_id.to_string(), m.target_user_id.clone()),
                RecordedMatch {
                    subject_id: subject_id.to_string(),
                    target_id: m.target_user_id.clone(),
                    combined_score: m.combined_score,
                    recorded_at: now,
                },
            );
        }

        tracing::debug!("Recorded {} shown matches for {}", matches.len(), subject_id);
        Ok(())
    }

    async fn recorded(&self, subject_id: &str) -> Result<Vec<RecordedMatch>, StoreError> {
        let records = self.records.read().await;
        let mut found: Vec<RecordedMatch> = records
            .values()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            b.combined_score
                .cmp(&a.combined_score)
                .then_with(|| a.target_id.cmp(&b.target_id))
        });
        Ok(found)
    }
}
