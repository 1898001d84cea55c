use async_trait::async_trait;
use std::path::Path;
use tokio::sync::RwLock;

use crate::models::Profile;
use crate::services::StoreError;

/// Supplies the subject and a consistent snapshot of candidates
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn subject(&self, user_id: &str) -> Result<Profile, StoreError>;

    /// Every profile except `user_id`, in a stable order
    async fn candidates(&self, user_id: &str) -> Result<Vec<Profile>, StoreError>;
}

/// Process-local profile store, ordered by insertion
#[derive(Debug, Default)]
pub struct InMemoryProfileSource {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileSource {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Load profiles from a JSON array file
    ///
    /// Later entries replace earlier ones with the same id, keeping the
    /// position of the first.
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let profiles: Vec<Profile> = serde_json::from_slice(&raw)?;

        let source = Self::default();
        for profile in profiles {
            source.upsert(profile).await;
        }
        Ok(source)
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Insert a profile, replacing any existing one with the same id in place
    pub async fn upsert(&self, profile: Profile) {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfileSource {
    async fn subject(&self, user_id: &str) -> Result<Profile, StoreError> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    async fn candidates(&self, user_id: &str) -> Result<Vec<Profile>, StoreError> {
        // Cloned under one read guard so the snapshot is consistent
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .filter(|p| p.user_id != user_id)
            .cloned()
            .collect())
    }
}
