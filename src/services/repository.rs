use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{CandidateProfile, SkillSet};

/// Errors that can occur when reading or writing candidate profiles
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Read/write contract for candidate skill profiles
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Candidates sharing at least one skill with `required`, in repository
    /// order (insertion order). An empty `required` returns nothing.
    async fn find_by_skill_overlap(
        &self,
        required: &SkillSet,
    ) -> Result<Vec<CandidateProfile>, RepositoryError>;

    /// Insert a profile, or replace the one with the same email. A replaced
    /// profile keeps its position in repository order.
    async fn upsert(&self, profile: CandidateProfile) -> Result<(), RepositoryError>;

    async fn get(&self, email: &str) -> Result<CandidateProfile, RepositoryError>;

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        Ok(true)
    }
}

/// In-process repository, used for tests and the keyword-only dev setup
#[derive(Debug, Default)]
pub struct InMemoryCandidateRepository {
    profiles: RwLock<Vec<CandidateProfile>>,
}

impl InMemoryCandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<CandidateProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

#[async_trait]
impl CandidateRepository for InMemoryCandidateRepository {
    async fn find_by_skill_overlap(
        &self,
        required: &SkillSet,
    ) -> Result<Vec<CandidateProfile>, RepositoryError> {
        if required.is_empty() {
            return Ok(Vec::new());
        }
        let profiles = self.profiles.read().await;
        Ok(profiles
            .iter()
            .filter(|p| p.skills.overlaps(required))
            .cloned()
            .collect())
    }

    async fn upsert(&self, mut profile: CandidateProfile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.email == profile.email) {
            Some(existing) => {
                profile.created_at = existing.created_at;
                *existing = profile;
            }
            None => {
                profile.created_at.get_or_insert_with(chrono::Utc::now);
                profiles.push(profile);
            }
        }
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<CandidateProfile, RepositoryError> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|p| p.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Candidate not found: {}", email)))
    }
}
