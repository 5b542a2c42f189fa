use std::sync::Arc;

use crate::core::{present, EntityExtractor, MatchError, Matcher};
use crate::models::{MatchResponse, SkillSet};
use crate::services::repository::CandidateRepository;

/// Per-request orchestration of a match
///
/// Collaborators are injected once at startup and shared read-only; a
/// request holds no state beyond its own locals.
#[derive(Clone)]
pub struct MatchService {
    extractor: Arc<dyn EntityExtractor>,
    repository: Arc<dyn CandidateRepository>,
    matcher: Matcher,
}

impl MatchService {
    pub fn new(
        extractor: Arc<dyn EntityExtractor>,
        repository: Arc<dyn CandidateRepository>,
        matcher: Matcher,
    ) -> Self {
        Self {
            extractor,
            repository,
            matcher,
        }
    }

    /// Rank stored candidates against a job description
    ///
    /// Extraction or repository failure fails the request; there is no
    /// partial result and no retry.
    pub async fn match_job(&self, job_description: &str) -> Result<MatchResponse, MatchError> {
        let required = self.required_skills(job_description).await?;

        if required.is_empty() {
            tracing::info!("No required skills extracted, returning empty ranking");
            return Ok(present(&required, &Default::default()));
        }

        let candidates = self
            .repository
            .find_by_skill_overlap(&required)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query candidates: {}", e);
                MatchError::RepositoryUnavailable(e.to_string())
            })?;

        tracing::debug!(
            "Found {} candidates overlapping {} required skills",
            candidates.len(),
            required.len()
        );

        let ranking = self.matcher.rank_candidates(&required, &candidates);
        let response = present(&required, &ranking);

        tracing::info!(
            "Returning {} matches for {} required skills (from {} candidates)",
            response.matches.len(),
            required.len(),
            response.total_candidates
        );

        Ok(response)
    }

    /// Required skills for a description, derived fresh on every call
    pub async fn required_skills(&self, job_description: &str) -> Result<SkillSet, MatchError> {
        self.matcher
            .derive_required_skills(self.extractor.as_ref(), job_description)
            .await
    }

    pub async fn repository_healthy(&self) -> bool {
        match self.repository.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Repository health check failed: {}", e);
                false
            }
        }
    }
}
