use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::models::EntitySpan;

/// Errors raised by an entity extractor
///
/// The matching engine treats every variant as the model being unavailable.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Extractor returned error: {0}")]
    ApiError(String),

    #[error("Invalid extractor response: {0}")]
    InvalidResponse(String),

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces labeled entity spans from raw text
///
/// Implementations may be statistical models, rule-based matchers or remote
/// services. Empty text must yield an empty list.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, ExtractionError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// Entity labels treated as technology terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAllowList {
    labels: HashSet<String>,
}

pub const DEFAULT_LABELS: &[&str] = &["ORG", "TECHNOLOGY", "TECH"];

impl LabelAllowList {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|l| canonical_label(l.as_ref()))
            .filter(|l| !l.is_empty())
            .collect();
        Self { labels }
    }

    #[inline]
    pub fn accepts(&self, label: &str) -> bool {
        self.labels.contains(&canonical_label(label))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS)
    }
}

fn canonical_label(label: &str) -> String {
    label.trim().to_ascii_uppercase()
}
