use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::ResumeBlob;

/// Errors that can occur with resume artifacts
#[derive(Debug, Error)]
pub enum ResumeStoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Resume not found: {0}")]
    NotFound(Uuid),

    #[error("Unsupported resume type: {0} (allowed: .doc, .docx)")]
    UnsupportedType(String),

    #[error("Empty resume upload")]
    Empty,
}

/// Word-processor formats accepted at the upload boundary
pub const RESUME_CONTENT_TYPES: &[(&str, &str)] = &[
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

/// Resolve the content type for an uploaded resume by file extension
pub fn resume_content_type(filename: &str) -> Result<&'static str, ResumeStoreError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .ok_or_else(|| ResumeStoreError::UnsupportedType(filename.to_string()))?;

    RESUME_CONTENT_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
        .ok_or_else(|| ResumeStoreError::UnsupportedType(filename.to_string()))
}

/// Binary store for resume documents
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Uuid, ResumeStoreError>;

    async fn get(&self, id: Uuid) -> Result<ResumeBlob, ResumeStoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryResumeStore {
    blobs: RwLock<HashMap<Uuid, ResumeBlob>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn put(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Uuid, ResumeStoreError> {
        if data.is_empty() {
            return Err(ResumeStoreError::Empty);
        }
        let id = Uuid::new_v4();
        let blob = ResumeBlob {
            id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            data,
        };
        self.blobs.write().await.insert(id, blob);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<ResumeBlob, ResumeStoreError> {
        self.blobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ResumeStoreError::NotFound(id))
    }
}
