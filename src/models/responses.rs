use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ranked candidate as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub name: String,
    pub email: String,
    #[serde(rename = "matchedSkills")]
    pub matched_skills: Vec<String>,
    #[serde(rename = "matchedCount")]
    pub matched_count: usize,
    #[serde(rename = "resumeId")]
    pub resume_id: Uuid,
}

/// Response for the match endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    /// Normalized skills extracted from the job description
    #[serde(rename = "requiredSkills")]
    pub required_skills: Vec<String>,
    pub matches: Vec<RankedCandidate>,
    /// Candidates scanned after the repository pre-filter
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for candidate upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCandidateResponse {
    pub email: String,
    pub skills: Vec<String>,
}

/// Response for resume upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeUploadResponse {
    #[serde(rename = "resumeId")]
    pub resume_id: Uuid,
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
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
