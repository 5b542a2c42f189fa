use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::normalize::{normalize_set, parse_skill_list};
use crate::models::SkillSet;

/// Request to rank candidates against a job description
///
/// An empty description is valid and produces an empty ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(alias = "job_description", rename = "jobDescription", default)]
    pub job_description: String,
}

/// Skills as submitted on upload: a comma-separated string or a list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl SkillsInput {
    pub fn to_skill_set(&self) -> SkillSet {
        match self {
            SkillsInput::List(items) => normalize_set(items),
            SkillsInput::Csv(raw) => parse_skill_list(raw),
        }
    }
}

/// Request to register or replace a candidate profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadCandidateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub skills: SkillsInput,
    #[serde(alias = "resume_id", rename = "resumeId")]
    pub resume_id: Uuid,
}

/// Query string for resume uploads
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResumeUploadQuery {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
}
