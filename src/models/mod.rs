// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CandidateProfile, EntitySpan, ResumeBlob, SkillSet};
pub use requests::{MatchRequest, ResumeUploadQuery, SkillsInput, UploadCandidateRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MatchResponse, RankedCandidate, ResumeUploadResponse,
    UploadCandidateResponse,
};
