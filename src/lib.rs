//! Skill Match - candidate ranking by skill overlap
//!
//! Extracts technology entities from a job description, normalizes them into
//! a required skill set, and ranks stored candidate profiles by how many of
//! those skills they share.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    normalize, normalize_set, present, EntityExtractor, LabelAllowList, MatchError, Matcher,
    Ranking,
};
pub use models::{
    CandidateProfile, EntitySpan, MatchRequest, MatchResponse, RankedCandidate, SkillSet,
};
