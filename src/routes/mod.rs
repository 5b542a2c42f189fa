// Route exports
pub mod candidates;
pub mod matches;

use actix_web::web;
use std::sync::Arc;

use crate::services::{CandidateRepository, MatchService, ResumeStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchService,
    pub repository: Arc<dyn CandidateRepository>,
    pub resumes: Arc<dyn ResumeStore>,
    pub max_job_description_chars: usize,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(candidates::configure),
    );
}
