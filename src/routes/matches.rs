use actix_web::{web, HttpResponse, Responder};

use crate::core::MatchError;
use crate::models::{ErrorResponse, HealthResponse, MatchRequest};
use crate::routes::AppState;

/// Configure match and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match", web::post().to(match_candidates));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.service.repository_healthy().await;

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match endpoint
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// { "jobDescription": "string" }
/// ```
///
/// An empty description yields an empty ranking, not an error.
async fn match_candidates(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    let length = req.job_description.chars().count();
    if length > state.max_job_description_chars {
        tracing::info!("Rejecting job description of {} chars", length);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: format!(
                "jobDescription exceeds {} characters",
                state.max_job_description_chars
            ),
            status_code: 400,
        });
    }

    tracing::info!("Matching job description ({} chars)", length);

    match state.service.match_job(&req.job_description).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            let error = match &e {
                MatchError::ExtractionUnavailable(_) => "extraction_unavailable",
                MatchError::RepositoryUnavailable(_) => "repository_unavailable",
            };
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: error.to_string(),
                message: e.to_string(),
                status_code: 503,
            })
        }
    }
}
