use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CandidateProfile, ErrorResponse, ResumeUploadQuery, ResumeUploadResponse,
    UploadCandidateRequest, UploadCandidateResponse,
};
use crate::routes::AppState;
use crate::services::{resume_content_type, RepositoryError, ResumeStoreError};

/// Configure candidate and resume routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/candidates", web::post().to(upload_candidate))
        .route("/candidates/{email}", web::get().to(get_candidate))
        .route("/resumes", web::post().to(upload_resume))
        .route("/resumes/{id}", web::get().to(fetch_resume));
}

fn error(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Register or replace a candidate profile
///
/// POST /api/v1/candidates
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "skills": "Python, SQL" | ["Python", "SQL"],
///   "resumeId": "uuid"
/// }
/// ```
async fn upload_candidate(
    state: web::Data<AppState>,
    req: web::Json<UploadCandidateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for candidate upload: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if let Err(e) = state.resumes.get(req.resume_id).await {
        return match e {
            ResumeStoreError::NotFound(id) => error(
                actix_web::http::StatusCode::BAD_REQUEST,
                "unknown_resume",
                format!("No resume with id {}", id),
            ),
            other => {
                tracing::error!("Failed to verify resume {}: {}", req.resume_id, other);
                error(
                    actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                    "resume_store_unavailable",
                    other.to_string(),
                )
            }
        };
    }

    let req = req.into_inner();
    let profile = CandidateProfile::new(
        req.email.trim(),
        req.name.trim(),
        req.skills.to_skill_set(),
        req.resume_id,
    );
    let response = UploadCandidateResponse {
        email: profile.email.clone(),
        skills: profile.skills.to_vec(),
    };

    match state.repository.upsert(profile).await {
        Ok(()) => {
            tracing::info!(
                "Stored candidate {} with {} skills",
                response.email,
                response.skills.len()
            );
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            tracing::error!("Failed to store candidate {}: {}", response.email, e);
            error(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "repository_unavailable",
                e.to_string(),
            )
        }
    }
}

/// GET /api/v1/candidates/{email}
async fn get_candidate(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let email = path.into_inner();
    match state.repository.get(&email).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(RepositoryError::NotFound(message)) => {
            error(actix_web::http::StatusCode::NOT_FOUND, "not_found", message)
        }
        Err(e) => {
            tracing::error!("Failed to fetch candidate {}: {}", email, e);
            error(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "repository_unavailable",
                e.to_string(),
            )
        }
    }
}

/// Store a resume document
///
/// POST /api/v1/resumes?filename=cv.docx
///
/// The body is the raw document. Only Word formats are accepted; the check
/// runs before anything is written.
async fn upload_resume(
    state: web::Data<AppState>,
    query: web::Query<ResumeUploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let content_type = match resume_content_type(&query.filename) {
        Ok(content_type) => content_type,
        Err(e) => {
            return error(
                actix_web::http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                e.to_string(),
            );
        }
    };

    match state
        .resumes
        .put(body.to_vec(), &query.filename, content_type)
        .await
    {
        Ok(resume_id) => {
            tracing::info!("Stored resume {} ({} bytes)", resume_id, body.len());
            HttpResponse::Created().json(ResumeUploadResponse {
                resume_id,
                filename: query.filename.clone(),
                content_type: content_type.to_string(),
            })
        }
        Err(ResumeStoreError::Empty) => error(
            actix_web::http::StatusCode::BAD_REQUEST,
            "validation_failed",
            "Resume body is empty".to_string(),
        ),
        Err(e) => {
            tracing::error!("Failed to store resume {}: {}", query.filename, e);
            error(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "resume_store_unavailable",
                e.to_string(),
            )
        }
    }
}

/// GET /api/v1/resumes/{id}
async fn fetch_resume(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    match state.resumes.get(id).await {
        Ok(blob) => HttpResponse::Ok()
            .content_type(blob.content_type)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(blob.filename)],
            })
            .body(blob.data),
        Err(ResumeStoreError::NotFound(id)) => error(
            actix_web::http::StatusCode::NOT_FOUND,
            "not_found",
            format!("No resume with id {}", id),
        ),
        Err(e) => {
            tracing::error!("Failed to fetch resume {}: {}", id, e);
            error(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "resume_store_unavailable",
                e.to_string(),
            )
        }
    }
}
