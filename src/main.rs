use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use skill_match::config::{ExtractorKind, Settings};
use skill_match::core::{EntityExtractor, LabelAllowList, Matcher};
use skill_match::routes::{self, AppState};
use skill_match::services::{
    KeywordExtractor, MatchService, PostgresClient, RemoteNerExtractor,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST);
        HttpResponse::build(status).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn build_extractor(settings: &Settings) -> std::io::Result<Arc<dyn EntityExtractor>> {
    let extractor = &settings.extractor;
    match extractor.kind {
        ExtractorKind::Remote => {
            let endpoint = extractor.endpoint.clone().ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "extractor.endpoint is required for the remote extractor",
                )
            })?;
            let client = RemoteNerExtractor::new(
                endpoint,
                extractor.model.clone(),
                Duration::from_millis(extractor.timeout_ms),
            )
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            info!("Remote NER extractor initialized ({})", client.endpoint());
            Ok(Arc::new(client))
        }
        ExtractorKind::Keyword => {
            let keywords =
                KeywordExtractor::new(&extractor.keywords, extractor.keyword_label.clone());
            if keywords.term_count() == 0 {
                warn!("Keyword extractor has no terms; every job will yield an empty ranking");
            }
            info!("Keyword extractor initialized ({} terms)", keywords.term_count());
            Ok(Arc::new(keywords))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    init_logging(&settings);

    info!("Starting Skill Match service...");

    let extractor = build_extractor(&settings)?;

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = match PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
        }
    };

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let matcher = Matcher::new(
        LabelAllowList::new(&settings.extractor.labels),
        Duration::from_millis(settings.extractor.timeout_ms),
        settings.matching.shard_size,
    );

    info!("Matcher initialized with labels: {:?}", settings.extractor.labels);

    let service = MatchService::new(extractor, postgres.clone(), matcher);

    let app_state = AppState {
        service,
        repository: postgres.clone(),
        resumes: postgres,
        max_job_description_chars: settings.matching.max_job_description_chars,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let max_upload_bytes = settings.server.max_upload_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
