use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub extractor: ExtractorSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    Remote,
    Keyword,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorSettings {
    #[serde(default = "default_extractor_kind")]
    pub kind: ExtractorKind,
    /// NER service URL, required for `remote`
    pub endpoint: Option<String>,
    pub model: Option<String>,
    #[serde(default = "default_extractor_timeout_ms")]
    pub timeout_ms: u64,
    /// Entity labels treated as technology terms, for every extractor
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
    /// Gazetteer for the `keyword` extractor
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_keyword_label")]
    pub keyword_label: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            kind: default_extractor_kind(),
            endpoint: None,
            model: None,
            timeout_ms: default_extractor_timeout_ms(),
            labels: default_labels(),
            keywords: Vec::new(),
            keyword_label: default_keyword_label(),
        }
    }
}

fn default_extractor_kind() -> ExtractorKind {
    ExtractorKind::Keyword
}
fn default_extractor_timeout_ms() -> u64 {
    5000
}
fn default_labels() -> Vec<String> {
    crate::core::extractor::DEFAULT_LABELS
        .iter()
        .map(|l| l.to_string())
        .collect()
}
fn default_keyword_label() -> String {
    crate::services::keyword::DEFAULT_KEYWORD_LABEL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_shard_size")]
    pub shard_size: usize,
    #[serde(default = "default_max_job_description_chars")]
    pub max_job_description_chars: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            shard_size: default_shard_size(),
            max_job_description_chars: default_max_job_description_chars(),
        }
    }
}

fn default_shard_size() -> usize {
    crate::core::matcher::DEFAULT_SHARD_SIZE
}
fn default_max_job_description_chars() -> usize {
    20_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SKILLMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SKILLMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = apply_database_url(settings)?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("SKILLMATCH")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("extractor.labels")
        .with_list_parse_key("extractor.keywords")
        .try_parsing(true)
}

/// `DATABASE_URL` takes precedence over the file value, matching sqlx tooling
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
