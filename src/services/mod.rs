// Service exports
pub mod keyword;
pub mod match_service;
pub mod postgres;
pub mod remote_ner;
pub mod repository;
pub mod resume_store;

pub use keyword::KeywordExtractor;
pub use match_service::MatchService;
pub use postgres::PostgresClient;
pub use remote_ner::RemoteNerExtractor;
pub use repository::{CandidateRepository, InMemoryCandidateRepository, RepositoryError};
pub use resume_store::{resume_content_type, InMemoryResumeStore, ResumeStore, ResumeStoreError};
