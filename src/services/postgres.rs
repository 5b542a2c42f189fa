use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{CandidateProfile, ResumeBlob, SkillSet};
use crate::services::repository::{CandidateRepository, RepositoryError};
use crate::services::resume_store::{ResumeStore, ResumeStoreError};

/// PostgreSQL client backing candidate profiles and resume blobs
///
/// Skills are stored already normalized in a `TEXT[]` column with a GIN
/// index, so the overlap pre-filter is a single `&&` query.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Map a row into a profile, re-normalizing skills at the boundary
    fn profile_from_row(row: &PgRow) -> Result<CandidateProfile, RepositoryError> {
        let email: String = row.try_get("email")?;
        let name: String = row.try_get("name")?;
        let skills: Vec<String> = row.try_get("skills")?;
        let resume_id: Uuid = row.try_get("resume_id")?;
        let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at")?;

        let mut profile = checked_profile(email, name, skills, resume_id)?;
        profile.created_at = Some(created_at);
        Ok(profile)
    }
}

/// Build a profile from stored columns; a row without an email is corrupt
fn checked_profile(
    email: String,
    name: String,
    skills: Vec<String>,
    resume_id: Uuid,
) -> Result<CandidateProfile, RepositoryError> {
    if email.trim().is_empty() {
        return Err(RepositoryError::InvalidRecord(
            "candidate row without email".to_string(),
        ));
    }

    Ok(CandidateProfile::new(email, name, SkillSet::from(skills), resume_id))
}

#[async_trait]
impl CandidateRepository for PostgresClient {
    async fn find_by_skill_overlap(
        &self,
        required: &SkillSet,
    ) -> Result<Vec<CandidateProfile>, RepositoryError> {
        if required.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"
            SELECT email, name, skills, resume_id, created_at
            FROM candidates
            WHERE skills && $1
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(required.to_vec())
            .fetch_all(&self.pool)
            .await?;

        // One undecodable row fails the query; dropping it would skew the ranking
        let profiles = rows
            .iter()
            .map(Self::profile_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::error!("Invalid candidate row in overlap query: {}", e);
                e
            })?;

        tracing::debug!("Pre-filter returned {} rows", profiles.len());

        Ok(profiles)
    }

    /// Uses INSERT ... ON CONFLICT so the row id, and with it the
    /// candidate's position, survives a re-upload.
    async fn upsert(&self, profile: CandidateProfile) -> Result<(), RepositoryError> {
        let query = r#"
            INSERT INTO candidates (email, name, skills, resume_id, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (email)
            DO UPDATE SET
                name = EXCLUDED.name,
                skills = EXCLUDED.skills,
                resume_id = EXCLUDED.resume_id
        "#;

        sqlx::query(query)
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(profile.skills.to_vec())
            .bind(profile.resume_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Upserted candidate {} with {} skills",
            profile.email,
            profile.skills.len()
        );

        Ok(())
    }

    async fn get(&self, email: &str) -> Result<CandidateProfile, RepositoryError> {
        let query = r#"
            SELECT email, name, skills, resume_id, created_at
            FROM candidates
            WHERE email = $1
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Candidate not found: {}", email)))?;

        Self::profile_from_row(&row)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ResumeStore for PostgresClient {
    async fn put(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Uuid, ResumeStoreError> {
        if data.is_empty() {
            return Err(ResumeStoreError::Empty);
        }

        let id = Uuid::new_v4();
        let query = r#"
            INSERT INTO resumes (id, filename, content_type, data, uploaded_at)
            VALUES ($1, $2, $3, $4, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(filename)
            .bind(content_type)
            .bind(&data)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored resume {} ({} bytes)", id, data.len());

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<ResumeBlob, ResumeStoreError> {
        let query = r#"
            SELECT id, filename, content_type, data
            FROM resumes
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ResumeStoreError::NotFound(id))?;

        Ok(ResumeBlob {
            id: row.try_get("id")?,
            filename: row.try_get("filename")?,
            content_type: row.try_get("content_type")?,
            data: row.try_get("data")?,
        })
    }
}
