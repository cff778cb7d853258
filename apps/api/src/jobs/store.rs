use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::job::NewJob;
use crate::models::search::{Profile, SearchRow, SearchSpec};

/// The profile/search/job store. Read-mostly: the only write is `insert_job`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// All saved searches, newest first, each joined with its linked profile.
    async fn fetch_searches(&self) -> Result<Vec<SearchSpec>>;

    /// The most recently created profile, if any.
    async fn latest_profile(&self) -> Result<Option<Profile>>;

    async fn job_exists(&self, job_url: &str) -> Result<bool>;

    async fn insert_job(&self, job: &NewJob) -> Result<()>;
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    /// Opens the connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn fetch_searches(&self) -> Result<Vec<SearchSpec>> {
        let rows = sqlx::query_as::<_, SearchRow>(
            r#"
            SELECT s.id, s.search_name, s.search_term, s.country, s.experience_level,
                   s.job_type, s.hours_old, p.id AS profile_id, p.profile_name,
                   p.resume_context
            FROM searches s
            LEFT JOIN profiles p ON p.id = s.profile_id
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SearchSpec::from).collect())
    }

    async fn latest_profile(&self) -> Result<Option<Profile>> {
        Ok(sqlx::query_as::<_, Profile>(
            "SELECT id, profile_name, resume_context FROM profiles ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn job_exists(&self, job_url: &str) -> Result<bool> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM jobs WHERE job_url = $1)")
                .bind(job_url)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn insert_job(&self, job: &NewJob) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (title, company, job_url, description, similarity_score,
                 gemini_rating, ai_reason, created_at, profile_id, search_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.job_url)
        .bind(&job.description)
        .bind(job.similarity_score)
        .bind(job.gemini_rating)
        .bind(&job.ai_reason)
        .bind(job.created_at)
        .bind(job.profile_id)
        .bind(job.search_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
