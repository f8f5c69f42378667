use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::{NewVisit, VisitCounters, VisitRecord};
use crate::storage::VisitStorage;

pub struct PostgresVisitStorage {
    pool: Arc<PgPool>,
}

impl PostgresVisitStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl VisitStorage for PostgresVisitStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id BIGSERIAL PRIMARY KEY,
                ip_hash TEXT NOT NULL,
                source TEXT NOT NULL,
                referrer TEXT,
                user_agent TEXT NOT NULL,
                visit_count BIGINT NOT NULL DEFAULT 0,
                github_visit_count BIGINT NOT NULL DEFAULT 0,
                linkedin_visit_count BIGINT NOT NULL DEFAULT 0,
                resume_download_count BIGINT NOT NULL DEFAULT 0,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL,
                UNIQUE (ip_hash, source)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_hash_and_source(
        &self,
        ip_hash: &str,
        source: &str,
    ) -> Result<Option<VisitRecord>> {
        let record = sqlx::query_as::<_, VisitRecord>(
            r#"
            SELECT id, ip_hash, source, referrer, user_agent,
                   visit_count, github_visit_count, linkedin_visit_count,
                   resume_download_count, created_at, updated_at
            FROM visits
            WHERE ip_hash = $1 AND source = $2
            "#,
        )
        .bind(ip_hash)
        .bind(source)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn create_or_get(
        &self,
        visit: &NewVisit,
        counters: VisitCounters,
    ) -> Result<VisitRecord> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs() as i64;

        sqlx::query(
            r#"
            INSERT INTO visits (
                ip_hash, source, referrer, user_agent,
                visit_count, github_visit_count, linkedin_visit_count,
                resume_download_count, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (ip_hash, source) DO NOTHING
            "#,
        )
        .bind(&visit.ip_hash)
        .bind(&visit.source)
        .bind(&visit.referrer)
        .bind(&visit.user_agent)
        .bind(counters.visits)
        .bind(counters.github)
        .bind(counters.linkedin)
        .bind(counters.resume)
        .bind(now)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        let record = sqlx::query_as::<_, VisitRecord>(
            r#"
            SELECT id, ip_hash, source, referrer, user_agent,
                   visit_count, github_visit_count, linkedin_visit_count,
                   resume_download_count, created_at, updated_at
            FROM visits
            WHERE ip_hash = $1 AND source = $2
            "#,
        )
        .bind(&visit.ip_hash)
        .bind(&visit.source)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn update(&self, record: &VisitRecord) -> Result<()> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs() as i64;

        sqlx::query(
            r#"
            UPDATE visits
            SET referrer = $1,
                user_agent = $2,
                visit_count = $3,
                github_visit_count = $4,
                linkedin_visit_count = $5,
                resume_download_count = $6,
                updated_at = $7
            WHERE id = $8
            "#,
        )
        .bind(&record.referrer)
        .bind(&record.user_agent)
        .bind(record.visit_count)
        .bind(record.github_visit_count)
        .bind(record.linkedin_visit_count)
        .bind(record.resume_download_count)
        .bind(now)
        .bind(record.id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
