use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::models::{NewVisit, VisitCounters, VisitRecord};
use crate::storage::VisitStorage;

pub struct SqliteVisitStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteVisitStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl VisitStorage for SqliteVisitStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ip_hash TEXT NOT NULL,
                source TEXT NOT NULL,
                referrer TEXT,
                user_agent TEXT NOT NULL,
                visit_count INTEGER NOT NULL DEFAULT 0,
                github_visit_count INTEGER NOT NULL DEFAULT 0,
                linkedin_visit_count INTEGER NOT NULL DEFAULT 0,
                resume_download_count INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
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
            WHERE ip_hash = ? AND source = ?
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
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            WHERE ip_hash = ? AND source = ?
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
            SET referrer = ?,
                user_agent = ?,
                visit_count = ?,
                github_visit_count = ?,
                linkedin_visit_count = ?,
                resume_download_count = ?,
                updated_at = ?
            WHERE id = ?
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
