use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app_env: String,
    pub port: u16,
    pub frontend_url: String,
    pub database: DatabaseConfig,
    pub rate_limit_window_secs: u64,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

impl Config {
    /// Load configuration from the environment (and an optional .env file).
    /// Every variable without a default is required; a missing one is a
    /// startup-time fatal error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let app_env = required_env("APP_ENV")?;
        let port = required_env("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        let frontend_url = required_env("FRONTEND_URL")?;

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "postgres".to_string());
        let backend = match backend_str.to_lowercase().as_str() {
            "sqlite" => DatabaseBackend::Sqlite,
            _ => DatabaseBackend::Postgres,
        };

        let url = match backend {
            DatabaseBackend::Sqlite => required_env("DATABASE_URL")?,
            DatabaseBackend::Postgres => postgres_url()?,
        };

        let rate_limit_window_secs = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let queue_capacity = std::env::var("QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(crate::analytics::queue::DEFAULT_QUEUE_CAPACITY);

        Ok(Config {
            app_env,
            port,
            frontend_url,
            database: DatabaseConfig { backend, url },
            rate_limit_window_secs,
            queue_capacity,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.app_env != "production"
    }

    /// Log the loaded configuration, without credentials.
    pub fn log(&self) {
        info!(
            "environment: {}, backend: {:?}, frontend origin: {}, queue capacity: {}, rate limit window: {}s",
            self.app_env,
            self.database.backend,
            self.frontend_url,
            self.queue_capacity,
            self.rate_limit_window_secs,
        );
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .with_context(|| format!("environment variable {key} is required but not set"))
}

/// Assemble the Postgres connection URL from the individual DB_* variables.
fn postgres_url() -> Result<String> {
    let host = required_env("DB_HOST")?;
    let user = required_env("DB_USER")?;
    let password = required_env("DB_PASSWORD")?;
    let name = required_env("DB_NAME")?;
    let port = required_env("DB_PORT")?;
    let sslmode = required_env("DB_SSLMODE")?;

    Ok(format!(
        "postgres://{user}:{password}@{host}:{port}/{name}?sslmode={sslmode}"
    ))
}
