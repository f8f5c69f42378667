use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use beacon::analytics::{run_worker, IngestQueue, VisitService};
use beacon::api::{create_router, AppState, RateLimiter};
use beacon::config::{Config, DatabaseBackend};
use beacon::storage::{PostgresVisitStorage, SqliteVisitStorage, VisitStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    config.log();

    // Initialize storage
    let storage: Arc<dyn VisitStorage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteVisitStorage::new(&config.database.url, 5).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage");
            Arc::new(PostgresVisitStorage::new(&config.database.url, 5).await?)
        }
    };

    // Create schema if it does not exist yet
    storage.init().await?;
    info!("Database initialized successfully");

    // Ingestion queue and its single background worker
    let service = Arc::new(VisitService::new(Arc::clone(&storage)));
    let (queue, queue_rx) = IngestQueue::new(config.queue_capacity);
    let worker = tokio::spawn(run_worker(queue_rx, Arc::clone(&service)));

    let state = Arc::new(AppState::new(
        queue.clone(),
        RateLimiter::new(Duration::from_secs(config.rate_limit_window_secs)),
    ));
    let router = create_router(Arc::clone(&state), &config.frontend_url)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{addr} in {} mode", config.app_env);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Close the queue and let the worker finish what is already buffered.
    queue.shutdown().await;
    worker.await?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
