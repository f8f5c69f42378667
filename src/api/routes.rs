use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{
    health_check, record_github_visit, record_linkedin_visit, record_page_visit,
    record_resume_download, AppState,
};
use super::rate_limit::cooldown_middleware;

/// Build the application router: the four visit endpoints behind the
/// per-IP cooldown gate, plus an unthrottled health check. Only the
/// configured frontend origin may call the API.
pub fn create_router(state: Arc<AppState>, frontend_origin: &str) -> Result<Router> {
    let origin = frontend_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid frontend origin: {frontend_origin}"))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]);

    let visit_routes = Router::new()
        .route("/visit", post(record_page_visit))
        .route("/visit/github", post(record_github_visit))
        .route("/visit/linkedin", post(record_linkedin_visit))
        .route("/visit/resume", post(record_resume_download))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            cooldown_middleware,
        ))
        .with_state(state);

    Ok(Router::new()
        .route("/health", get(health_check))
        .merge(visit_routes)
        .layer(cors))
}
