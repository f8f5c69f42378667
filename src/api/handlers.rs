use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::analytics::{hash_ip, is_bot, IngestQueue, VisitJob};
use crate::api::client_ip::client_ip;
use crate::api::error::ApiError;
use crate::api::rate_limit::RateLimiter;
use crate::models::{NewVisit, VisitKind};

pub struct AppState {
    pub queue: IngestQueue,
    pub rate_limiter: RateLimiter,
}

/// JSON body for the visit endpoints.
#[derive(Deserialize)]
pub struct RecordVisitRequest {
    pub source: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn record_page_visit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<RecordVisitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    enqueue_visit(&state, addr, &headers, payload, VisitKind::Page)
}

pub async fn record_github_visit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<RecordVisitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    enqueue_visit(&state, addr, &headers, payload, VisitKind::Github)
}

pub async fn record_linkedin_visit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<RecordVisitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    enqueue_visit(&state, addr, &headers, payload, VisitKind::Linkedin)
}

pub async fn record_resume_download(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<RecordVisitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    enqueue_visit(&state, addr, &headers, payload, VisitKind::Resume)
}

/// Shared flow for the four visit endpoints: validate the body, drop bot
/// traffic, hash the client address, and try a non-blocking enqueue. The
/// response goes out before the visit reaches storage.
fn enqueue_visit(
    state: &AppState,
    addr: SocketAddr,
    headers: &HeaderMap,
    payload: Result<Json<RecordVisitRequest>, JsonRejection>,
    kind: VisitKind,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    if req.source.trim().is_empty() {
        return Err(ApiError::Validation("source is required".to_string()));
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if is_bot(&user_agent) {
        return Ok(Json(MessageResponse {
            message: "ignored bot visit".to_string(),
        }));
    }

    let ip = client_ip(headers, addr.ip());
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let visit = NewVisit {
        ip_hash: hash_ip(&ip.to_string()),
        source: req.source,
        referrer,
        user_agent,
    };

    state
        .queue
        .submit(VisitJob { visit, kind })
        .map_err(|_| ApiError::QueueFull)?;

    Ok(Json(MessageResponse {
        message: "visit queued".to_string(),
    }))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

impl AppState {
    pub fn new(queue: IngestQueue, rate_limiter: RateLimiter) -> Self {
        Self { queue, rate_limiter }
    }
}
