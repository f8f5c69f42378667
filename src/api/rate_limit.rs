//! Per-IP cooldown gate
//!
//! Rejects repeated requests from the same client IP inside a fixed
//! window, independent of which endpoint or source they target. The
//! timestamp map is the only state shared across request handlers and is
//! guarded by a single lock held just for the lookup-and-update.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::client_ip::client_ip;
use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// Map size at which stale entries are swept out during `check`.
const PRUNE_THRESHOLD: usize = 1024;

pub struct RateLimiter {
    window: Duration,
    last_seen: Mutex<HashMap<IpAddr, Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one request from `ip`. On admission the current
    /// instant becomes the new last-seen timestamp.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Amortized eviction keeps the map from growing without bound.
        if last_seen.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            last_seen.retain(|_, last| now.duration_since(*last) < window);
        }

        if let Some(last) = last_seen.get(&ip) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }

        last_seen.insert(ip, now);
        true
    }

    #[cfg(test)]
    fn tracked_ips(&self) -> usize {
        self.last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Axum middleware applying the cooldown gate ahead of the visit routes.
pub async fn cooldown_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers(), addr.ip());
    if !state.rate_limiter.check(ip) {
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last_octet: u8) -> IpAddr {
        IpAddr::from([192, 0, 2, last_octet])
    }

    #[test]
    fn rejects_second_request_within_window() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn admits_after_window_elapses() {
        let limiter = RateLimiter::new(Duration::from_millis(20));
        assert!(limiter.check(ip(1)));
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check(ip(1)));
    }

    #[test]
    fn tracks_ips_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(2)));
        assert!(!limiter.check(ip(1)));
        assert!(!limiter.check(ip(2)));
    }

    #[test]
    fn evicts_stale_entries_once_threshold_is_reached() {
        let limiter = RateLimiter::new(Duration::from_millis(1));

        for i in 0..PRUNE_THRESHOLD {
            let octets = (i as u32).to_be_bytes();
            limiter.check(IpAddr::from([octets[1], octets[2], octets[3], 1]));
        }
        assert_eq!(limiter.tracked_ips(), PRUNE_THRESHOLD);

        std::thread::sleep(Duration::from_millis(5));
        limiter.check(ip(200));
        assert!(limiter.tracked_ips() < PRUNE_THRESHOLD);
    }
}
