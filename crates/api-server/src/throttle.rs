//! Fixed-window request throttling for route groups

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::routes::ErrorResponse;

/// Shared counter allowing `limit` requests per window
#[derive(Debug, Clone)]
pub struct Throttle {
    name: &'static str,
    limit: u32,
    window: Duration,
    state: Arc<Mutex<Window>>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

impl Throttle {
    pub fn per_minute(name: &'static str, limit: u32) -> Self {
        Self::new(name, limit, Duration::from_secs(60))
    }

    pub fn new(name: &'static str, limit: u32, window: Duration) -> Self {
        Self {
            name,
            limit,
            window,
            state: Arc::new(Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Count one request, or return how long until the window resets
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let now = Instant::now();
        let mut window = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.limit {
            return Err(self.window - now.duration_since(window.started));
        }

        window.count += 1;
        Ok(())
    }
}

/// Middleware rejecting requests over the group's limit with 429
pub async fn enforce(State(throttle): State<Throttle>, request: Request, next: Next) -> Response {
    match throttle.try_acquire() {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(group = throttle.name, path = %request.uri().path(), "rate limit exceeded");
            let secs = retry_after.as_secs().max(1);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, secs.to_string())],
                Json(ErrorResponse::new("Too many requests, please slow down")),
            )
                .into_response()
        }
    }
}
