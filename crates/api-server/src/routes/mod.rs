//! Route handlers

pub mod frontend;
pub mod git;
pub mod health;
pub mod project_logs;
pub mod repositories;

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    middleware, Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use git_runner::OutcomeKind;

use crate::config::RateLimits;
use crate::state::AppState;
use crate::throttle::{self, Throttle};

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<OutcomeKind>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
        }
    }
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn route_error(status: StatusCode, message: impl Into<String>) -> RouteError {
    (status, Json(ErrorResponse::new(message)))
}

/// `{id}` path segment parsed as a UUID, rejected with a JSON error body
pub struct ResourceId(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for ResourceId {
    type Rejection = RouteError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(id))
            .map_err(|rejection| route_error(rejection.status(), rejection.body_text()))
    }
}

/// Map core errors to HTTP statuses
pub(crate) fn core_error(err: dash_core::Error) -> RouteError {
    use dash_core::Error;

    let status = match &err {
        Error::RepositoryNotFound(_) | Error::ProjectLogNotFound(_) | Error::NotFound(_) => {
            StatusCode::NOT_FOUND
        }
        Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::AccessDenied(_) => StatusCode::FORBIDDEN,
        Error::Io(_) | Error::Serialization(_) => {
            tracing::error!("Storage failure: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    route_error(status, err.to_string())
}

/// Full REST router; read and pull groups are throttled separately
pub fn router(state: AppState, limits: RateLimits) -> Router {
    let reads = Throttle::per_minute("reads", limits.reads_per_minute);
    let pulls = Throttle::per_minute("pulls", limits.pulls_per_minute);

    let throttled_reads = Router::new()
        .merge(git::log_router())
        .merge(project_logs::public_router())
        .merge(frontend::folders_router())
        .route_layer(middleware::from_fn_with_state(reads, throttle::enforce));

    let throttled_pulls = git::pull_router()
        .route_layer(middleware::from_fn_with_state(pulls, throttle::enforce));

    Router::new()
        .merge(health::router())
        .merge(repositories::router())
        .merge(project_logs::router())
        .merge(frontend::settings_router())
        .merge(throttled_reads)
        .merge(throttled_pulls)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use git_runner::PullConfig;

    use crate::state::AppState;

    pub async fn build_state() -> (AppState, TempDir) {
        build_state_with(PullConfig::default()).await
    }

    pub async fn build_state_with(pull: PullConfig) -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().join("data"), pull)
            .await
            .unwrap();
        (state, temp_dir)
    }

    /// Send one request and decode the body: JSON, Null when empty, or the
    /// raw text for plain-text rejections
    pub async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}
