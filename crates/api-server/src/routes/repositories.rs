//! Repository API routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use dash_core::repository::{Repository, RepositoryInput};

use super::{core_error, route_error, ResourceId, RouteError};
use crate::state::AppState;

/// List all repositories
async fn list_repositories(State(state): State<AppState>) -> Json<Vec<Repository>> {
    Json(state.repository_store().list().await)
}

async fn create_repository(
    State(state): State<AppState>,
    Json(input): Json<RepositoryInput>,
) -> Result<(StatusCode, Json<Repository>), RouteError> {
    let repository = state
        .repository_store()
        .create(input)
        .await
        .map_err(core_error)?;

    tracing::info!("Created repository {} at {}", repository.name, repository.git_log_path);
    Ok((StatusCode::CREATED, Json(repository)))
}

/// Look up a repository or answer 404
pub(crate) async fn find_repository(state: &AppState, id: Uuid) -> Result<Repository, RouteError> {
    state
        .repository_store()
        .get(id)
        .await
        .ok_or_else(|| route_error(StatusCode::NOT_FOUND, "Repository not found"))
}

async fn get_repository(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<Repository>, RouteError> {
    find_repository(&state, id).await.map(Json)
}

async fn update_repository(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    Json(input): Json<RepositoryInput>,
) -> Result<Json<Repository>, RouteError> {
    state
        .repository_store()
        .update(id, input)
        .await
        .map(Json)
        .map_err(core_error)
}

async fn delete_repository(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, RouteError> {
    match state.repository_store().delete(id).await.map_err(core_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(route_error(StatusCode::NOT_FOUND, "Repository not found")),
    }
}

/// Create the repository router
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/repositories",
            get(list_repositories).post(create_repository),
        )
        .route(
            "/api/repositories/{id}",
            get(get_repository)
                .put(update_repository)
                .delete(delete_repository),
        )
}
