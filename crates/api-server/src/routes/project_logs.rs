//! Project log API routes
//!
//! Management endpoints list every folder; the public ones only expose
//! folders marked active.

use std::path::Path as FsPath;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dash_core::project_log::{
    list_log_files, read_log_content, LogContent, LogFile, ProjectLog, ProjectLogInput,
};

use super::{core_error, route_error, ResourceId, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilesResponse {
    pub project_log: ProjectLog,
    pub log_files: Vec<LogFile>,
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(default)]
    pub file: Option<String>,
}

async fn list_project_logs(State(state): State<AppState>) -> Json<Vec<ProjectLog>> {
    Json(state.project_log_store().list().await)
}

async fn list_public_project_logs(State(state): State<AppState>) -> Json<Vec<ProjectLog>> {
    Json(state.project_log_store().list_active().await)
}

async fn create_project_log(
    State(state): State<AppState>,
    Json(input): Json<ProjectLogInput>,
) -> Result<(StatusCode, Json<ProjectLog>), RouteError> {
    let project_log = state
        .project_log_store()
        .create(input)
        .await
        .map_err(core_error)?;
    Ok((StatusCode::CREATED, Json(project_log)))
}

async fn find_project_log(state: &AppState, id: Uuid) -> Result<ProjectLog, RouteError> {
    state
        .project_log_store()
        .get(id)
        .await
        .ok_or_else(|| route_error(StatusCode::NOT_FOUND, "Project log not found"))
}

/// Active project log or 404
async fn find_active_project_log(state: &AppState, id: Uuid) -> Result<ProjectLog, RouteError> {
    let project_log = find_project_log(state, id).await?;
    if !project_log.is_active {
        return Err(route_error(StatusCode::NOT_FOUND, "Project log not active"));
    }
    Ok(project_log)
}

/// Single project log with its current files
async fn get_project_log(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<LogFilesResponse>, RouteError> {
    let project_log = find_project_log(&state, id).await?;
    let log_files = list_log_files(FsPath::new(&project_log.log_path))
        .await
        .map_err(core_error)?;
    Ok(Json(LogFilesResponse {
        project_log,
        log_files,
    }))
}

async fn update_project_log(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    Json(input): Json<ProjectLogInput>,
) -> Result<Json<ProjectLog>, RouteError> {
    state
        .project_log_store()
        .update(id, input)
        .await
        .map(Json)
        .map_err(core_error)
}

async fn delete_project_log(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, RouteError> {
    match state.project_log_store().delete(id).await.map_err(core_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(route_error(StatusCode::NOT_FOUND, "Project log not found")),
    }
}

/// GET /api/project-logs/{id}/files
async fn public_log_files(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<LogFilesResponse>, RouteError> {
    let project_log = find_active_project_log(&state, id).await?;
    let log_files = list_log_files(FsPath::new(&project_log.log_path))
        .await
        .map_err(core_error)?;
    Ok(Json(LogFilesResponse {
        project_log,
        log_files,
    }))
}

/// GET /api/project-logs/{id}/content?file=NAME
async fn log_content(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    Query(query): Query<ContentQuery>,
) -> Result<Json<LogContent>, RouteError> {
    let file = query
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| route_error(StatusCode::BAD_REQUEST, "File name is required"))?;

    let project_log = find_active_project_log(&state, id).await?;
    read_log_content(FsPath::new(&project_log.log_path), &file)
        .await
        .map(Json)
        .map_err(|e| match e {
            dash_core::Error::InvalidInput(msg) => route_error(StatusCode::BAD_REQUEST, msg),
            other => core_error(other),
        })
}

/// Management routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/project-logs",
            get(list_project_logs).post(create_project_log),
        )
        .route(
            "/api/project-logs/{id}",
            get(get_project_log)
                .put(update_project_log)
                .delete(delete_project_log),
        )
}

/// Public, throttled routes
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/project-logs/public", get(list_public_project_logs))
        .route("/api/project-logs/{id}/files", get(public_log_files))
        .route("/api/project-logs/{id}/content", get(log_content))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::routes::test_support::{build_state, send};

    fn app(state: crate::state::AppState) -> axum::Router {
        super::router().merge(super::public_router()).with_state(state)
    }

    #[tokio::test]
    async fn files_and_content_for_active_log() {
        let logs = TempDir::new().unwrap();
        std::fs::write(logs.path().join("app.log"), "one\ntwo").unwrap();
        std::fs::write(logs.path().join("notes.md"), "skip").unwrap();

        let (state, _temp_dir) = build_state().await;
        let app = app(state);

        let (status, created) = send(
            &app,
            "POST",
            "/api/project-logs",
            Some(json!({ "name": "api", "logPath": logs.path() })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["isActive"], true);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", &format!("/api/project-logs/{id}/files"), None).await;
        assert_eq!(status, StatusCode::OK);
        let files = body["logFiles"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["name"], "app.log");

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/project-logs/{id}/content?file=app.log"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "two\none");

        let (status, body) = send(&app, "GET", &format!("/api/project-logs/{id}/content"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File name is required");

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/project-logs/{id}/content?file=missing.log"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn inactive_logs_are_hidden_from_public_routes() {
        let logs = TempDir::new().unwrap();
        let (state, _temp_dir) = build_state().await;
        let app = app(state);

        let (_, created) = send(
            &app,
            "POST",
            "/api/project-logs",
            Some(json!({ "name": "batch", "logPath": logs.path(), "isActive": false })),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", &format!("/api/project-logs/{id}/files"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project log not active");

        let (_, public) = send(&app, "GET", "/api/project-logs/public", None).await;
        assert!(public.as_array().unwrap().is_empty());

        let (_, all) = send(&app, "GET", "/api/project-logs", None).await;
        assert_eq!(all.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", &format!("/api/project-logs/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["projectLog"]["name"], "batch");
    }
}
