//! Frontend folder dashboard routes

use std::path::Path;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dash_core::settings::{list_folders, Folder, FRONTEND_FOLDER_PATH};

use super::{core_error, route_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldersResponse {
    pub folders: Vec<Folder>,
    pub frontend_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendSettings {
    pub frontend_folder_path: Option<String>,
}

/// GET /api/frontend/folders
async fn folders(State(state): State<AppState>) -> Json<FoldersResponse> {
    let frontend_path = state.setting_store().get_value(FRONTEND_FOLDER_PATH).await;

    let (folders, error) = match frontend_path.as_deref() {
        None | Some("") => (Vec::new(), None),
        Some(path) if !Path::new(path).is_dir() => (
            Vec::new(),
            Some(format!("Frontend folder not found: {path}")),
        ),
        Some(path) => match list_folders(Path::new(path)).await {
            Ok(folders) => (folders, None),
            Err(e) => {
                tracing::warn!("Failed to list frontend folders in {}: {}", path, e);
                (Vec::new(), Some(format!("Failed to read frontend folder: {e}")))
            }
        },
    };

    Json(FoldersResponse {
        folders,
        frontend_path,
        error,
        timestamp: Utc::now(),
    })
}

async fn get_settings(State(state): State<AppState>) -> Json<FrontendSettings> {
    Json(FrontendSettings {
        frontend_folder_path: state.setting_store().get_value(FRONTEND_FOLDER_PATH).await,
    })
}

async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<FrontendSettings>,
) -> Result<Json<FrontendSettings>, RouteError> {
    let path = input
        .frontend_folder_path
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            route_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "frontendFolderPath is required",
            )
        })?;

    if !Path::new(&path).is_dir() {
        return Err(route_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Directory does not exist: {path}"),
        ));
    }

    let setting = state
        .setting_store()
        .set_value(
            FRONTEND_FOLDER_PATH,
            path,
            Some("Path to the frontend projects folder".to_string()),
        )
        .await
        .map_err(core_error)?;

    tracing::info!("Frontend folder path set to {}", setting.value);
    Ok(Json(FrontendSettings {
        frontend_folder_path: Some(setting.value),
    }))
}

/// Throttled folder listing
pub fn folders_router() -> Router<AppState> {
    Router::new().route("/api/frontend/folders", get(folders))
}

pub fn settings_router() -> Router<AppState> {
    Router::new().route(
        "/api/frontend/settings",
        get(get_settings).put(update_settings),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::routes::test_support::{build_state, send};

    fn app(state: crate::state::AppState) -> axum::Router {
        super::folders_router()
            .merge(super::settings_router())
            .with_state(state)
    }

    #[tokio::test]
    async fn folders_empty_until_configured() {
        let (state, _temp_dir) = build_state().await;
        let app = app(state);

        let (status, body) = send(&app, "GET", "/api/frontend/folders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["folders"].as_array().unwrap().is_empty());
        assert_eq!(body["frontendPath"], Value::Null);
        assert!(body.get("error").is_none());

        let (_, settings) = send(&app, "GET", "/api/frontend/settings", None).await;
        assert_eq!(settings["frontendFolderPath"], Value::Null);
    }

    #[tokio::test]
    async fn configured_folder_is_listed() {
        let frontends = TempDir::new().unwrap();
        std::fs::create_dir(frontends.path().join("shop")).unwrap();
        std::fs::write(frontends.path().join("index.html"), "").unwrap();
        let path = frontends.path().to_string_lossy().into_owned();

        let (state, _temp_dir) = build_state().await;
        let app = app(state);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/frontend/settings",
            Some(json!({ "frontendFolderPath": path })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["frontendFolderPath"], path.as_str());

        let (status, body) = send(&app, "GET", "/api/frontend/folders", None).await;
        assert_eq!(status, StatusCode::OK);
        let folders = body["folders"].as_array().unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0]["name"], "shop");
        assert_eq!(body["frontendPath"], path.as_str());
    }

    #[tokio::test]
    async fn settings_reject_missing_directories() {
        let (state, _temp_dir) = build_state().await;
        let app = app(state);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/frontend/settings",
            Some(json!({ "frontendFolderPath": "/definitely/not/a/dir" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("does not exist"));

        let (status, _) = send(
            &app,
            "PUT",
            "/api/frontend/settings",
            Some(json!({ "frontendFolderPath": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn vanished_folder_reports_error() {
        let frontends = TempDir::new().unwrap();
        let path = frontends.path().to_string_lossy().into_owned();

        let (state, _temp_dir) = build_state().await;
        state
            .setting_store()
            .set_value(dash_core::settings::FRONTEND_FOLDER_PATH, path.clone(), None)
            .await
            .unwrap();
        drop(frontends);

        let app = app(state);
        let (status, body) = send(&app, "GET", "/api/frontend/folders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["folders"].as_array().unwrap().is_empty());
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }
}
