//! Git log views and the pull helper
//!
//! Both delegate to [`git_runner::GitRunner`]; the classified outcome's
//! status hint becomes the HTTP status.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dash_core::repository::Repository;
use git_runner::{classify, Classified, ExecutionOutcome, LogMode, OutcomeKind, RepositoryRef};

use super::repositories::find_repository;
use super::{ErrorResponse, ResourceId, RouteError};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GitLogQuery {
    /// Include every ref instead of only HEAD's ancestry
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitLogResponse {
    pub repository: Repository,
    pub mode: LogMode,
    pub all_branches: bool,
    pub git_log: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub success: bool,
    pub kind: OutcomeKind,
    pub message: String,
    pub output: String,
}

fn repository_ref(repository: &Repository) -> RepositoryRef {
    RepositoryRef {
        path: repository.git_log_path.clone().into(),
        name: repository.name.clone(),
        description: repository.description.clone(),
    }
}

fn status_of(classified: &Classified) -> StatusCode {
    StatusCode::from_u16(classified.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn run_log(
    state: AppState,
    id: Uuid,
    mode: LogMode,
    query: GitLogQuery,
) -> Result<Json<GitLogResponse>, RouteError> {
    let repository = find_repository(&state, id).await?;
    let outcome = state
        .runner()
        .git_log(&repository_ref(&repository), mode, query.all)
        .await;

    match outcome {
        ExecutionOutcome::Success { stdout, .. } => Ok(Json(GitLogResponse {
            repository,
            mode,
            all_branches: query.all,
            git_log: stdout,
        })),
        failed => {
            let classified = classify(&failed);
            let error = match classified.kind {
                OutcomeKind::ExecutionFailed => {
                    format!("Failed to get git log: {}", classified.message)
                }
                _ => classified.message.clone(),
            };
            Err((
                status_of(&classified),
                Json(ErrorResponse {
                    error,
                    kind: Some(classified.kind),
                }),
            ))
        }
    }
}

/// GET /api/git-log/{id}
async fn graph_log(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    Query(query): Query<GitLogQuery>,
) -> Result<Json<GitLogResponse>, RouteError> {
    run_log(state, id, LogMode::Graph, query).await
}

/// GET /api/git-log/{id}/detailed
async fn detailed_log(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    Query(query): Query<GitLogQuery>,
) -> Result<Json<GitLogResponse>, RouteError> {
    run_log(state, id, LogMode::Detailed, query).await
}

/// GET /api/git-log/{id}/complete
async fn complete_log(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    Query(query): Query<GitLogQuery>,
) -> Result<Json<GitLogResponse>, RouteError> {
    run_log(state, id, LogMode::Complete, query).await
}

/// POST /api/git-pull/{id}
async fn git_pull(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<(StatusCode, Json<PullResponse>), RouteError> {
    let repository = find_repository(&state, id).await?;
    let outcome = state
        .runner()
        .git_pull(state.pull_config(), &repository_ref(&repository))
        .await;

    let classified = classify(&outcome);
    let output = match &outcome {
        ExecutionOutcome::Success { stdout, stderr } => {
            [stdout.trim_end(), stderr.trim_end()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n")
        }
        ExecutionOutcome::ExecutionFailed { stderr, .. } => stderr.clone(),
        _ => String::new(),
    };

    let message = match classified.kind {
        OutcomeKind::Success => format!("Pulled {} successfully", repository.name),
        _ => classified.message.clone(),
    };

    Ok((
        status_of(&classified),
        Json(PullResponse {
            success: outcome.is_success(),
            kind: classified.kind,
            message,
            output,
        }),
    ))
}

pub fn log_router() -> Router<AppState> {
    Router::new()
        .route("/api/git-log/{id}", get(graph_log))
        .route("/api/git-log/{id}/detailed", get(detailed_log))
        .route("/api/git-log/{id}/complete", get(complete_log))
}

pub fn pull_router() -> Router<AppState> {
    Router::new().route("/api/git-pull/{id}", post(git_pull))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use axum::http::StatusCode;
    use tempfile::TempDir;

    use dash_core::repository::RepositoryInput;
    use git_runner::{ExecutionMode, PullConfig};

    use crate::config::RateLimits;
    use crate::routes::test_support::{build_state, build_state_with, send};
    use crate::state::AppState;

    fn git(dir: &Path, args: &[&str]) {
        let output = std::process::Command::new("git")
            .args(["-c", "user.email=test@test.com", "-c", "user.name=Test"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed");
    }

    fn init_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init"]);
        std::fs::write(dir.path().join("README.md"), "hello").unwrap();
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "-m", "Add readme"]);
        dir
    }

    async fn add_repository(state: &AppState, path: &Path) -> String {
        state
            .repository_store()
            .create(RepositoryInput {
                name: "demo".to_string(),
                git_log_path: path.to_string_lossy().to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
            .to_string()
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("git-pull.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[tokio::test]
    async fn git_log_views_for_real_repository() {
        let repo = init_test_repo();
        let (state, _temp_dir) = build_state().await;
        let id = add_repository(&state, repo.path()).await;
        let app = super::log_router().with_state(state);

        for suffix in ["", "/detailed", "/complete", "?all=true"] {
            let (status, body) = send(&app, "GET", &format!("/api/git-log/{id}{suffix}"), None).await;
            assert_eq!(status, StatusCode::OK, "{suffix}");
            assert!(body["gitLog"].as_str().unwrap().contains("Add readme"), "{suffix}");
            assert_eq!(body["repository"]["name"], "demo");
        }

        let (_, body) = send(&app, "GET", &format!("/api/git-log/{id}/detailed?all=true"), None).await;
        assert_eq!(body["mode"], "detailed");
        assert_eq!(body["allBranches"], true);
    }

    #[tokio::test]
    async fn git_log_classifies_bad_paths() {
        let plain = TempDir::new().unwrap();
        let (state, _temp_dir) = build_state().await;
        let not_git = add_repository(&state, plain.path()).await;
        let missing = add_repository(&state, &plain.path().join("gone")).await;
        let app = super::log_router().with_state(state);

        let (status, body) = send(&app, "GET", &format!("/api/git-log/{not_git}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "notAGitRepository");

        let (status, body) = send(&app, "GET", &format!("/api/git-log/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "notFound");

        let unknown = uuid::Uuid::new_v4();
        let (status, body) = send(&app, "GET", &format!("/api/git-log/{unknown}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Repository not found");

        let (status, body) = send(&app, "GET", "/api/git-log/not-a-uuid/detailed", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "{body}");
    }

    #[tokio::test]
    async fn pull_with_missing_script_is_configuration_error() {
        let repo = TempDir::new().unwrap();
        let script = repo.path().join("no-such-script.sh");
        let (state, _temp_dir) = build_state_with(PullConfig {
            script_path: script.clone(),
            timeout: Duration::from_secs(5),
            mode: ExecutionMode::Direct,
        })
        .await;
        let id = add_repository(&state, repo.path()).await;
        let app = super::pull_router().with_state(state);

        let (status, body) = send(&app, "POST", &format!("/api/git-pull/{id}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "invalidConfiguration");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains(&script.display().to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pull_runs_script_and_reports_output() {
        let repo = TempDir::new().unwrap();
        let script = write_script(repo.path(), "echo \"Already up to date: $1\"");
        let (state, _temp_dir) = build_state_with(PullConfig {
            script_path: script,
            timeout: Duration::from_secs(5),
            mode: ExecutionMode::Direct,
        })
        .await;
        let id = add_repository(&state, repo.path()).await;
        let app = super::pull_router().with_state(state);

        let (status, body) = send(&app, "POST", &format!("/api/git-pull/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["kind"], "success");
        assert_eq!(
            body["output"],
            format!("Already up to date: {}", repo.path().display())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_and_slow_pulls_are_classified() {
        let repo = TempDir::new().unwrap();
        let scripts = TempDir::new().unwrap();
        let failing = write_script(scripts.path(), "echo 'merge conflict' >&2; exit 1");

        let (state, _temp_dir) = build_state_with(PullConfig {
            script_path: failing,
            timeout: Duration::from_secs(5),
            mode: ExecutionMode::Direct,
        })
        .await;
        let id = add_repository(&state, repo.path()).await;
        let app = super::pull_router().with_state(state);

        let (status, body) = send(&app, "POST", &format!("/api/git-pull/{id}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "executionFailed");
        assert_eq!(body["output"], "merge conflict\n");

        let slow_dir = TempDir::new().unwrap();
        let slow = write_script(slow_dir.path(), "sleep 30");
        let (state, _temp_dir) = build_state_with(PullConfig {
            script_path: slow,
            timeout: Duration::from_secs(1),
            mode: ExecutionMode::Direct,
        })
        .await;
        let id = add_repository(&state, repo.path()).await;
        let app = super::pull_router().with_state(state);

        let (status, body) = send(&app, "POST", &format!("/api/git-pull/{id}"), None).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["kind"], "timedOut");
    }

    #[tokio::test]
    async fn pulls_are_throttled() {
        let repo = TempDir::new().unwrap();
        let (state, _temp_dir) = build_state_with(PullConfig {
            script_path: repo.path().join("missing.sh"),
            ..PullConfig::default()
        })
        .await;
        let id = add_repository(&state, repo.path()).await;
        let app = crate::routes::router(
            state,
            RateLimits {
                reads_per_minute: 30,
                pulls_per_minute: 1,
            },
        );

        let (status, _) = send(&app, "POST", &format!("/api/git-pull/{id}"), None).await;
        assert_ne!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, body) = send(&app, "POST", &format!("/api/git-pull/{id}"), None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(body["error"].as_str().unwrap().contains("Too many requests"));

        // Reads have their own budget
        let (status, _) = send(&app, "GET", &format!("/api/git-log/{id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
