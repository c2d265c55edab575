//! Validate, build and execute in one call

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::commands::{build_log_command, build_pull_command, LogMode};
use crate::config::PullConfig;
use crate::error::ValidationError;
use crate::outcome::ExecutionOutcome;
use crate::process::{CommandExecutor, ProcessExecutor};
use crate::validate::{
    check_script, is_safe_repo_argument, is_safe_script_path, validate_repository_path,
    RepoRequirement,
};

/// Repository the caller wants to operate on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub path: PathBuf,
    pub name: String,
    pub description: Option<String>,
}

impl RepositoryRef {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Runs git log queries and the pull script against repositories.
///
/// Stateless apart from the executor; every call validates before spawning.
#[derive(Debug, Clone, Default)]
pub struct GitRunner<E = ProcessExecutor> {
    executor: E,
}

impl GitRunner<ProcessExecutor> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: CommandExecutor> GitRunner<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Read-only `git log` in the requested view
    pub async fn git_log(
        &self,
        repo: &RepositoryRef,
        mode: LogMode,
        all_branches: bool,
    ) -> ExecutionOutcome {
        if let Err(e) = validate_repository_path(&repo.path, RepoRequirement::GitWorkTree) {
            debug!(repo = %repo.name, error = %e, "git log rejected");
            return e.into();
        }

        let spec = build_log_command(&repo.path, mode, all_branches);
        self.executor.execute(&spec).await
    }

    /// Run the configured pull script against `repo`
    pub async fn git_pull(&self, config: &PullConfig, repo: &RepositoryRef) -> ExecutionOutcome {
        if let Err(e) = check_pull(config, &repo.path) {
            warn!(repo = %repo.name, error = %e, "git pull rejected");
            return e.into();
        }

        info!(
            repo = %repo.name,
            path = %repo.path.display(),
            mode = config.mode.as_str(),
            "running git pull script"
        );

        let spec = build_pull_command(config, &repo.path);
        let outcome = self.executor.execute(&spec).await;

        if !outcome.is_success() {
            warn!(repo = %repo.name, outcome = ?outcome, "git pull did not succeed");
        }
        outcome
    }
}

fn check_pull(config: &PullConfig, repo_path: &Path) -> Result<(), ValidationError> {
    if !is_safe_script_path(&config.script_path) {
        return Err(ValidationError::UnsafeScriptPath {
            path: config.script_path.clone(),
        });
    }

    check_script(&config.script_path)?;

    if !is_safe_repo_argument(repo_path) {
        return Err(ValidationError::UnsafeRepoArgument {
            path: repo_path.to_path_buf(),
        });
    }

    validate_repository_path(repo_path, RepoRequirement::Exists)
}
