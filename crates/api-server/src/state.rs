//! Application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dash_core::project_log::ProjectLogStore;
use dash_core::repository::RepositoryStore;
use dash_core::settings::SettingStore;
use git_runner::{GitRunner, PullConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    data_dir: PathBuf,
    repository_store: RepositoryStore,
    project_log_store: ProjectLogStore,
    setting_store: SettingStore,
    runner: GitRunner,
    pull_config: PullConfig,
}

impl AppState {
    /// Create a new AppState with the given data directory
    pub async fn new(data_dir: PathBuf, pull_config: PullConfig) -> dash_core::Result<Self> {
        let repository_store = RepositoryStore::new(data_dir.join("repositories.json")).await?;
        let project_log_store = ProjectLogStore::new(data_dir.join("project_logs.json")).await?;
        let setting_store = SettingStore::new(data_dir.join("settings.json")).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                data_dir,
                repository_store,
                project_log_store,
                setting_store,
                runner: GitRunner::new(),
                pull_config,
            }),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    pub fn repository_store(&self) -> &RepositoryStore {
        &self.inner.repository_store
    }

    pub fn project_log_store(&self) -> &ProjectLogStore {
        &self.inner.project_log_store
    }

    pub fn setting_store(&self) -> &SettingStore {
        &self.inner.setting_store
    }

    pub fn runner(&self) -> &GitRunner {
        &self.inner.runner
    }

    /// Pull settings loaded at startup; never mutated afterwards
    pub fn pull_config(&self) -> &PullConfig {
        &self.inner.pull_config
    }
}
