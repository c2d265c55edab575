//! Repository persistent store
//!
//! Provides file-based persistence for repositories.

use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Repository, RepositoryInput};
use crate::json_file;
use crate::{Error, Result};

/// Thread-safe repository store with file persistence
pub struct RepositoryStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of repositories
    cache: RwLock<HashMap<Uuid, Repository>>,
}

impl RepositoryStore {
    /// Create a new RepositoryStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = json_file::load::<Repository>(&path)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Create a repository from validated input
    pub async fn create(&self, input: RepositoryInput) -> Result<Repository> {
        input.validate()?;

        let mut repository = Repository::new(input.name, input.git_log_path);
        repository.description = input.description;

        self.cache
            .write()
            .await
            .insert(repository.id, repository.clone());
        self.persist().await?;
        Ok(repository)
    }

    /// Get a repository by ID
    pub async fn get(&self, id: Uuid) -> Option<Repository> {
        self.cache.read().await.get(&id).cloned()
    }

    /// List all repositories ordered by name
    pub async fn list(&self) -> Vec<Repository> {
        let cache = self.cache.read().await;
        let mut repositories: Vec<Repository> = cache.values().cloned().collect();
        repositories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        repositories
    }

    /// Replace the editable fields of a repository
    pub async fn update(&self, id: Uuid, input: RepositoryInput) -> Result<Repository> {
        input.validate()?;

        let updated = {
            let mut cache = self.cache.write().await;
            let repository = cache
                .get_mut(&id)
                .ok_or_else(|| Error::RepositoryNotFound(id.to_string()))?;

            repository.name = input.name;
            repository.git_log_path = input.git_log_path;
            repository.description = input.description;
            repository.updated_at = Utc::now();
            repository.clone()
        };

        self.persist().await?;
        Ok(updated)
    }

    /// Delete a repository
    pub async fn delete(&self, id: Uuid) -> Result<Option<Repository>> {
        let removed = self.cache.write().await.remove(&id);
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Persist the cache to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let repositories: Vec<&Repository> = cache.values().collect();
        json_file::save(&self.path, &repositories).await
    }
}
