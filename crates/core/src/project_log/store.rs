//! Project log persistent store

use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{ProjectLog, ProjectLogInput};
use crate::json_file;
use crate::{Error, Result};

/// Thread-safe project log store with file persistence
pub struct ProjectLogStore {
    path: PathBuf,
    cache: RwLock<HashMap<Uuid, ProjectLog>>,
}

impl ProjectLogStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = json_file::load::<ProjectLog>(&path)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    pub async fn create(&self, input: ProjectLogInput) -> Result<ProjectLog> {
        input.validate()?;

        let mut project_log = ProjectLog::new(input.name, input.log_path);
        project_log.description = input.description;
        project_log.is_active = input.is_active.unwrap_or(true);

        self.cache
            .write()
            .await
            .insert(project_log.id, project_log.clone());
        self.persist().await?;
        Ok(project_log)
    }

    pub async fn get(&self, id: Uuid) -> Option<ProjectLog> {
        self.cache.read().await.get(&id).cloned()
    }

    /// All project logs ordered by name
    pub async fn list(&self) -> Vec<ProjectLog> {
        let cache = self.cache.read().await;
        let mut logs: Vec<ProjectLog> = cache.values().cloned().collect();
        logs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        logs
    }

    /// Only the project logs shown on public pages
    pub async fn list_active(&self) -> Vec<ProjectLog> {
        self.list().await.into_iter().filter(|p| p.is_active).collect()
    }

    pub async fn update(&self, id: Uuid, input: ProjectLogInput) -> Result<ProjectLog> {
        input.validate()?;

        let updated = {
            let mut cache = self.cache.write().await;
            let project_log = cache
                .get_mut(&id)
                .ok_or_else(|| Error::ProjectLogNotFound(id.to_string()))?;

            project_log.name = input.name;
            project_log.log_path = input.log_path;
            project_log.description = input.description;
            if let Some(active) = input.is_active {
                project_log.is_active = active;
            }
            project_log.updated_at = Utc::now();
            project_log.clone()
        };

        self.persist().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<ProjectLog>> {
        let removed = self.cache.write().await.remove(&id);
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let logs: Vec<&ProjectLog> = cache.values().collect();
        json_file::save(&self.path, &logs).await
    }
}
