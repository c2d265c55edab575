//! Setting persistent store

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::json_file;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// Thread-safe key/value store with file persistence
pub struct SettingStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, Setting>>,
}

impl SettingStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = json_file::load::<Setting>(&path)
            .await?
            .into_iter()
            .map(|s| (s.key.clone(), s))
            .collect();

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Value stored under `key`, if any
    pub async fn get_value(&self, key: &str) -> Option<String> {
        self.cache.read().await.get(key).map(|s| s.value.clone())
    }

    /// Insert or replace the setting stored under `key`
    pub async fn set_value(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        description: Option<String>,
    ) -> Result<Setting> {
        let setting = Setting {
            key: key.into(),
            value: value.into(),
            description,
        };

        self.cache
            .write()
            .await
            .insert(setting.key.clone(), setting.clone());
        self.persist().await?;
        Ok(setting)
    }

    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let mut settings: Vec<&Setting> = cache.values().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        json_file::save(&self.path, &settings).await
    }
}
