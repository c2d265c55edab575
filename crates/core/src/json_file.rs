//! JSON file persistence shared by the record stores

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::Result;

/// Load every record from `path`, or nothing if the file does not exist yet
pub(crate) async fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Overwrite `path` with `records`, creating parent directories as needed
pub(crate) async fn save<T: Serialize>(path: &Path, records: &[&T]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Shared field checks for named, path-bearing records
pub(crate) fn validate_named_path(name: &str, path: &str, path_field: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(crate::Error::InvalidInput("name is required".to_string()));
    }
    if name.chars().count() > 255 {
        return Err(crate::Error::InvalidInput(
            "name may not be longer than 255 characters".to_string(),
        ));
    }
    if path.trim().is_empty() {
        return Err(crate::Error::InvalidInput(format!("{path_field} is required")));
    }
    Ok(())
}
