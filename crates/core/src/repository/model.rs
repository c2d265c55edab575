//! Repository model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::json_file::validate_named_path;
use crate::Result;

/// A configured repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Unique repository identifier
    pub id: Uuid,

    /// Display name (e.g., "billing-service")
    pub name: String,

    /// Absolute path of the working tree whose log is shown
    pub git_log_path: String,

    /// Free-form description
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    /// Create a new repository with required fields
    pub fn new(name: impl Into<String>, git_log_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            git_log_path: git_log_path.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Fields accepted when creating or replacing a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInput {
    pub name: String,
    pub git_log_path: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl RepositoryInput {
    /// Reject blank names or paths and names over 255 characters
    pub fn validate(&self) -> Result<()> {
        validate_named_path(&self.name, &self.git_log_path, "gitLogPath")
    }
}
