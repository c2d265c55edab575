//! Project log model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::json_file::validate_named_path;
use crate::Result;

/// A directory of log files exposed on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLog {
    pub id: Uuid,
    pub name: String,
    /// Directory containing the log files
    pub log_path: String,
    pub description: Option<String>,
    /// Inactive folders are hidden from the public views
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectLog {
    pub fn new(name: impl Into<String>, log_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            log_path: log_path.into(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields accepted when creating or replacing a project log.
///
/// `is_active` defaults to true on create and is left unchanged on update
/// when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLogInput {
    pub name: String,
    pub log_path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ProjectLogInput {
    pub fn validate(&self) -> Result<()> {
        validate_named_path(&self.name, &self.log_path, "logPath")
    }
}
