//! Frontend project folder listing

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::project_log::modified_local;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub name: String,
    pub path: String,
    /// Unix seconds
    pub modified_at: i64,
    /// e.g. "Mar 7 14:05"
    pub modified_at_formatted: String,
    /// e.g. "3 hours ago"
    pub modified_at_human: String,
}

/// Immediate subdirectories of `dir`, most recently modified first
pub async fn list_folders(dir: &Path) -> Result<Vec<Folder>> {
    let now = Local::now();
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut folders = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = match tokio::fs::metadata(entry.path()).await {
            Ok(metadata) if metadata.is_dir() => metadata,
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping {:?}: {}", entry.path(), e);
                continue;
            }
        };

        let modified = modified_local(&metadata);
        folders.push(Folder {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_string_lossy().into_owned(),
            modified_at: modified.timestamp(),
            modified_at_formatted: modified.format("%b %-d %H:%M").to_string(),
            modified_at_human: human_readable(now, modified),
        });
    }

    folders.sort_by(|a, b| b.modified_at.cmp(&a.modified_at).then_with(|| a.name.cmp(&b.name)));
    Ok(folders)
}

/// Relative age of `then`, falling back to a date after a week
pub fn human_readable(now: DateTime<Local>, then: DateTime<Local>) -> String {
    let secs = (now - then).num_seconds().abs();

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };

    match secs {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3_600, "hour"),
        s if s < 604_800 => plural(s / 86_400, "day"),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}
