//! Listing and reading files inside a project log directory

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::{Error, Result};

/// Extensions treated as log files
pub const LOG_EXTENSIONS: [&str; 3] = ["log", "txt", "php"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One log file in a directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    /// Unix seconds
    pub modified: i64,
    pub modified_formatted: String,
}

/// Content of one log file, newest line first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogContent {
    pub filename: String,
    pub content: String,
    pub size: u64,
    pub modified: String,
}

/// Modification time of `metadata` in local time, epoch if unavailable
pub(crate) fn modified_local(metadata: &std::fs::Metadata) -> DateTime<Local> {
    metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| DateTime::<Local>::from(std::time::UNIX_EPOCH))
}

/// Log files directly inside `dir`, newest first.
///
/// A missing or non-directory path yields an empty list.
pub async fn list_log_files(dir: &Path) -> Result<Vec<LogFile>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_log = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| LOG_EXTENSIONS.contains(&ext));
        if !is_log {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping {:?}: {}", path, e);
                continue;
            }
        };

        let modified = modified_local(&metadata);
        files.push(LogFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: path.to_string_lossy().into_owned(),
            size: metadata.len(),
            modified: modified.timestamp(),
            modified_formatted: modified.format(TIMESTAMP_FORMAT).to_string(),
        });
    }

    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

/// Read `file_name` from `dir` with its lines reversed.
///
/// Only the base name of `file_name` is used, and the resolved file must
/// stay inside `dir` after following symlinks.
pub async fn read_log_content(dir: &Path, file_name: &str) -> Result<LogContent> {
    let base = Path::new(file_name)
        .file_name()
        .ok_or_else(|| Error::InvalidInput("file name is required".to_string()))?;
    let file_path = dir.join(base);

    if !file_path.exists() {
        return Err(Error::NotFound(format!(
            "File not found: {}",
            base.to_string_lossy()
        )));
    }

    let real_dir = tokio::fs::canonicalize(dir).await?;
    let real_file = tokio::fs::canonicalize(&file_path).await?;
    if !real_file.starts_with(&real_dir) {
        return Err(Error::AccessDenied(format!(
            "{} is outside the log directory",
            base.to_string_lossy()
        )));
    }

    let bytes = tokio::fs::read(&real_file).await?;
    let metadata = tokio::fs::metadata(&real_file).await?;
    let content = String::from_utf8_lossy(&bytes)
        .split('\n')
        .rev()
        .collect::<Vec<_>>()
        .join("\n");

    Ok(LogContent {
        filename: base.to_string_lossy().into_owned(),
        content,
        size: metadata.len(),
        modified: modified_local(&metadata).format(TIMESTAMP_FORMAT).to_string(),
    })
}
