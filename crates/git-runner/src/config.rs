//! Pull configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_PULL_SCRIPT: &str = "/usr/local/bin/git-pull.sh";
pub const DEFAULT_PULL_TIMEOUT: Duration = Duration::from_secs(60);

/// Privilege strategy for running the pull script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run the script as the service user
    Direct,
    /// `sudo <script> <repo>`
    SudoAsRoot,
    /// `sudo -u <user> <script> <repo>`
    SudoAsUser { user: String },
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::SudoAsRoot => "sudo-as-root",
            Self::SudoAsUser { .. } => "sudo-as-user",
        }
    }
}

/// Settings for the git pull helper, loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullConfig {
    pub script_path: PathBuf,
    pub timeout: Duration,
    pub mode: ExecutionMode,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from(DEFAULT_PULL_SCRIPT),
            timeout: DEFAULT_PULL_TIMEOUT,
            mode: ExecutionMode::SudoAsRoot,
        }
    }
}

impl PullConfig {
    /// Read `GIT_PULL_SCRIPT_PATH`, `GIT_PULL_TIMEOUT`, `GIT_PULL_MODE` and
    /// `GIT_PULL_USER` from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let script_path = var("GIT_PULL_SCRIPT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PULL_SCRIPT));

        let timeout = match var("GIT_PULL_TIMEOUT") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout { value: raw }),
            },
            None => DEFAULT_PULL_TIMEOUT,
        };

        let mode = parse_mode(var("GIT_PULL_MODE").as_deref(), var("GIT_PULL_USER"))?;

        Ok(Self {
            script_path,
            timeout,
            mode,
        })
    }
}

fn parse_mode(mode: Option<&str>, user: Option<String>) -> Result<ExecutionMode, ConfigError> {
    let Some(mode) = mode else {
        return Ok(ExecutionMode::SudoAsRoot);
    };

    match mode.to_ascii_lowercase().as_str() {
        // "user" is the historical name for running as the web server user
        "direct" | "user" => Ok(ExecutionMode::Direct),
        "sudo" | "sudo-as-root" => Ok(ExecutionMode::SudoAsRoot),
        "sudo-as-user" => {
            let user = user.ok_or(ConfigError::MissingUser)?;
            if !is_valid_user(&user) {
                return Err(ConfigError::InvalidUser { user });
            }
            Ok(ExecutionMode::SudoAsUser { user })
        }
        _ => Err(ConfigError::UnknownMode {
            mode: mode.to_string(),
        }),
    }
}

/// A leading `-` would be read by sudo as an option.
fn is_valid_user(user: &str) -> bool {
    !user.starts_with('-')
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
