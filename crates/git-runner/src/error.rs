//! Error types for git-runner operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Checks that fail before any process is spawned.
///
/// The first two variants describe the caller's repository record; the rest
/// describe operator configuration and carry the offending path so setup can
/// be fixed without digging through logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Repository path does not reference an existing directory
    #[error("Repository path does not exist: {path}")]
    NotFound { path: PathBuf },

    /// Directory exists but has no `.git` subdirectory
    #[error("Path is not a git repository: {path}")]
    NotAGitRepository { path: PathBuf },

    /// Pull script is missing
    #[error("Git pull script not found at {path}")]
    ScriptNotFound { path: PathBuf },

    /// Pull script exists but cannot be executed
    #[error("Git pull script is not executable: {path}")]
    ScriptNotExecutable { path: PathBuf },

    /// Pull script path failed the character/traversal check
    #[error("Git pull script path is not allowed: {path}")]
    UnsafeScriptPath { path: PathBuf },

    /// Repository argument failed the character/traversal check
    #[error("Repository path is not allowed as a pull argument: {path}")]
    UnsafeRepoArgument { path: PathBuf },
}

impl ValidationError {
    /// Whether this is an operator-facing configuration problem rather than
    /// a problem with the requested repository
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ScriptNotFound { .. }
                | Self::ScriptNotExecutable { .. }
                | Self::UnsafeScriptPath { .. }
                | Self::UnsafeRepoArgument { .. }
        )
    }
}

/// Errors raised while loading pull configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown git pull mode '{mode}' (expected direct, user, sudo, sudo-as-root or sudo-as-user)")]
    UnknownMode { mode: String },

    #[error("Git pull mode 'sudo-as-user' requires GIT_PULL_USER to be set")]
    MissingUser,

    #[error("Invalid git pull user '{user}'")]
    InvalidUser { user: String },

    #[error("Invalid git pull timeout '{value}': expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

/// Errors that can occur inside the runner itself
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Process could not be started
    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error while waiting on or reading from the child
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Create a SpawnFailed error
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }
}
