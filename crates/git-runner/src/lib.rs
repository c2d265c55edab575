//! Git command runner
//!
//! Builds and runs the small fixed set of external commands the dashboard
//! needs: read-only `git log` views and a configured pull helper script.
//! Every invocation is validated up front, passed to the child as a discrete
//! argument vector, and bounded by a timeout.

mod commands;
mod config;
mod error;
mod outcome;
mod process;
mod runner;
mod validate;

pub use commands::{build_log_command, build_pull_command, CommandSpec, LogMode, LOG_TIMEOUT};
pub use config::{ExecutionMode, PullConfig, DEFAULT_PULL_SCRIPT, DEFAULT_PULL_TIMEOUT};
pub use error::{ConfigError, Result, RunnerError, ValidationError};
pub use outcome::{classify, Classified, ExecutionOutcome, OutcomeKind};
pub use process::{execute, CommandExecutor, ProcessExecutor};
pub use runner::{GitRunner, RepositoryRef};
pub use validate::{
    check_script, is_safe_repo_argument, is_safe_script_path, validate_repository_path,
    RepoRequirement,
};
