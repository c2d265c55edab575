//! Execution outcomes and their normalized classification

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Result of one runner invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Exit code zero
    Success { stdout: String, stderr: String },
    /// Rejected before anything was spawned
    ValidationFailed(ValidationError),
    /// Non-zero exit, killed by a signal, or could not be started
    ExecutionFailed {
        stderr: String,
        exit_code: Option<i32>,
    },
    /// Killed after exceeding its timeout
    TimedOut { after: Duration },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Standard output of a successful run
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::Success { stdout, .. } => Some(stdout),
            _ => None,
        }
    }
}

impl From<ValidationError> for ExecutionOutcome {
    fn from(err: ValidationError) -> Self {
        Self::ValidationFailed(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeKind {
    Success,
    NotFound,
    NotAGitRepository,
    InvalidConfiguration,
    TimedOut,
    ExecutionFailed,
}

impl OutcomeKind {
    /// HTTP status a caller should answer with
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Success => 200,
            Self::NotFound => 404,
            Self::NotAGitRepository => 400,
            Self::InvalidConfiguration => 500,
            Self::TimedOut => 504,
            Self::ExecutionFailed => 500,
        }
    }
}

/// Outcome triple handed to the response layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classified {
    pub kind: OutcomeKind,
    pub message: String,
    pub status: u16,
}

impl Classified {
    fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.status_hint(),
        }
    }
}

pub fn classify(outcome: &ExecutionOutcome) -> Classified {
    match outcome {
        ExecutionOutcome::Success { .. } => Classified::new(OutcomeKind::Success, "ok"),
        ExecutionOutcome::ValidationFailed(err) => {
            let kind = match err {
                ValidationError::NotFound { .. } => OutcomeKind::NotFound,
                ValidationError::NotAGitRepository { .. } => OutcomeKind::NotAGitRepository,
                ValidationError::ScriptNotFound { .. }
                | ValidationError::ScriptNotExecutable { .. }
                | ValidationError::UnsafeScriptPath { .. }
                | ValidationError::UnsafeRepoArgument { .. } => OutcomeKind::InvalidConfiguration,
            };
            Classified::new(kind, err.to_string())
        }
        ExecutionOutcome::ExecutionFailed { stderr, exit_code } => {
            let detail = stderr.trim();
            let message = match (exit_code, detail.is_empty()) {
                (Some(code), true) => format!("Command exited with status {code}"),
                (Some(code), false) => format!("Command exited with status {code}: {detail}"),
                (None, true) => "Command failed".to_string(),
                (None, false) => format!("Command failed: {detail}"),
            };
            Classified::new(OutcomeKind::ExecutionFailed, message)
        }
        ExecutionOutcome::TimedOut { after } => Classified::new(
            OutcomeKind::TimedOut,
            format!("Command timed out after {} seconds", after.as_secs_f64()),
        ),
    }
}
