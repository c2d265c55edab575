//! Argument vectors for the git log and pull commands

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ExecutionMode, PullConfig};

/// Upper bound for any `git log` invocation
pub const LOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Which `git log` view to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// Graph with one line per commit, 30 commits
    Graph,
    /// Graph with commit bodies, 20 commits
    Detailed,
    /// Flat history without merges, 30 commits
    Complete,
}

impl LogMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Detailed => "detailed",
            Self::Complete => "complete",
        }
    }

    fn log_args(&self) -> &'static [&'static str] {
        match self {
            Self::Graph => &[
                "--graph",
                "--pretty=format:%h (%an, %ar) %s%d",
                "--abbrev-commit",
                "--date=relative",
                "--max-count=30",
            ],
            Self::Detailed => &[
                "--graph",
                "--pretty=format:%h - %an, %ar : %s%n%b",
                "--abbrev-commit",
                "--date=relative",
                "--max-count=20",
            ],
            Self::Complete => &[
                "--pretty=format:%h (%an, %ar) %s%d",
                "--abbrev-commit",
                "--date=relative",
                "--no-merges",
                "--max-count=30",
            ],
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "graph" => Ok(Self::Graph),
            "detailed" => Ok(Self::Detailed),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("unknown log mode: {s}")),
        }
    }
}

/// One external process invocation, built fresh per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Build the `git log` invocation for `repo_path`.
///
/// The path only appears as the working directory and in the
/// `safe.directory` override, never inside the format string.
pub fn build_log_command(repo_path: &Path, mode: LogMode, all_branches: bool) -> CommandSpec {
    let spec = CommandSpec::new("git", LOG_TIMEOUT)
        .arg("-c")
        .arg(format!("safe.directory={}", repo_path.display()))
        .args(["-c", "core.preloadindex=true", "-c", "core.fscache=true"])
        .arg("log")
        .args(mode.log_args().iter().copied())
        .current_dir(repo_path);

    if all_branches {
        spec.arg("--all")
    } else {
        spec
    }
}

/// Build the pull script invocation according to the configured mode
pub fn build_pull_command(config: &PullConfig, repo_path: &Path) -> CommandSpec {
    let script = config.script_path.display().to_string();
    let repo = repo_path.display().to_string();

    let spec = match &config.mode {
        ExecutionMode::Direct => CommandSpec::new(script, config.timeout),
        ExecutionMode::SudoAsRoot => CommandSpec::new("sudo", config.timeout).arg(script),
        ExecutionMode::SudoAsUser { user } => CommandSpec::new("sudo", config.timeout)
            .args(["-u", user.as_str()])
            .arg(script),
    };

    spec.arg(repo).current_dir(repo_path)
}
