//! Server configuration read from the environment at startup

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use git_runner::PullConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_DATA_DIR: &str = ".dash-data";

/// Requests allowed per minute for each throttled route group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    /// git log views, log files and frontend folders
    pub reads_per_minute: u32,
    /// git pull
    pub pulls_per_minute: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            reads_per_minute: 30,
            pulls_per_minute: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub pull: PullConfig,
    pub limits: RateLimits,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = env_var("DASH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let bind_addr = env_var("DASH_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("DASH_BIND_ADDR must be a socket address such as 0.0.0.0:8081")?;

        let defaults = RateLimits::default();
        let limits = RateLimits {
            reads_per_minute: env_limit("DASH_READ_LIMIT", defaults.reads_per_minute)?,
            pulls_per_minute: env_limit("DASH_PULL_LIMIT", defaults.pulls_per_minute)?,
        };

        let pull = PullConfig::from_env().context("Invalid git pull configuration")?;

        Ok(Self {
            data_dir,
            bind_addr,
            pull,
            limits,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_limit(name: &str, default: u32) -> Result<u32> {
    match env_var(name) {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .with_context(|| format!("{name} must be a positive integer, got '{raw}'")),
        None => Ok(default),
    }
}
