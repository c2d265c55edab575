//! API Server for the Git Log Dashboard
//!
//! Serves the REST API for repository git logs, git pulls, project log
//! files and the frontend folder listing.

mod config;
mod routes;
mod state;
mod throttle;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=debug,git_runner=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Using data directory: {:?}", config.data_dir);
    tracing::info!(
        "git pull: script {:?}, mode {}, timeout {}s",
        config.pull.script_path,
        config.pull.mode.as_str(),
        config.pull.timeout.as_secs()
    );

    let app_state = AppState::new(config.data_dir.clone(), config.pull.clone())
        .await
        .context("Failed to initialize application state")?;

    let app = routes::router(app_state, config.limits)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("REST API listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
