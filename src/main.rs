mod config;
mod error;
mod github;
mod server;
mod stats;
mod svg;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use github::GithubClient;
use server::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("top_langs=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let client = GithubClient::new(config.api_url.clone(), config.token())?;
    if config.token().is_none() {
        tracing::warn!("GITHUB_TOKEN not set; using unauthenticated GitHub rate limits");
    }

    let state = AppState {
        api: Arc::new(client),
        top_n: config.top_n,
        static_dir: config.static_dir.clone(),
    };

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!("listening on {}", config.bind);

    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
