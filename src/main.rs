mod config;
mod handlers;
mod models;
mod server;
mod services;

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use server::{connection, create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so RUST_LOG from it is honoured
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("🚀 Starting tooth analyzer...");

    let config = Config::from_env()?;
    log::info!("✅ Upstream model: {} ({})", config.model, config.responses_url());
    match config.upstream_timeout {
        Some(timeout) => log::info!("⏱️ Upstream timeout: {}s", timeout.as_secs()),
        None => log::info!("⏱️ Upstream timeout disabled"),
    }
    if config.api_key.is_none() {
        log::warn!("⚠️ ARK_API_KEY not set, /api/analyze will answer 500");
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    log::info!("🦷 Tooth analyzer running on http://localhost:{}", config.port);

    connection::serve(listener, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("❌ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    log::info!("🛑 Shutting down...");

    Ok(())
}
