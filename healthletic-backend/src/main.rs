mod config;
mod db;
mod echo;
mod handlers;
mod health;
mod metrics;
mod state;

use anyhow::Context;
use config::Config;
use state::AppState;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = handlers::router(state);

    let addr = cfg.listen;
    let server = axum::Server::try_bind(&addr)
        .with_context(|| format!("failed to bind {}", addr))?
        .serve(app.into_make_service());
    info!(%addr, "Starting healthletic-backend");

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
