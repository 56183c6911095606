// File: services/termin_backend/src/main.rs
use std::sync::Arc;
use termin_common::{logging, Context};
use termin_config::load_config;
use tokio::net::TcpListener;
use tracing::info;

mod app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config().context("Failed to load config")?);
    // Keeps the file appender flushing until shutdown.
    let _log_guard = logging::init_with_config(&config.logging);

    let app = app::build_app(config.clone())?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}
