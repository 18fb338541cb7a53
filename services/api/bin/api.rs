//! Main Entrypoint for the Session Gateway
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the vendor client around the server-held credential.
//! 3. Constructing the Axum router.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use callbridge_api::{
    config::Config, router::create_router, state::AppState, vendor::RetellClient,
};
use std::sync::Arc;
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize the Vendor Client ---
    let vendor = RetellClient::new(
        &config.retell_api_base,
        config.retell_api_key.clone(),
        config.vendor_timeout,
    )
    .context("Failed to build vendor HTTP client")?;

    let app_state = Arc::new(AppState {
        vendor: Arc::new(vendor),
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router ---
    let app = create_router(app_state);

    // --- 5. Start Server ---
    info!(
        vendor = %config.retell_api_base,
        allowed_domains = ?config.allowed_origins.domains(),
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Server is running on http://localhost:{}", config.bind_address.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}
