//! SpendSmart backend - Main Application Entry Point
//!
//! REST API server for a personal-finance tracker: registration, login,
//! and CRUD over per-user transactions held in a key-value item store.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Connect the store client (explicit, once; no global singleton)
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port
//! 5. On shutdown signal, drain requests and release the store client

use spendsmart_backend::{config::Config, state::{AppState, Tables}, store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect the store client
    let store = store::connect(&config);
    tracing::info!(
        users_table = %config.users_table,
        transactions_table = %config.transactions_table,
        "Store client connected"
    );

    let state = AppState {
        store: store.clone(),
        tables: Tables::from_config(&config),
    };
    let app = spendsmart_backend::app(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Serve until a shutdown signal arrives, then drain in-flight requests
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Explicit store release pairs with the explicit connect above
    store.shutdown().await?;
    tracing::info!("Store client released, exiting");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
