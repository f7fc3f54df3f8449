//! Toolbelt server entry point.
//!
//! Opens (or creates) the SQLite database, derives the vault master key
//! from the configured passphrase, and starts the Axum HTTP server with
//! graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use toolbelt_core::crypto::MasterKey;
use toolbelt_core::vault::Vault;
use toolbelt_server::config::ServerConfig;
use toolbelt_server::routes;
use toolbelt_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(production = config.production, "toolbelt starting");

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data directory {}", parent.display()))?;
        }
    }

    let pool = toolbelt_store::db::connect(&config.database_path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_path))?;

    // Fatal in production when no passphrase is configured.
    let key = MasterKey::resolve(config.master_passphrase.as_deref(), config.production)
        .context("vault master passphrase is not configured")?;
    let vault = Vault::new(key, pool.clone());

    let state = Arc::new(AppState { pool, vault });
    let app = routes::app(state, !config.production);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "toolbelt server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("toolbelt server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
