//! Server configuration.
//!
//! Loaded from environment variables with development-friendly defaults.
//! All settings can be overridden via `TOOLBELT_*` variables.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Log level filter (e.g. `info`, `debug`, `warn`).
    pub log_level: String,
    /// Master passphrase for the secret vault. Required in production mode.
    pub master_passphrase: Option<String>,
    /// Production mode: no passphrase fallback, no permissive CORS.
    pub production: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TOOLBELT_BIND_ADDR` — full bind address (overrides `PORT`, default `127.0.0.1:3001`)
    /// - `PORT` — port only, binds to `0.0.0.0`
    /// - `TOOLBELT_DB_PATH` — SQLite file path (default `./data/toolbelt.db`)
    /// - `TOOLBELT_LOG_LEVEL` — log filter (default `info`)
    /// - `TOOLBELT_MASTER_PASSPHRASE` — vault passphrase
    /// - `TOOLBELT_PRODUCTION` — `true`/`1` enables production mode (default `false`)
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = if let Ok(addr) = std::env::var("TOOLBELT_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3001)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(3001);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 3001))
        };

        let database_path = std::env::var("TOOLBELT_DB_PATH")
            .unwrap_or_else(|_| "./data/toolbelt.db".to_owned());

        let log_level =
            std::env::var("TOOLBELT_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let master_passphrase = std::env::var("TOOLBELT_MASTER_PASSPHRASE").ok();

        let production = std::env::var("TOOLBELT_PRODUCTION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            bind_addr,
            database_path,
            log_level,
            master_passphrase,
            production,
        }
    }
}
