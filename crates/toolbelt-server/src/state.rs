//! Shared application state.
//!
//! One [`AppState`] is constructed at startup and shared across all Axum
//! handlers via `Arc`. It holds the connection pool for the CRUD
//! repositories and the vault, which wraps the same pool together with
//! the process-lifetime master key.

use sqlx::SqlitePool;

use toolbelt_core::vault::Vault;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// SQLite pool used by the notes/tasks/scripts repositories.
    pub pool: SqlitePool,
    /// The secret vault.
    pub vault: Vault,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
