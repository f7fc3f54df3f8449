//! Error type for the persistence layer.

/// Errors from repository operations.
///
/// Database failures are propagated untouched — the HTTP layer maps them
/// to 500 responses without retrying.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying SQLite database returned an error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serializing a value for storage failed (execution history payloads).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
