//! Error types for `toolbelt-core`.
//!
//! Crypto errors never include key material or plaintext — only lengths
//! and operation descriptions.

use toolbelt_store::StoreError;

/// Errors from cryptographic primitives.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// AES-256-GCM encryption failed.
    #[error("encryption failed: {reason}")]
    Encryption { reason: String },

    /// AES-256-GCM decryption failed (wrong key, corrupted ciphertext, or
    /// tampered tag). No plaintext is ever returned on failure.
    #[error("decryption failed: authentication error")]
    Decryption,

    /// The stored nonce does not have the expected length.
    #[error("invalid nonce length: expected {expected} bytes, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// The stored authentication tag does not have the expected length.
    #[error("invalid tag length: expected {expected} bytes, got {actual}")]
    InvalidTagLength { expected: usize, actual: usize },
}

/// Error resolving the master key from configuration.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Production mode requires an explicit passphrase — the process must
    /// not serve traffic without one.
    #[error("no master passphrase configured — set TOOLBELT_MASTER_PASSPHRASE")]
    MissingPassphrase,
}

/// Errors from vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// A stored secret failed decryption or decoding. Distinct from
    /// "not found" — the row exists but cannot be trusted.
    #[error("secret '{name}' failed integrity check: {reason}")]
    Integrity { name: String, reason: String },

    /// A cryptographic operation failed on the write path.
    #[error("vault crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The persistence layer returned an error.
    #[error("vault storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the script template engine.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// One or more required variables were absent or blank. All missing
    /// names are reported at once.
    #[error("missing required variable(s): {}", .names.join(", "))]
    MissingVariables { names: Vec<String> },
}
