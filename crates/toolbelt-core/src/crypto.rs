//! Cryptographic primitives for the secret vault.
//!
//! Provides AES-256-GCM authenticated encryption with the master key
//! derived from a passphrase via SHA-256. Key material is zeroized on drop
//! and never appears in `Debug` output.
//!
//! # Security model
//!
//! - Every encryption generates a fresh 96-bit nonce via `OsRng`; nonces
//!   are never derived from the secret name or value.
//! - Ciphertext, nonce, and the 128-bit tag are stored as separate fields
//!   and must all come from the same encryption call.
//! - Decryption fails closed: a tag mismatch returns an error, never
//!   partial plaintext.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, KeyError};

/// Nonce length for AES-256-GCM (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length for AES-256-GCM (128 bits).
pub const TAG_LEN: usize = 16;

/// Fixed development passphrase, used only when no passphrase is
/// configured outside production mode.
const DEV_PASSPHRASE: &str = "toolbelt-dev-passphrase";

/// The 256-bit master key, zeroized on drop.
///
/// Derived once per process and held for the process lifetime; never
/// logged or persisted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; 32]);

impl MasterKey {
    /// Create a key from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a key from a passphrase via SHA-256.
    #[must_use]
    pub fn from_passphrase(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Resolve the master key from configuration.
    ///
    /// In production mode a missing or empty passphrase is fatal. Outside
    /// production a fixed development passphrase is substituted with a
    /// conspicuous warning — a deliberately weakened default for local
    /// development only.
    pub fn resolve(passphrase: Option<&str>, production: bool) -> Result<Self, KeyError> {
        match passphrase {
            Some(p) if !p.is_empty() => Ok(Self::from_passphrase(p)),
            _ if production => Err(KeyError::MissingPassphrase),
            _ => {
                tracing::warn!(
                    "no master passphrase configured — falling back to the built-in \
                     development passphrase; stored secrets are NOT protected"
                );
                Ok(Self::from_passphrase(DEV_PASSPHRASE))
            }
        }
    }

    /// Borrow the raw key bytes.
    ///
    /// Use with care — the caller must not log or persist these bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The persisted representation of an encrypted value.
///
/// All three fields originate from a single [`encrypt`] call.
#[derive(Debug, Clone)]
pub struct EncryptedValue {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypt plaintext under the master key with a fresh random nonce.
pub fn encrypt(key: &MasterKey, plaintext: &[u8]) -> Result<EncryptedValue, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encryption {
            reason: e.to_string(),
        })?;

    // aes-gcm appends the tag; split it into its own field.
    let tag = ciphertext.split_off(ciphertext.len().saturating_sub(TAG_LEN));

    Ok(EncryptedValue {
        ciphertext,
        nonce: nonce.to_vec(),
        tag,
    })
}

/// Decrypt a value produced by [`encrypt`].
///
/// Returns [`CryptoError::Decryption`] if authentication fails — wrong
/// key, corrupted ciphertext, or a tampered tag.
pub fn decrypt(key: &MasterKey, value: &EncryptedValue) -> Result<Vec<u8>, CryptoError> {
    if value.nonce.len() != NONCE_LEN {
        return Err(CryptoError::InvalidNonceLength {
            expected: NONCE_LEN,
            actual: value.nonce.len(),
        });
    }
    if value.tag.len() != TAG_LEN {
        return Err(CryptoError::InvalidTagLength {
            expected: TAG_LEN,
            actual: value.tag.len(),
        });
    }

    let mut combined = Vec::with_capacity(value.ciphertext.len().saturating_add(TAG_LEN));
    combined.extend_from_slice(&value.ciphertext);
    combined.extend_from_slice(&value.tag);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(&value.nonce), combined.as_slice())
        .map_err(|_| CryptoError::Decryption)
}
