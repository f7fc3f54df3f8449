//! The secret vault.
//!
//! Encrypts secret values before they leave process memory for storage and
//! decrypts them on read. The master key and the pool are injected at
//! construction — the vault holds no other state, no locks, and no cache;
//! concurrent writers for the same name race at the storage layer and last
//! write wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use toolbelt_store::models::SecretMetadata;
use toolbelt_store::secrets;

use crate::crypto::{self, EncryptedValue, MasterKey};
use crate::error::VaultError;

/// A decrypted secret. Exists only in memory on the read path.
#[derive(Debug, Clone, Serialize)]
pub struct Secret {
    pub name: String,
    pub value: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Vault over the secrets table.
pub struct Vault {
    key: MasterKey,
    pool: SqlitePool,
}

impl Vault {
    #[must_use]
    pub fn new(key: MasterKey, pool: SqlitePool) -> Self {
        Self { key, pool }
    }

    /// Encrypt `value` and upsert it under `name`.
    ///
    /// A fresh nonce is generated for every call. On an existing name the
    /// original `created_at` is preserved and `updated_at` refreshed.
    pub async fn set_secret(
        &self,
        name: &str,
        value: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), VaultError> {
        let sealed = crypto::encrypt(&self.key, value.as_bytes())?;

        secrets::upsert(
            &self.pool,
            name,
            &sealed.ciphertext,
            &sealed.nonce,
            &sealed.tag,
            due_date,
            Utc::now(),
        )
        .await?;

        Ok(())
    }

    /// Look up and decrypt a secret.
    ///
    /// Returns `Ok(None)` for an unknown name. A decryption or decoding
    /// failure surfaces as [`VaultError::Integrity`] — callers must be
    /// able to tell a missing secret from an undecryptable one.
    pub async fn get_secret(&self, name: &str) -> Result<Option<Secret>, VaultError> {
        let Some(row) = secrets::get(&self.pool, name).await? else {
            return Ok(None);
        };

        let sealed = EncryptedValue {
            ciphertext: row.ciphertext,
            nonce: row.nonce,
            tag: row.tag,
        };

        let plaintext =
            crypto::decrypt(&self.key, &sealed).map_err(|e| VaultError::Integrity {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;

        let value = String::from_utf8(plaintext).map_err(|_| VaultError::Integrity {
            name: name.to_owned(),
            reason: "decrypted value is not valid UTF-8".to_owned(),
        })?;

        Ok(Some(Secret {
            name: row.name,
            value,
            due_date: row.due_date,
        }))
    }

    /// List metadata for all secrets, ordered by name.
    ///
    /// Never returns ciphertext, nonces, tags, or decrypted values.
    pub async fn list_metadata(&self) -> Result<Vec<SecretMetadata>, VaultError> {
        Ok(secrets::list_metadata(&self.pool).await?)
    }

    /// Delete a secret. Idempotent.
    pub async fn delete_secret(&self, name: &str) -> Result<(), VaultError> {
        Ok(secrets::delete(&self.pool, name).await?)
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use toolbelt_store::db::connect_in_memory;

    async fn test_vault() -> Vault {
        let pool = connect_in_memory().await.unwrap();
        Vault::new(MasterKey::from_passphrase("test-passphrase"), pool)
    }

    #[tokio::test]
    async fn set_then_get_roundtrip() {
        let vault = test_vault().await;
        vault.set_secret("db-password", "s3cr3t", None).await.unwrap();

        let secret = vault.get_secret("db-password").await.unwrap().unwrap();
        assert_eq!(secret.name, "db-password");
        assert_eq!(secret.value, "s3cr3t");
        assert!(secret.due_date.is_none());
    }

    #[tokio::test]
    async fn whitespace_only_value_survives_roundtrip() {
        let vault = test_vault().await;
        vault.set_secret("blank", "   ", None).await.unwrap();
        assert_eq!(vault.get_secret("blank").await.unwrap().unwrap().value, "   ");
    }

    #[tokio::test]
    async fn unknown_name_is_a_sentinel_not_an_error() {
        let vault = test_vault().await;
        assert!(vault.get_secret("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_preserves_created_at() {
        let vault = test_vault().await;
        vault.set_secret("x", "v1", None).await.unwrap();
        let first = vault.list_metadata().await.unwrap().remove(0);

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        vault.set_secret("x", "v2", None).await.unwrap();
        let second = vault.list_metadata().await.unwrap().remove(0);

        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(vault.get_secret("x").await.unwrap().unwrap().value, "v2");
    }

    #[tokio::test]
    async fn successive_writes_never_reuse_a_nonce() {
        let pool = connect_in_memory().await.unwrap();
        let vault = Vault::new(MasterKey::from_passphrase("test"), pool.clone());
        let mut seen = std::collections::HashSet::new();

        for _ in 0..32 {
            vault.set_secret("same-name", "same-value", None).await.unwrap();
            let row = toolbelt_store::secrets::get(&pool, "same-name")
                .await
                .unwrap()
                .unwrap();
            assert!(seen.insert(row.nonce), "nonce reused across writes");
        }
    }

    #[tokio::test]
    async fn tampered_row_yields_integrity_error() {
        let pool = connect_in_memory().await.unwrap();
        let vault = Vault::new(MasterKey::from_passphrase("test"), pool.clone());
        vault.set_secret("tampered", "original", None).await.unwrap();

        let row = toolbelt_store::secrets::get(&pool, "tampered").await.unwrap().unwrap();
        let mut tag = row.tag;
        tag[0] ^= 0xFF;
        sqlx::query("UPDATE secrets SET tag = ?1 WHERE name = ?2")
            .bind(&tag)
            .bind("tampered")
            .execute(&pool)
            .await
            .unwrap();

        let err = vault.get_secret("tampered").await.unwrap_err();
        assert!(matches!(err, VaultError::Integrity { .. }));
    }

    #[tokio::test]
    async fn wrong_key_yields_integrity_error_not_plaintext() {
        let pool = connect_in_memory().await.unwrap();
        let writer = Vault::new(MasterKey::from_passphrase("key-a"), pool.clone());
        writer.set_secret("shared", "plaintext", None).await.unwrap();

        let reader = Vault::new(MasterKey::from_passphrase("key-b"), pool);
        assert!(matches!(
            reader.get_secret("shared").await,
            Err(VaultError::Integrity { .. })
        ));
    }

    #[tokio::test]
    async fn listing_never_leaks_secret_material() {
        let pool = connect_in_memory().await.unwrap();
        let vault = Vault::new(MasterKey::from_passphrase("test"), pool.clone());
        vault
            .set_secret("leak-check", "super-secret-plaintext", None)
            .await
            .unwrap();

        let listing = serde_json::to_string(&vault.list_metadata().await.unwrap()).unwrap();
        assert!(!listing.contains("super-secret-plaintext"));

        let row = toolbelt_store::secrets::get(&pool, "leak-check").await.unwrap().unwrap();
        let ciphertext_hex: String = row.ciphertext.iter().map(|b| format!("{b:02x}")).collect();
        assert!(!listing.contains(&ciphertext_hex));
        assert!(listing.contains("leak-check"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let vault = test_vault().await;
        vault.delete_secret("nonexistent").await.unwrap();

        vault.set_secret("temp", "v", None).await.unwrap();
        vault.delete_secret("temp").await.unwrap();
        vault.delete_secret("temp").await.unwrap();
        assert!(vault.get_secret("temp").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn due_date_is_stored_and_returned() {
        let vault = test_vault().await;
        let due = Utc::now() + chrono::Duration::days(30);
        vault.set_secret("rotate-me", "v", Some(due)).await.unwrap();

        // Compare at millisecond precision — the stored text form may not
        // carry full nanosecond resolution.
        let secret = vault.get_secret("rotate-me").await.unwrap().unwrap();
        assert_eq!(
            secret.due_date.map(|d| d.timestamp_millis()),
            Some(due.timestamp_millis())
        );

        let meta = vault.list_metadata().await.unwrap().remove(0);
        assert_eq!(
            meta.due_date.map(|d| d.timestamp_millis()),
            Some(due.timestamp_millis())
        );
    }
}
