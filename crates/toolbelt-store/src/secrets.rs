//! Secrets repository.
//!
//! Rows arrive and leave as cipher blobs; encryption and decryption happen
//! in `toolbelt-core`. The upsert is a single atomic statement — concurrent
//! writers for the same name race at this layer and last write wins.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::models::{SecretMetadata, SecretRow};

/// Insert or update a secret by name.
///
/// On conflict the original `created_at` is preserved; ciphertext, nonce,
/// tag, and due date are replaced and `updated_at` is refreshed.
pub async fn upsert(
    pool: &SqlitePool,
    name: &str,
    ciphertext: &[u8],
    nonce: &[u8],
    tag: &[u8],
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query(
        r"INSERT INTO secrets (name, ciphertext, nonce, tag, due_date, created_at, updated_at)
          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
          ON CONFLICT(name) DO UPDATE SET
            ciphertext = excluded.ciphertext,
            nonce      = excluded.nonce,
            tag        = excluded.tag,
            due_date   = excluded.due_date,
            updated_at = excluded.updated_at",
    )
    .bind(name)
    .bind(ciphertext)
    .bind(nonce)
    .bind(tag)
    .bind(due_date)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a secret row. Returns `None` if the name is unknown.
pub async fn get(pool: &SqlitePool, name: &str) -> Result<Option<SecretRow>, StoreError> {
    let row = sqlx::query_as::<_, SecretRow>("SELECT * FROM secrets WHERE name = ?1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// List metadata for all secrets, ordered by name. Never selects cipher columns.
pub async fn list_metadata(pool: &SqlitePool) -> Result<Vec<SecretMetadata>, StoreError> {
    let rows = sqlx::query_as::<_, SecretMetadata>(
        r"SELECT name, due_date, created_at, updated_at
          FROM secrets
          ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete a secret. Idempotent — deleting an unknown name is not an error.
pub async fn delete(pool: &SqlitePool, name: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM secrets WHERE name = ?1")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}
