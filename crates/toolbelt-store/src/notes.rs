//! Notes repository.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Note;

/// List all notes, most recently updated first.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Note>, StoreError> {
    let notes = sqlx::query_as::<_, Note>("SELECT * FROM notes ORDER BY updated_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(notes)
}

/// Create a note.
pub async fn create(pool: &SqlitePool, title: &str, content: &str) -> Result<Note, StoreError> {
    let now = Utc::now();
    let note = sqlx::query_as::<_, Note>(
        r"INSERT INTO notes (id, title, content, created_at, updated_at)
          VALUES (?1, ?2, ?3, ?4, ?4)
          RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(title)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(note)
}

/// Update a note. Returns `None` if the note does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    content: &str,
) -> Result<Option<Note>, StoreError> {
    let note = sqlx::query_as::<_, Note>(
        r"UPDATE notes SET title = ?1, content = ?2, updated_at = ?3
          WHERE id = ?4
          RETURNING *",
    )
    .bind(title)
    .bind(content)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(note)
}

/// Delete a note. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
