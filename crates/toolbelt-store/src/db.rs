//! Pool construction and schema bootstrap.
//!
//! The schema is applied as a single idempotent batch on every connect, so
//! a fresh database file and an existing one go through the same path.
//! Foreign keys are enabled per connection — cascade deletes for subtasks,
//! script variables, and execution history depend on it.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::StoreError;

/// Open (or create) the database file at `path` and apply the schema.
pub async fn connect(path: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Open an in-memory database with the schema applied.
///
/// Limited to a single connection — each SQLite `:memory:` connection is
/// its own database, so a larger pool would silently shard the data.
pub async fn connect_in_memory() -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Apply the schema batch. Safe to run repeatedly.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::debug!("database schema applied");
    Ok(())
}

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS notes (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    due_date    TEXT,
    completed   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subtasks (
    id          TEXT PRIMARY KEY,
    task_id     TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    completed   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_subtasks_task ON subtasks(task_id);

CREATE TABLE IF NOT EXISTS scripts (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS script_variables (
    id            TEXT PRIMARY KEY,
    script_id     TEXT NOT NULL REFERENCES scripts(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    placeholder   TEXT NOT NULL,
    description   TEXT,
    default_value TEXT,
    required      INTEGER NOT NULL DEFAULT 0,
    type          TEXT NOT NULL DEFAULT 'text',
    UNIQUE(script_id, name)
);
CREATE INDEX IF NOT EXISTS idx_script_variables_script ON script_variables(script_id);

CREATE TABLE IF NOT EXISTS script_executions (
    id                TEXT PRIMARY KEY,
    script_id         TEXT NOT NULL REFERENCES scripts(id) ON DELETE CASCADE,
    variables_used    TEXT NOT NULL,
    processed_content TEXT NOT NULL,
    executed_at       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_script_executions_script ON script_executions(script_id);

CREATE TABLE IF NOT EXISTS secrets (
    name        TEXT PRIMARY KEY,
    ciphertext  BLOB NOT NULL,
    nonce       BLOB NOT NULL,
    tag         BLOB NOT NULL,
    due_date    TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";
