//! Row models.
//!
//! All IDs are hyphenated UUID v4 strings, timestamps are UTC. The secret
//! row type carries raw cipher blobs and deliberately does not implement
//! `Serialize` — the listing path goes through [`SecretMetadata`], which
//! holds no cipher material at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Notes ────────────────────────────────────────────────────────────

/// A free-form note.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Tasks ────────────────────────────────────────────────────────────

/// A task, without its subtasks.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A subtask, exclusively owned by its task (cascade-deleted with it).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A task with its subtasks, as served over the API.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithSubtasks {
    #[serde(flatten)]
    pub task: Task,
    pub subtasks: Vec<Subtask>,
}

// ── Scripts ──────────────────────────────────────────────────────────

/// A reusable parameterized script template.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Script {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Presentation hint for a script variable. Not enforced server-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    #[default]
    Text,
    Password,
    Number,
    Url,
}

/// A declared variable of a script. Names are unique within a script.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScriptVariable {
    pub id: String,
    pub script_id: String,
    pub name: String,
    /// UI hint text shown in the variable input field.
    pub placeholder: String,
    pub description: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: VariableKind,
}

/// A script with its variables ordered by name, as served over the API.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptWithVariables {
    #[serde(flatten)]
    pub script: Script,
    pub variables: Vec<ScriptVariable>,
}

/// One entry of the append-only execution history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScriptExecution {
    pub id: String,
    pub script_id: String,
    /// JSON object of the name→value mapping used.
    pub variables_used: String,
    pub processed_content: String,
    pub executed_at: DateTime<Utc>,
}

// ── Secrets ──────────────────────────────────────────────────────────

/// A persisted secret. `(ciphertext, nonce, tag)` always come from the
/// same AEAD encryption call.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SecretRow {
    pub name: String,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub tag: Vec<u8>,
    /// Advisory expiry, for notification purposes only.
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Secret listing entry — never includes cipher material or plaintext.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SecretMetadata {
    pub name: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
