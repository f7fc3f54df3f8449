//! Scripts repository.
//!
//! A script row and its variable rows are written in one transaction, both
//! on create and on update (update replaces the whole variable set). The
//! execution history table is append-only and cascade-deleted with its
//! script.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Script, ScriptExecution, ScriptVariable, ScriptWithVariables, VariableKind};

/// A variable definition as submitted by a caller.
#[derive(Debug, Clone)]
pub struct NewVariable {
    pub name: String,
    pub placeholder: String,
    pub description: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub kind: VariableKind,
}

/// List all scripts with their variables, most recently updated first.
pub async fn list(pool: &SqlitePool) -> Result<Vec<ScriptWithVariables>, StoreError> {
    let scripts = sqlx::query_as::<_, Script>("SELECT * FROM scripts ORDER BY updated_at DESC")
        .fetch_all(pool)
        .await?;

    let mut out = Vec::with_capacity(scripts.len());
    for script in scripts {
        let variables = variables_for(pool, &script.id).await?;
        out.push(ScriptWithVariables { script, variables });
    }

    Ok(out)
}

/// Get one script with its variables.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<ScriptWithVariables>, StoreError> {
    let script = sqlx::query_as::<_, Script>("SELECT * FROM scripts WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match script {
        Some(script) => {
            let variables = variables_for(pool, &script.id).await?;
            Ok(Some(ScriptWithVariables { script, variables }))
        }
        None => Ok(None),
    }
}

/// Variables of a script, ordered by name.
pub async fn variables_for(
    pool: &SqlitePool,
    script_id: &str,
) -> Result<Vec<ScriptVariable>, StoreError> {
    let variables = sqlx::query_as::<_, ScriptVariable>(
        "SELECT * FROM script_variables WHERE script_id = ?1 ORDER BY name",
    )
    .bind(script_id)
    .fetch_all(pool)
    .await?;

    Ok(variables)
}

/// Create a script and all of its variables in one transaction.
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    content: &str,
    variables: &[NewVariable],
) -> Result<ScriptWithVariables, StoreError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let script = sqlx::query_as::<_, Script>(
        r"INSERT INTO scripts (id, name, description, content, created_at, updated_at)
          VALUES (?1, ?2, ?3, ?4, ?5, ?5)
          RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(description)
    .bind(content)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_variables(&mut tx, &script.id, variables).await?;
    tx.commit().await?;

    let variables = variables_for(pool, &script.id).await?;
    Ok(ScriptWithVariables { script, variables })
}

/// Update a script and replace its variable set in one transaction.
/// Returns `None` if the script does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    description: Option<&str>,
    content: &str,
    variables: &[NewVariable],
) -> Result<Option<ScriptWithVariables>, StoreError> {
    let mut tx = pool.begin().await?;

    let script = sqlx::query_as::<_, Script>(
        r"UPDATE scripts SET name = ?1, description = ?2, content = ?3, updated_at = ?4
          WHERE id = ?5
          RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(content)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(script) = script else {
        tx.rollback().await?;
        return Ok(None);
    };

    sqlx::query("DELETE FROM script_variables WHERE script_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_variables(&mut tx, id, variables).await?;
    tx.commit().await?;

    let variables = variables_for(pool, id).await?;
    Ok(Some(ScriptWithVariables { script, variables }))
}

/// Delete a script and, via cascade, its variables and execution history.
/// Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM scripts WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Append an execution history entry.
pub async fn insert_execution(
    pool: &SqlitePool,
    script_id: &str,
    variables_used: &BTreeMap<String, String>,
    processed_content: &str,
    executed_at: DateTime<Utc>,
) -> Result<(), StoreError> {
    let variables_json = serde_json::to_string(variables_used)?;

    sqlx::query(
        r"INSERT INTO script_executions (id, script_id, variables_used, processed_content, executed_at)
          VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(script_id)
    .bind(variables_json)
    .bind(processed_content)
    .bind(executed_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Execution history of a script, most recent first.
pub async fn list_executions(
    pool: &SqlitePool,
    script_id: &str,
) -> Result<Vec<ScriptExecution>, StoreError> {
    let executions = sqlx::query_as::<_, ScriptExecution>(
        "SELECT * FROM script_executions WHERE script_id = ?1 ORDER BY executed_at DESC",
    )
    .bind(script_id)
    .fetch_all(pool)
    .await?;

    Ok(executions)
}

/// Insert variable rows, skipping entries with a blank name or placeholder.
async fn insert_variables(
    tx: &mut Transaction<'_, Sqlite>,
    script_id: &str,
    variables: &[NewVariable],
) -> Result<(), StoreError> {
    for var in variables {
        if var.name.trim().is_empty() || var.placeholder.trim().is_empty() {
            continue;
        }

        sqlx::query(
            r"INSERT INTO script_variables
                (id, script_id, name, placeholder, description, default_value, required, type)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(script_id)
        .bind(var.name.trim())
        .bind(var.placeholder.trim())
        .bind(var.description.as_deref())
        .bind(var.default_value.as_deref())
        .bind(var.required)
        .bind(var.kind)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
