//! Tasks and subtasks repository.
//!
//! Subtasks are exclusively owned by their task: writes are scoped by
//! `task_id` and the schema cascade-deletes them with the parent row.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Subtask, Task, TaskWithSubtasks};

/// Fields of a partial task update. `None` leaves the column unchanged.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

/// List all tasks with their subtasks, most recently updated first.
pub async fn list(pool: &SqlitePool) -> Result<Vec<TaskWithSubtasks>, StoreError> {
    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY updated_at DESC")
        .fetch_all(pool)
        .await?;

    let mut out = Vec::with_capacity(tasks.len());
    for task in tasks {
        let subtasks = subtasks_for(pool, &task.id).await?;
        out.push(TaskWithSubtasks { task, subtasks });
    }

    Ok(out)
}

/// Get one task with its subtasks.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<TaskWithSubtasks>, StoreError> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match task {
        Some(task) => {
            let subtasks = subtasks_for(pool, &task.id).await?;
            Ok(Some(TaskWithSubtasks { task, subtasks }))
        }
        None => Ok(None),
    }
}

/// Create a task (initially not completed, no subtasks).
pub async fn create(
    pool: &SqlitePool,
    title: &str,
    description: Option<&str>,
    due_date: Option<DateTime<Utc>>,
) -> Result<Task, StoreError> {
    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(
        r"INSERT INTO tasks (id, title, description, due_date, completed, created_at, updated_at)
          VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
          RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(title)
    .bind(description)
    .bind(due_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Apply a partial update. Returns `None` if the task does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &TaskPatch,
) -> Result<Option<Task>, StoreError> {
    let task = sqlx::query_as::<_, Task>(
        r"UPDATE tasks SET
            title       = COALESCE(?1, title),
            description = COALESCE(?2, description),
            due_date    = COALESCE(?3, due_date),
            completed   = COALESCE(?4, completed),
            updated_at  = ?5
          WHERE id = ?6
          RETURNING *",
    )
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.due_date)
    .bind(patch.completed)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Delete a task and, via cascade, its subtasks. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Subtasks of a task, in creation order.
pub async fn subtasks_for(pool: &SqlitePool, task_id: &str) -> Result<Vec<Subtask>, StoreError> {
    let subtasks = sqlx::query_as::<_, Subtask>(
        "SELECT * FROM subtasks WHERE task_id = ?1 ORDER BY created_at",
    )
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    Ok(subtasks)
}

/// Add a subtask. Returns `None` if the parent task does not exist.
pub async fn create_subtask(
    pool: &SqlitePool,
    task_id: &str,
    title: &str,
) -> Result<Option<Subtask>, StoreError> {
    let exists: Option<String> = sqlx::query_scalar("SELECT id FROM tasks WHERE id = ?1")
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Ok(None);
    }

    let subtask = sqlx::query_as::<_, Subtask>(
        r"INSERT INTO subtasks (id, task_id, title, completed, created_at)
          VALUES (?1, ?2, ?3, 0, ?4)
          RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(task_id)
    .bind(title)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(Some(subtask))
}

/// Apply a partial subtask update, scoped to the owning task.
/// Returns `None` if no matching subtask exists.
pub async fn update_subtask(
    pool: &SqlitePool,
    task_id: &str,
    subtask_id: &str,
    title: Option<&str>,
    completed: Option<bool>,
) -> Result<Option<Subtask>, StoreError> {
    let subtask = sqlx::query_as::<_, Subtask>(
        r"UPDATE subtasks SET
            title     = COALESCE(?1, title),
            completed = COALESCE(?2, completed)
          WHERE id = ?3 AND task_id = ?4
          RETURNING *",
    )
    .bind(title)
    .bind(completed)
    .bind(subtask_id)
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    Ok(subtask)
}

/// Delete a subtask, scoped to the owning task. Returns whether a row was removed.
pub async fn delete_subtask(
    pool: &SqlitePool,
    task_id: &str,
    subtask_id: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM subtasks WHERE id = ?1 AND task_id = ?2")
        .bind(subtask_id)
        .bind(task_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
