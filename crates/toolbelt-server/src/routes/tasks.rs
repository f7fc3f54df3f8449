//! Tasks routes: `/api/tasks`, including nested subtask routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use toolbelt_store::models::{Subtask, Task, TaskWithSubtasks};
use toolbelt_store::tasks::{self, TaskPatch};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/tasks` router.
///
/// - `GET    /` — list tasks with subtasks
/// - `POST   /` — create a task
/// - `GET    /{id}` — one task with subtasks
/// - `PUT    /{id}` — partial update (absent fields are left unchanged)
/// - `DELETE /{id}` — delete task (cascades to subtasks)
/// - `POST   /{id}/subtasks` — add a subtask
/// - `PUT    /{id}/subtasks/{subtask_id}` — partial subtask update
/// - `DELETE /{id}/subtasks/{subtask_id}` — delete a subtask
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/{id}/subtasks", post(create_subtask))
        .route(
            "/{id}/subtasks/{subtask_id}",
            put(update_subtask).delete(delete_subtask),
        )
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubtaskBody {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubtaskBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskWithSubtasks>>, AppError> {
    let tasks = tasks::list(&state.pool).await?;
    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskWithSubtasks>, AppError> {
    let task = tasks::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {id} not found")))?;
    Ok(Json(task))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_owned()));
    }

    let task = tasks::create(
        &state.pool,
        body.title.trim(),
        body.description.as_deref(),
        body.due_date,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<Task>, AppError> {
    if body.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("title must not be empty".to_owned()));
    }

    let patch = TaskPatch {
        title: body.title.map(|t| t.trim().to_owned()),
        description: body.description,
        due_date: body.due_date,
        completed: body.completed,
    };

    let task = tasks::update(&state.pool, &id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {id} not found")))?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if tasks::delete(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("task {id} not found")))
    }
}

async fn create_subtask(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CreateSubtaskBody>,
) -> Result<(StatusCode, Json<Subtask>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_owned()));
    }

    let subtask = tasks::create_subtask(&state.pool, &id, body.title.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {id} not found")))?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

async fn update_subtask(
    State(state): State<Arc<AppState>>,
    Path((id, subtask_id)): Path<(String, String)>,
    Json(body): Json<UpdateSubtaskBody>,
) -> Result<Json<Subtask>, AppError> {
    let subtask = tasks::update_subtask(
        &state.pool,
        &id,
        &subtask_id,
        body.title.as_deref(),
        body.completed,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("subtask {subtask_id} not found")))?;
    Ok(Json(subtask))
}

async fn delete_subtask(
    State(state): State<Arc<AppState>>,
    Path((id, subtask_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    if tasks::delete_subtask(&state.pool, &id, &subtask_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "subtask {subtask_id} not found"
        )))
    }
}
