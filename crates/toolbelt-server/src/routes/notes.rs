//! Notes routes: `/api/notes`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use toolbelt_store::models::Note;
use toolbelt_store::notes;

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/notes` router.
///
/// - `GET    /` — list notes, most recently updated first
/// - `POST   /` — create a note
/// - `PUT    /{id}` — replace title and content
/// - `DELETE /{id}` — delete a note
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/{id}", axum::routing::put(update_note).delete(delete_note))
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NoteBody {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NoteBody {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_owned()));
        }
        Ok(())
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>, AppError> {
    let notes = notes::list(&state.pool).await?;
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NoteBody>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    body.validate()?;
    let note = notes::create(&state.pool, body.title.trim(), &body.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NoteBody>,
) -> Result<Json<Note>, AppError> {
    body.validate()?;
    let note = notes::update(&state.pool, &id, body.title.trim(), &body.content)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("note {id} not found")))?;
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if notes::delete(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("note {id} not found")))
    }
}
