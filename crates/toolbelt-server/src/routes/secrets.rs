//! Secrets routes: `/api/secrets`.
//!
//! The listing endpoint serves metadata only. Plaintext values appear in
//! exactly one response shape, the single-secret `GET`, and are never
//! logged.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use toolbelt_core::vault::Secret;
use toolbelt_store::models::SecretMetadata;

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/secrets` router.
///
/// - `GET    /` — metadata listing (no cipher material, no plaintext)
/// - `GET    /{name}` — decrypt and return one secret
/// - `PUT    /{name}` — encrypt and upsert
/// - `DELETE /{name}` — delete, idempotent
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_secrets)).route(
        "/{name}",
        get(get_secret).put(put_secret).delete(delete_secret),
    )
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PutSecretBody {
    pub value: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list_secrets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SecretMetadata>>, AppError> {
    let metadata = state.vault.list_metadata().await?;
    Ok(Json(metadata))
}

async fn get_secret(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Secret>, AppError> {
    let secret = state
        .vault
        .get_secret(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("secret {name} not found")))?;
    Ok(Json(secret))
}

async fn put_secret(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<PutSecretBody>,
) -> Result<StatusCode, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_owned()));
    }
    if body.value.is_empty() {
        return Err(AppError::Validation("value must not be empty".to_owned()));
    }

    state
        .vault
        .set_secret(&name, &body.value, body.due_date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_secret(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.vault.delete_secret(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
