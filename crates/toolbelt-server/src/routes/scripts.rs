//! Scripts routes: `/api/scripts`.
//!
//! Execution substitutes submitted variable values into the script body.
//! Validation runs before substitution and reports every missing required
//! variable at once. History recording is best-effort: a failed insert is
//! logged and the processed result is still returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolbelt_core::template;
use toolbelt_store::models::{ScriptExecution, ScriptWithVariables, VariableKind};
use toolbelt_store::scripts::{self, NewVariable};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/scripts` router.
///
/// - `GET    /` — list scripts with variables
/// - `POST   /` — create a script and its variables
/// - `GET    /{id}` — one script with variables
/// - `PUT    /{id}` — replace script and variable set
/// - `DELETE /{id}` — delete script (cascades to variables and history)
/// - `POST   /{id}/execute` — validate, substitute, record history
/// - `GET    /{id}/executions` — execution history, most recent first
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_scripts).post(create_script))
        .route(
            "/{id}",
            get(get_script)
                .put(update_script)
                .delete(delete_script),
        )
        .route("/{id}/execute", post(execute_script))
        .route("/{id}/executions", get(list_executions))
}

// ── Request and response types ───────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VariableBody {
    pub name: String,
    pub placeholder: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "type")]
    pub kind: VariableKind,
}

#[derive(Debug, Deserialize)]
pub struct ScriptBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
    #[serde(default)]
    pub variables: Vec<VariableBody>,
}

impl ScriptBody {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("content must not be empty".to_owned()));
        }
        Ok(())
    }

    fn variables(&self) -> Vec<NewVariable> {
        self.variables
            .iter()
            .map(|v| NewVariable {
                name: v.name.clone(),
                placeholder: v.placeholder.clone(),
                description: v.description.clone(),
                default_value: v.default_value.clone(),
                required: v.required,
                kind: v.kind,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub script_id: String,
    pub processed_content: String,
    pub variables_used: BTreeMap<String, String>,
    pub executed_at: DateTime<Utc>,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list_scripts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ScriptWithVariables>>, AppError> {
    let scripts = scripts::list(&state.pool).await?;
    Ok(Json(scripts))
}

async fn get_script(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ScriptWithVariables>, AppError> {
    let script = scripts::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("script {id} not found")))?;
    Ok(Json(script))
}

async fn create_script(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScriptBody>,
) -> Result<(StatusCode, Json<ScriptWithVariables>), AppError> {
    body.validate()?;

    let script = scripts::create(
        &state.pool,
        body.name.trim(),
        body.description.as_deref(),
        &body.content,
        &body.variables(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(script)))
}

async fn update_script(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ScriptBody>,
) -> Result<Json<ScriptWithVariables>, AppError> {
    body.validate()?;

    let script = scripts::update(
        &state.pool,
        &id,
        body.name.trim(),
        body.description.as_deref(),
        &body.content,
        &body.variables(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("script {id} not found")))?;
    Ok(Json(script))
}

async fn delete_script(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if scripts::delete(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("script {id} not found")))
    }
}

/// Validate the submitted variables, substitute them into the script body,
/// and append an execution record. The record is best-effort: if the insert
/// fails the processed content is still returned.
async fn execute_script(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ExecuteBody>,
) -> Result<Json<ExecuteResponse>, AppError> {
    let script = scripts::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("script {id} not found")))?;

    let processed_content =
        template::process(&script.script.content, &script.variables, &body.variables)?;

    let executed_at = Utc::now();
    if let Err(err) = scripts::insert_execution(
        &state.pool,
        &id,
        &body.variables,
        &processed_content,
        executed_at,
    )
    .await
    {
        tracing::warn!(script_id = %id, error = %err, "failed to record script execution");
    }

    Ok(Json(ExecuteResponse {
        script_id: id,
        processed_content,
        variables_used: body.variables,
        executed_at,
    }))
}

async fn list_executions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ScriptExecution>>, AppError> {
    if scripts::get(&state.pool, &id).await?.is_none() {
        return Err(AppError::NotFound(format!("script {id} not found")));
    }

    let executions = scripts::list_executions(&state.pool, &id).await?;
    Ok(Json(executions))
}
