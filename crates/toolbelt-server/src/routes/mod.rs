//! Route modules and router assembly.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod notes;
pub mod scripts;
pub mod secrets;
pub mod tasks;

/// Build the full application router.
///
/// Permissive CORS is applied only when `enable_cors` is set — the
/// development frontend runs on a separate port; in production the API
/// sits behind the same origin.
pub fn app(state: Arc<AppState>, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/notes", notes::router())
        .nest("/api/tasks", tasks::router())
        .nest("/api/scripts", scripts::router())
        .nest("/api/secrets", secrets::router())
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
