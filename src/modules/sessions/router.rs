use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{get_sessions, replace_sessions, update_session};

/// Mounted under `/api/classes`.
pub fn class_sessions_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/sessions", get(get_sessions).put(replace_sessions))
        .route("/{id}/sessions/{number}", put(update_session))
}
