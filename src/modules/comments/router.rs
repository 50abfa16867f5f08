use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{delete_comment, get_comments, replace_comments, upsert_comment};

/// Mounted under `/api/classes`.
pub fn class_comments_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/comments", get(get_comments).put(replace_comments))
        .route(
            "/{id}/comments/{student_id}",
            put(upsert_comment).delete(delete_comment),
        )
}
