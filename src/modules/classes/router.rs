use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::{attendance, comments, grades, sessions};
use crate::state::AppState;

use super::controller::{
    create_class, delete_class, get_class, get_classes, preview_schedule, regenerate_sessions,
    update_class,
};

/// `/api/classes`, including the class-scoped routes of sessions,
/// attendance, grades and comments.
pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_classes).post(create_class))
        .route("/schedule-preview", post(preview_schedule))
        .route(
            "/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/{id}/regenerate", post(regenerate_sessions))
        .merge(sessions::router::class_sessions_routes())
        .merge(attendance::router::class_attendance_routes())
        .merge(grades::router::class_grades_routes())
        .merge(comments::router::class_comments_routes())
}
