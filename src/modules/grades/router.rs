use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    bulk_upsert_grades, create_grade, delete_grade, get_class_averages, get_class_grades,
    get_grade, get_student_grades, update_grade,
};

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_grade))
        .route("/bulk", post(bulk_upsert_grades))
        .route(
            "/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
}

/// Mounted under `/api/classes`.
pub fn class_grades_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/grades", get(get_class_grades))
        .route("/{id}/grades/averages", get(get_class_averages))
}

/// Mounted under `/api/students`.
pub fn student_grades_routes() -> Router<AppState> {
    Router::new().route("/{id}/grades", get(get_student_grades))
}
