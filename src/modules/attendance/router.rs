use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    delete_attendance, get_class_attendance, get_class_attendance_stats,
    get_student_attendance_stats, get_student_summaries, save_attendance,
};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_attendance))
        .route("/{id}", delete(delete_attendance))
}

/// Mounted under `/api/classes`.
pub fn class_attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/attendance", get(get_class_attendance))
        .route("/{id}/attendance/stats", get(get_class_attendance_stats))
        .route("/{id}/attendance/students", get(get_student_summaries))
}

/// Mounted under `/api/students`.
pub fn student_attendance_routes() -> Router<AppState> {
    Router::new().route("/{id}/attendance/stats", get(get_student_attendance_stats))
}
