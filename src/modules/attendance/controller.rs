use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use classflow_core::{AppError, ErrorResponse};
use classflow_models::{AttendanceId, ClassId, StudentId};
use classflow_schedule::AttendanceStats;
use tracing::instrument;

use crate::modules::attendance::model::{
    AttendanceQueryParams, AttendanceWithStudent, SaveAttendanceDto, SaveAttendanceResponse,
    StudentAttendanceParams, StudentAttendanceStats, StudentAttendanceSummary,
};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = SaveAttendanceDto,
    responses(
        (status = 200, description = "Roster saved", body = SaveAttendanceResponse),
        (status = 400, description = "Unknown student", body = ErrorResponse),
        (status = 404, description = "Class or session not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn save_attendance(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SaveAttendanceDto>,
) -> Result<Json<SaveAttendanceResponse>, AppError> {
    let result = AttendanceService::save_attendance(&state.db, dto).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/attendance",
    params(("id" = ClassId, Path, description = "Class ID"), AttendanceQueryParams),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceWithStudent>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_class_attendance(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
    Query(params): Query<AttendanceQueryParams>,
) -> Result<Json<Vec<AttendanceWithStudent>>, AppError> {
    let records = AttendanceService::class_attendance(&state.db, id, params.session).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/attendance/stats",
    params(("id" = ClassId, Path, description = "Class ID"), AttendanceQueryParams),
    responses(
        (status = 200, description = "Attendance counts and rate", body = AttendanceStats),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_class_attendance_stats(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
    Query(params): Query<AttendanceQueryParams>,
) -> Result<Json<AttendanceStats>, AppError> {
    let stats = AttendanceService::class_stats(&state.db, id, params.session).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/attendance/students",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Per-student attendance stats", body = Vec<StudentAttendanceSummary>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_student_summaries(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<StudentAttendanceSummary>>, AppError> {
    let summaries = AttendanceService::student_summaries(&state.db, id).await?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/attendance/stats",
    params(("id" = StudentId, Path, description = "Student ID"), StudentAttendanceParams),
    responses(
        (status = 200, description = "Student attendance stats", body = StudentAttendanceStats),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_student_attendance_stats(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Query(params): Query<StudentAttendanceParams>,
) -> Result<Json<StudentAttendanceStats>, AppError> {
    let stats = AttendanceService::student_stats(&state.db, id, params.class_id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = AttendanceId, Path, description = "Attendance record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
) -> Result<StatusCode, AppError> {
    AttendanceService::delete_attendance(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
