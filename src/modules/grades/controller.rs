use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use classflow_core::{AppError, ErrorResponse};
use classflow_models::{ClassId, GradeId, StudentId};
use tracing::instrument;

use crate::modules::grades::model::{
    BulkGradesDto, BulkGradesResponse, CreateGradeDto, Grade, GradeWithStudent, StudentAverage,
    StudentGradesParams, StudentGradesResponse, UpdateGradeDto,
};
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = Grade),
        (status = 400, description = "Unknown class or student", body = ErrorResponse),
        (status = 409, description = "Assignment already graded for this student", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn create_grade(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let grade = GradeService::create_grade(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

#[utoipa::path(
    post,
    path = "/api/grades/bulk",
    request_body = BulkGradesDto,
    responses(
        (status = 200, description = "Grades inserted or updated", body = BulkGradesResponse),
        (status = 400, description = "Unknown class or student", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state, dto))]
pub async fn bulk_upsert_grades(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<BulkGradesDto>,
) -> Result<Json<BulkGradesResponse>, AppError> {
    let result = GradeService::bulk_upsert_grades(&state.db, dto).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(("id" = GradeId, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade", body = Grade),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grade(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::get_grade(&state.db, id).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    put,
    path = "/api/grades/{id}",
    params(("id" = GradeId, Path, description = "Grade ID")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = Grade),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 409, description = "Assignment already graded for this student", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::update_grade(&state.db, id, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    delete,
    path = "/api/grades/{id}",
    params(("id" = GradeId, Path, description = "Grade ID")),
    responses(
        (status = 204, description = "Grade deleted"),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
) -> Result<StatusCode, AppError> {
    GradeService::delete_grade(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/grades",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "All grades of the class", body = Vec<GradeWithStudent>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_class_grades(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<GradeWithStudent>>, AppError> {
    let grades = GradeService::class_grades(&state.db, id).await?;
    Ok(Json(grades))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/grades/averages",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Weighted averages, best first, missing averages last", body = Vec<StudentAverage>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_class_averages(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<StudentAverage>>, AppError> {
    let averages = GradeService::class_averages(&state.db, id).await?;
    Ok(Json(averages))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/grades",
    params(("id" = StudentId, Path, description = "Student ID"), StudentGradesParams),
    responses(
        (status = 200, description = "Grades with weighted average", body = StudentGradesResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_student_grades(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Query(params): Query<StudentGradesParams>,
) -> Result<Json<StudentGradesResponse>, AppError> {
    let grades = GradeService::student_grades(&state.db, id, params.class_id).await?;
    Ok(Json(grades))
}
