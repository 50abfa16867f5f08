use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use classflow_core::{AppError, ErrorResponse, PaginationParams};
use classflow_models::ClassId;
use tracing::instrument;

use crate::modules::classes::model::{
    ClassDetail, ClassFilterParams, CreateClassDto, PaginatedClassesResponse, SchedulePreviewDto,
    SchedulePreviewResponse, UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::modules::sessions::model::Session;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created with its generated sessions", body = ClassDetail),
        (status = 400, description = "Invalid schedule input or unknown teacher/manager", body = ErrorResponse),
        (status = 409, description = "Class code already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ClassDetail>), AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated classes", body = PaginatedClassesResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_classes(
    State(state): State<AppState>,
    Query(filters): Query<ClassFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedClassesResponse>, AppError> {
    let classes = ClassService::list_classes(&state.db, filters, pagination).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class with its sessions", body = ClassDetail),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<ClassDetail>, AppError> {
    let class = ClassService::get_class(&state.db, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ClassDetail),
        (status = 400, description = "Invalid schedule input", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Class code already exists", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ClassDetail>, AppError> {
    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 204, description = "Class and its sessions, attendance, grades and comments deleted"),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<StatusCode, AppError> {
    ClassService::delete_class(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/regenerate",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Freshly generated sessions", body = Vec<Session>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn regenerate_sessions(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<Session>>, AppError> {
    let sessions = ClassService::regenerate_sessions(&state.db, id).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    post,
    path = "/api/classes/schedule-preview",
    request_body = SchedulePreviewDto,
    responses(
        (status = 200, description = "Generated sessions, nothing stored", body = SchedulePreviewResponse),
        (status = 400, description = "Invalid schedule input", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn preview_schedule(
    State(state): State<AppState>,
    Json(dto): Json<SchedulePreviewDto>,
) -> Result<Json<SchedulePreviewResponse>, AppError> {
    let preview = ClassService::preview_schedule(&state.db, dto).await?;
    Ok(Json(preview))
}
