use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use classflow_core::{AppError, ErrorResponse};
use classflow_models::ManagerId;
use tracing::instrument;

use crate::modules::classes::model::ClassWithStats;
use crate::modules::managers::model::{
    CreateManagerDto, ManagerFilterParams, ManagerWithStats, UpdateManagerDto,
};
use crate::modules::managers::service::ManagerService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/managers",
    request_body = CreateManagerDto,
    responses(
        (status = 201, description = "Manager created", body = ManagerWithStats),
        (status = 409, description = "Manager code already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Managers"
)]
#[instrument(skip(state))]
pub async fn create_manager(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateManagerDto>,
) -> Result<(StatusCode, Json<ManagerWithStats>), AppError> {
    let manager = ManagerService::create_manager(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(manager)))
}

#[utoipa::path(
    get,
    path = "/api/managers",
    params(ManagerFilterParams),
    responses(
        (status = 200, description = "Managers ordered by name", body = Vec<ManagerWithStats>)
    ),
    tag = "Managers"
)]
#[instrument(skip(state))]
pub async fn get_managers(
    State(state): State<AppState>,
    Query(filters): Query<ManagerFilterParams>,
) -> Result<Json<Vec<ManagerWithStats>>, AppError> {
    let managers = ManagerService::list_managers(&state.db, filters).await?;
    Ok(Json(managers))
}

#[utoipa::path(
    get,
    path = "/api/managers/{id}",
    params(("id" = ManagerId, Path, description = "Manager ID")),
    responses(
        (status = 200, description = "Manager", body = ManagerWithStats),
        (status = 404, description = "Manager not found", body = ErrorResponse)
    ),
    tag = "Managers"
)]
#[instrument(skip(state))]
pub async fn get_manager(
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
) -> Result<Json<ManagerWithStats>, AppError> {
    let manager = ManagerService::get_manager(&state.db, id).await?;
    Ok(Json(manager))
}

#[utoipa::path(
    put,
    path = "/api/managers/{id}",
    params(("id" = ManagerId, Path, description = "Manager ID")),
    request_body = UpdateManagerDto,
    responses(
        (status = 200, description = "Manager updated", body = ManagerWithStats),
        (status = 404, description = "Manager not found", body = ErrorResponse),
        (status = 409, description = "Manager code already exists", body = ErrorResponse)
    ),
    tag = "Managers"
)]
#[instrument(skip(state))]
pub async fn update_manager(
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
    ValidatedJson(dto): ValidatedJson<UpdateManagerDto>,
) -> Result<Json<ManagerWithStats>, AppError> {
    let manager = ManagerService::update_manager(&state.db, id, dto).await?;
    Ok(Json(manager))
}

#[utoipa::path(
    delete,
    path = "/api/managers/{id}",
    params(("id" = ManagerId, Path, description = "Manager ID")),
    responses(
        (status = 204, description = "Manager deleted"),
        (status = 404, description = "Manager not found", body = ErrorResponse)
    ),
    tag = "Managers"
)]
#[instrument(skip(state))]
pub async fn delete_manager(
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
) -> Result<StatusCode, AppError> {
    ManagerService::delete_manager(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/managers/{id}/classes",
    params(("id" = ManagerId, Path, description = "Manager ID")),
    responses(
        (status = 200, description = "Classes supervised by the manager", body = Vec<ClassWithStats>),
        (status = 404, description = "Manager not found", body = ErrorResponse)
    ),
    tag = "Managers"
)]
#[instrument(skip(state))]
pub async fn get_manager_classes(
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
) -> Result<Json<Vec<ClassWithStats>>, AppError> {
    let classes = ManagerService::manager_classes(&state.db, id).await?;
    Ok(Json(classes))
}
