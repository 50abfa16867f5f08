use axum::{
    Json,
    extract::{Path, State},
};
use classflow_core::{AppError, ErrorResponse};
use classflow_models::ClassId;
use tracing::instrument;

use crate::modules::sessions::model::{ReplaceSessionsDto, Session, UpdateSessionDto};
use crate::modules::sessions::service::SessionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/classes/{id}/sessions",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Sessions ordered by number", body = Vec<Session>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn get_sessions(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<Session>>, AppError> {
    let sessions = SessionService::list_sessions(&state.db, id).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}/sessions",
    params(("id" = ClassId, Path, description = "Class ID")),
    request_body = ReplaceSessionsDto,
    responses(
        (status = 200, description = "Schedule replaced", body = Vec<Session>),
        (status = 400, description = "Session numbers are not 1..N", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip(state, dto))]
pub async fn replace_sessions(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<ReplaceSessionsDto>,
) -> Result<Json<Vec<Session>>, AppError> {
    let sessions = SessionService::replace_sessions(&state.db, id, dto).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}/sessions/{number}",
    params(
        ("id" = ClassId, Path, description = "Class ID"),
        ("number" = i32, Path, description = "Session number")
    ),
    request_body = UpdateSessionDto,
    responses(
        (status = 200, description = "Session updated", body = Session),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn update_session(
    State(state): State<AppState>,
    Path((id, number)): Path<(ClassId, i32)>,
    ValidatedJson(dto): ValidatedJson<UpdateSessionDto>,
) -> Result<Json<Session>, AppError> {
    let session = SessionService::update_session(&state.db, id, number, dto).await?;
    Ok(Json(session))
}
