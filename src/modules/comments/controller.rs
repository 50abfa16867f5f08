use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classflow_core::{AppError, ErrorResponse};
use classflow_models::{ClassId, StudentId};
use tracing::instrument;

use crate::modules::comments::model::{
    Comment, CommentWithStudent, ReplaceCommentsDto, UpsertCommentDto,
};
use crate::modules::comments::service::CommentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/classes/{id}/comments",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Comments of the class", body = Vec<CommentWithStudent>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<CommentWithStudent>>, AppError> {
    let comments = CommentService::list_comments(&state.db, id).await?;
    Ok(Json(comments))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}/comments",
    params(("id" = ClassId, Path, description = "Class ID")),
    request_body = ReplaceCommentsDto,
    responses(
        (status = 200, description = "Comments replaced", body = Vec<CommentWithStudent>),
        (status = 400, description = "Unknown student", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state, dto))]
pub async fn replace_comments(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<ReplaceCommentsDto>,
) -> Result<Json<Vec<CommentWithStudent>>, AppError> {
    let comments = CommentService::replace_comments(&state.db, id, dto).await?;
    Ok(Json(comments))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}/comments/{student_id}",
    params(
        ("id" = ClassId, Path, description = "Class ID"),
        ("student_id" = StudentId, Path, description = "Student ID")
    ),
    request_body = UpsertCommentDto,
    responses(
        (status = 200, description = "Comment stored", body = Comment),
        (status = 204, description = "Blank comment, existing comment removed"),
        (status = 400, description = "Unknown student", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn upsert_comment(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(ClassId, StudentId)>,
    ValidatedJson(dto): ValidatedJson<UpsertCommentDto>,
) -> Result<Response, AppError> {
    let response = match CommentService::upsert_comment(&state.db, id, student_id, dto).await? {
        Some(comment) => Json(comment).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}/comments/{student_id}",
    params(
        ("id" = ClassId, Path, description = "Class ID"),
        ("student_id" = StudentId, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(ClassId, StudentId)>,
) -> Result<StatusCode, AppError> {
    CommentService::delete_comment(&state.db, id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
