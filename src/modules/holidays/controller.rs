use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use classflow_core::{AppError, ErrorResponse};
use classflow_models::HolidayId;
use tracing::instrument;

use crate::modules::holidays::model::{
    BulkCreateHolidaysDto, BulkCreateHolidaysResponse, CreateHolidayDto, Holiday,
    HolidayFilterParams, HolidayRangeParams, UpcomingHolidaysParams, UpdateHolidayDto,
};
use crate::modules::holidays::service::HolidayService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/holidays",
    params(HolidayFilterParams),
    responses(
        (status = 200, description = "Holidays ordered by date", body = Vec<Holiday>),
        (status = 400, description = "Invalid year", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn get_holidays(
    State(state): State<AppState>,
    Query(params): Query<HolidayFilterParams>,
) -> Result<Json<Vec<Holiday>>, AppError> {
    let holidays = HolidayService::list_holidays(&state.db, params.year).await?;
    Ok(Json(holidays))
}

#[utoipa::path(
    get,
    path = "/api/holidays/upcoming",
    params(UpcomingHolidaysParams),
    responses(
        (status = 200, description = "Holidays from today onward", body = Vec<Holiday>)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn get_upcoming_holidays(
    State(state): State<AppState>,
    Query(params): Query<UpcomingHolidaysParams>,
) -> Result<Json<Vec<Holiday>>, AppError> {
    let holidays = HolidayService::upcoming_holidays(&state.db, params.limit()).await?;
    Ok(Json(holidays))
}

#[utoipa::path(
    get,
    path = "/api/holidays/range",
    params(HolidayRangeParams),
    responses(
        (status = 200, description = "Holidays within the inclusive range", body = Vec<Holiday>),
        (status = 400, description = "Missing or malformed dates", body = ErrorResponse),
        (status = 422, description = "end_date before start_date", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn get_holidays_in_range(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<HolidayRangeParams>,
) -> Result<Json<Vec<Holiday>>, AppError> {
    let holidays =
        HolidayService::holidays_in_range(&state.db, params.start_date, params.end_date).await?;
    Ok(Json(holidays))
}

#[utoipa::path(
    get,
    path = "/api/holidays/{id}",
    params(("id" = HolidayId, Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday", body = Holiday),
        (status = 404, description = "Holiday not found", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn get_holiday(
    State(state): State<AppState>,
    Path(id): Path<HolidayId>,
) -> Result<Json<Holiday>, AppError> {
    let holiday = HolidayService::get_holiday(&state.db, id).await?;
    Ok(Json(holiday))
}

#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = CreateHolidayDto,
    responses(
        (status = 201, description = "Holiday created", body = Holiday),
        (status = 409, description = "A holiday already exists on that date", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn create_holiday(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateHolidayDto>,
) -> Result<(StatusCode, Json<Holiday>), AppError> {
    let holiday = HolidayService::create_holiday(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(holiday)))
}

#[utoipa::path(
    post,
    path = "/api/holidays/bulk",
    request_body = BulkCreateHolidaysDto,
    responses(
        (status = 201, description = "Holidays inserted, existing dates skipped", body = BulkCreateHolidaysResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state, dto))]
pub async fn bulk_create_holidays(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<BulkCreateHolidaysDto>,
) -> Result<(StatusCode, Json<BulkCreateHolidaysResponse>), AppError> {
    let result = HolidayService::bulk_create_holidays(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    put,
    path = "/api/holidays/{id}",
    params(("id" = HolidayId, Path, description = "Holiday ID")),
    request_body = UpdateHolidayDto,
    responses(
        (status = 200, description = "Holiday updated", body = Holiday),
        (status = 404, description = "Holiday not found", body = ErrorResponse),
        (status = 409, description = "A holiday already exists on that date", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn update_holiday(
    State(state): State<AppState>,
    Path(id): Path<HolidayId>,
    ValidatedJson(dto): ValidatedJson<UpdateHolidayDto>,
) -> Result<Json<Holiday>, AppError> {
    let holiday = HolidayService::update_holiday(&state.db, id, dto).await?;
    Ok(Json(holiday))
}

#[utoipa::path(
    delete,
    path = "/api/holidays/{id}",
    params(("id" = HolidayId, Path, description = "Holiday ID")),
    responses(
        (status = 204, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found", body = ErrorResponse)
    ),
    tag = "Holidays"
)]
#[instrument(skip(state))]
pub async fn delete_holiday(
    State(state): State<AppState>,
    Path(id): Path<HolidayId>,
) -> Result<StatusCode, AppError> {
    HolidayService::delete_holiday(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
