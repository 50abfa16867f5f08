use axum::{Json, extract::State};
use classflow_core::AppError;
use tracing::instrument;

use crate::modules::dashboard::model::DashboardResponse;
use crate::modules::dashboard::service::DashboardService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Entity counts, last week's attendance and the next scheduled sessions", body = DashboardResponse)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let overview = DashboardService::overview(&state.db).await?;
    Ok(Json(overview))
}
