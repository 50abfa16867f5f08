use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    bulk_create_holidays, create_holiday, delete_holiday, get_holiday, get_holidays,
    get_holidays_in_range, get_upcoming_holidays, update_holiday,
};

pub fn init_holidays_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_holidays).post(create_holiday))
        .route("/bulk", post(bulk_create_holidays))
        .route("/upcoming", get(get_upcoming_holidays))
        .route("/range", get(get_holidays_in_range))
        .route(
            "/{id}",
            get(get_holiday).put(update_holiday).delete(delete_holiday),
        )
}
