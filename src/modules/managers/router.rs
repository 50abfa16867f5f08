use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_manager, delete_manager, get_manager, get_manager_classes, get_managers,
    update_manager,
};

pub fn init_managers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_managers).post(create_manager))
        .route(
            "/{id}",
            get(get_manager).put(update_manager).delete(delete_manager),
        )
        .route("/{id}/classes", get(get_manager_classes))
}
