/*
 * Responsibility
 * - URL structure of the API (paths match what the existing frontend
 *   calls, so no version prefix)
 * - Which routes are guarded, and with which permission — the mapping
 *   is fixed here, not configurable at runtime
 */
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};
use crate::middleware::auth::require_permission;
use crate::services::auth::permissions;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks))
        .route(
            "/drinks-detail",
            get(list_drinks_detail).route_layer(from_fn_with_state(
                (state.clone(), permissions::GET_DRINKS_DETAIL),
                require_permission,
            )),
        )
        .route(
            "/drinks",
            post(create_drink).route_layer(from_fn_with_state(
                (state.clone(), permissions::POST_DRINKS),
                require_permission,
            )),
        )
        .route(
            "/drinks/{drink_id}",
            patch(update_drink).route_layer(from_fn_with_state(
                (state.clone(), permissions::PATCH_DRINKS),
                require_permission,
            )),
        )
        .route(
            "/drinks/{drink_id}",
            delete(delete_drink).route_layer(from_fn_with_state(
                (state, permissions::DELETE_DRINKS),
                require_permission,
            )),
        )
}
