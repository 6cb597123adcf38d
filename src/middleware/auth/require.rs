//! Permission guard for protected routes.
//!
//! Applied per route with `from_fn_with_state`, carrying the required
//! permission alongside the shared state:
//!
//! ```ignore
//! .route(
//!     "/drinks-detail",
//!     get(list_drinks_detail).route_layer(from_fn_with_state(
//!         (state.clone(), permissions::GET_DRINKS_DETAIL),
//!         require_permission,
//!     )),
//! )
//! ```
//!
//! The whole header-to-claims pipeline (extraction, verification, scope
//! check) lives in `services::auth`; this middleware only orchestrates it
//! and moves the verified claims into the request extensions. Any failure
//! rejects the request before the handler runs.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub async fn require_permission(
    State((state, permission)): State<(AppState, &'static str)>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match state.auth.authorize(req.headers(), permission).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                required = permission,
                "request rejected: {err}"
            );
            return Err(AppError::Auth(err));
        }
    };

    // Handlers pick these up through the Claims extractor.
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
