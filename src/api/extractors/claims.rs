//! Extractor handing verified token claims to handlers.
//!
//! The guard middleware verifies the token and inserts [`DecodedClaims`]
//! into the request extensions; handlers receive them through this type
//! only. A missing value means the route was wired without the guard,
//! which answers 401 rather than running the handler unauthenticated.

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::DecodedClaims;
use crate::state::AppState;

pub struct Claims(pub DecodedClaims);

impl FromRequestParts<AppState> for Claims {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<DecodedClaims>()
            .cloned()
            .map(Claims)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
