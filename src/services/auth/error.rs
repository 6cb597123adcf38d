//! Error taxonomy for the token verification pipeline.
//!
//! Responsibility:
//! - One error kind (`AuthError`) for everything between "header arrived"
//!   and "claims accepted", carrying a stable machine-readable code, a
//!   client-facing description, and the HTTP status to answer with.
//! - Keep identity-provider outages distinct from bad tokens: a failed
//!   JWKS fetch is a degraded verifier (5xx), not a caller problem (401).

use axum::http::StatusCode;
use thiserror::Error;

use crate::services::auth::jwks::JwksError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Absent/malformed Authorization header, undecodable token structure,
    /// or a key id that cannot be resolved against the current key set.
    #[error("{0}")]
    InvalidHeader(&'static str),

    /// Signature checked out but the token is past its expiry.
    #[error("Token expired.")]
    TokenExpired,

    /// Audience/issuer mismatch, or the permissions claim is missing
    /// entirely (RBAC not enabled upstream).
    #[error("{0}")]
    InvalidClaims(&'static str),

    /// Authenticated, but the required permission is not granted.
    #[error("Permission not found.")]
    Forbidden,

    /// The signing key set could not be refreshed. Not a token error.
    #[error("signing key set unavailable: {0}")]
    KeySetUnavailable(#[source] JwksError),
}

impl AuthError {
    /// Stable code, serialized into logs and used for monitoring.
    /// The client-facing body carries `description()` instead.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidHeader(_) => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::Forbidden => "unauthorized",
            Self::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidHeader(_) | Self::TokenExpired | Self::InvalidClaims(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Human-readable message included in the error response body.
    ///
    /// Dependency failures intentionally do not echo transport details
    /// to the client; the full chain goes to the logs via `Display`.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidHeader(description) => description,
            Self::TokenExpired => "Token expired.",
            Self::InvalidClaims(description) => description,
            Self::Forbidden => "Permission not found.",
            Self::KeySetUnavailable(_) => "Unable to verify authentication token right now.",
        }
    }
}
