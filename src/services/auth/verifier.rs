//! Bearer-token decoding and verification.
//!
//! Responsibility:
//! - Header extraction: presence + `Bearer` scheme, exactly one token.
//! - Structural decode of the token header to learn `kid` before any
//!   signature work.
//! - Key resolution through [`JwksClient`], then signature + claims
//!   verification (issuer, audience, expiry) via `jsonwebtoken`.
//!
//! Every stage short-circuits with an [`AuthError`] whose code tells the
//! stages apart; nothing here touches the database or request routing.

use anyhow::Context;
use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header, errors::ErrorKind};
use serde::Deserialize;

use crate::config::Config;
use crate::services::auth::{
    error::AuthError,
    jwks::{JwksClient, JwksError},
    permissions,
};

/// Verified token payload, created fresh per request.
///
/// `aud` stays a `serde_json::Value` because providers issue it as either
/// a string or an array; `jsonwebtoken` has already checked it against
/// the configured audience by the time a value of this type exists.
///
/// `permissions: None` means the claim was absent from the token, which
/// is not the same thing as an empty grant list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodedClaims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Holds the verification configuration and owns the JWKS cache.
///
/// Built once at startup from [`Config`] and shared through `AppState`;
/// there is deliberately no module-level state.
pub struct AuthVerifier {
    jwks: JwksClient,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let algorithms = config
            .auth_algorithms
            .iter()
            .map(|name| {
                name.parse::<Algorithm>()
                    .with_context(|| format!("unsupported signing algorithm {name:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut validation = Validation::new(
            *algorithms.first().context("ALGORITHMS must not be empty")?,
        );
        validation.algorithms = algorithms;
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[&config.api_audience]);
        validation.leeway = config.access_token_leeway_seconds;

        let jwks_url = config
            .jwks_url()
            .parse()
            .context("invalid JWKS endpoint URL")?;
        let jwks = JwksClient::new(
            jwks_url,
            config.jwks_cache_ttl,
            config.jwks_fetch_timeout,
        )
        .context("failed to build JWKS client")?;

        Ok(Self { jwks, validation })
    }

    /// Full header-to-claims pipeline for one protected operation:
    /// extract the bearer token, verify it, check the required
    /// permission. This is what the guard middleware calls.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required_permission: &str,
    ) -> Result<DecodedClaims, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verify(token).await?;
        permissions::check_permissions(required_permission, &claims)?;
        Ok(claims)
    }

    /// Verify a raw token string into [`DecodedClaims`].
    pub async fn verify(&self, token: &str) -> Result<DecodedClaims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::InvalidHeader("Unable to parse authentication token."))?;

        let kid = header
            .kid
            .ok_or(AuthError::InvalidHeader("Authorization malformed."))?;

        let key = match self.jwks.decoding_key(&kid).await {
            Ok(key) => key,
            Err(JwksError::KeyNotFound { .. } | JwksError::UnsupportedKey { .. }) => {
                return Err(AuthError::InvalidHeader("Unable to find the appropriate key."));
            }
            Err(err) => return Err(AuthError::KeySetUnavailable(err)),
        };

        let data = decode::<DecodedClaims>(token, &key, &self.validation).map_err(map_jwt_error)?;
        Ok(data.claims)
    }
}

/// Pull the bearer token out of the `Authorization` header.
///
/// Kept as a free function so the stage is testable without any key
/// material.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidHeader("Authorization header is expected."))?;

    let mut parts = value.split_whitespace();

    let scheme = parts
        .next()
        .ok_or(AuthError::InvalidHeader("Authorization header is expected."))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidHeader(
            "Authorization header must start with Bearer.",
        ));
    }

    let token = parts
        .next()
        .ok_or(AuthError::InvalidHeader("Token not found."))?;

    if parts.next().is_some() {
        return Err(AuthError::InvalidHeader(
            "Authorization header must be Bearer token.",
        ));
    }

    Ok(token)
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::InvalidClaims("Incorrect claims. Please, check the audience and issuer.")
        }
        _ => AuthError::InvalidHeader("Unable to parse authentication token."),
    }
}
