//! Permission scopes and the scope authorizer.
//!
//! The permission string for each protected operation is fixed at compile
//! time; the identity provider decides which of them a subject holds.

use crate::services::auth::{error::AuthError, verifier::DecodedClaims};

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Check that `claims` grant `required`.
///
/// A token without any `permissions` claim is a provider misconfiguration
/// (RBAC not enabled for the API) and is reported as `invalid_claims`,
/// distinct from an authenticated subject that simply lacks the grant.
pub fn check_permissions(required: &str, claims: &DecodedClaims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::InvalidClaims("Permissions not included in JWT."))?;

    if !granted.iter().any(|permission| permission == required) {
        return Err(AuthError::Forbidden);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: Option<Vec<&str>>) -> DecodedClaims {
        DecodedClaims {
            iss: "https://tenant.example.com/".to_owned(),
            aud: serde_json::Value::String("drinks".to_owned()),
            sub: "auth0|tester".to_owned(),
            exp: 4_102_444_800,
            permissions: permissions.map(|p| p.into_iter().map(str::to_owned).collect()),
        }
    }

    #[test]
    fn missing_permissions_claim_is_invalid_claims() {
        let err = check_permissions(GET_DRINKS_DETAIL, &claims(None)).unwrap_err();
        assert_eq!(err.code(), "invalid_claims");
        assert_eq!(err.description(), "Permissions not included in JWT.");
    }

    #[test]
    fn absent_grant_is_forbidden() {
        let err = check_permissions(DELETE_DRINKS, &claims(Some(vec![POST_DRINKS]))).unwrap_err();
        assert_eq!(err.code(), "unauthorized");
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn empty_grant_list_is_forbidden_not_invalid() {
        let err = check_permissions(PATCH_DRINKS, &claims(Some(vec![]))).unwrap_err();
        assert_eq!(err.code(), "unauthorized");
    }

    #[test]
    fn present_grant_passes() {
        let granted = claims(Some(vec![GET_DRINKS_DETAIL, PATCH_DRINKS]));
        assert!(check_permissions(PATCH_DRINKS, &granted).is_ok());
    }
}
