pub mod error;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use error::AuthError;
pub use verifier::{AuthVerifier, DecodedClaims};
