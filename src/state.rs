/*
 * Responsibility
 * - Shared context handed to the Router (AppState)
 * - Clone is expected to be cheap (PgPool and Arc internally)
 */
use std::sync::Arc;

use crate::services::auth::AuthVerifier;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<AuthVerifier>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<AuthVerifier>) -> Self {
        Self { db, auth }
    }
}
