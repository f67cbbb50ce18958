// src/state.rs
use sqlx::PgPool;

use crate::auth::AuthClient;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthClient,
}
