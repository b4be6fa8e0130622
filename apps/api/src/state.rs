use sqlx::PgPool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Kept on state for handlers that need runtime settings; currently
    /// only the startup path reads it.
    #[allow(dead_code)]
    pub config: Config,
}
