use std::sync::Arc;

use sqlx::SqlitePool;

use crate::infrastructure::session::SessionService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: SqlitePool,
    pub(crate) sessions: Arc<SessionService>,
    pub(crate) secure_cookies: bool,
}

impl AppState {
    pub(crate) fn new(pool: SqlitePool, sessions: Arc<SessionService>, secure_cookies: bool) -> Self {
        Self {
            pool,
            sessions,
            secure_cookies,
        }
    }
}
