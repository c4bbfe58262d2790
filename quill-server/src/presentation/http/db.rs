use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::trace;

use super::app_error::AppResult;
use crate::presentation::AppState;

// acquired on first `conn()`, returned to the pool on drop
pub(crate) struct RequestDb {
    pool: SqlitePool,
    conn: Option<PoolConnection<Sqlite>>,
}

impl RequestDb {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool, conn: None }
    }

    pub(crate) async fn conn(&mut self) -> AppResult<&mut SqliteConnection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                trace!("acquiring request connection");
                self.pool.acquire().await?
            }
        };
        let conn: &mut SqliteConnection = self.conn.insert(conn);
        Ok(conn)
    }

    #[cfg(test)]
    pub(crate) fn is_acquired(&self) -> bool {
        self.conn.is_some()
    }
}

impl Drop for RequestDb {
    fn drop(&mut self) {
        if self.conn.take().is_some() {
            trace!("released request connection");
        }
    }
}

impl FromRequestParts<AppState> for RequestDb {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::new(state.pool.clone()))
    }
}
