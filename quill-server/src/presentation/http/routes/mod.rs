use axum::Router;

use crate::presentation::AppState;

pub(crate) mod auth;
pub(crate) mod posts;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .merge(posts::router())
        .nest("/auth", auth::router())
}
