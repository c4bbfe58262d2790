use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::application::auth_service::AuthService;
use crate::domain::user::User;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;
use crate::presentation::http::db::RequestDb;

pub(crate) const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone)]
pub(crate) struct OptionalUser(pub(crate) Option<User>);

#[derive(Debug, Clone)]
pub(crate) struct CurrentUser(pub(crate) User);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<OptionalUser>()
            .cloned()
            .unwrap_or(OptionalUser(None)))
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OptionalUser>()
            .and_then(|user| user.0.clone())
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

pub(crate) async fn load_current_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match jar.get(SESSION_COOKIE) {
        Some(cookie) => resolve_session(&state, cookie.value()).await?,
        None => None,
    };

    request.extensions_mut().insert(OptionalUser(user));
    Ok(next.run(request).await)
}

async fn resolve_session(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
    let mut db = RequestDb::new(state.pool.clone());
    let mut auth = AuthService::new(db.conn().await?, &state.sessions);
    Ok(auth.current_user(token).await?)
}

pub(crate) fn session_cookie(token: String, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(time::Duration::seconds(ttl_seconds))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub(crate) fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
