use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, LOGIN_PATH};
use crate::presentation::http::db::RequestDb;
use crate::presentation::http::middleware::auth::{removal_cookie, session_cookie};
use crate::presentation::http::views;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterDto {
    #[serde(default)]
    #[validate(length(min = 3, max = 64, message = "Username must be 3..64 characters."))]
    pub(crate) username: String,
    #[serde(default)]
    #[validate(length(min = 8, max = 128, message = "Password must be 8..128 characters."))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required."))]
    pub(crate) username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub(crate) password: String,
}

pub(crate) async fn register_form() -> Html<String> {
    Html(views::register_form("", None))
}

pub(crate) async fn register(
    State(state): State<AppState>,
    mut db: RequestDb,
    Form(dto): Form<RegisterDto>,
) -> AppResult<Response> {
    if let Err(errors) = dto.validate() {
        let message = first_message(&errors);
        return Ok(Html(views::register_form(&dto.username, Some(&message))).into_response());
    }

    let username = dto.username.clone();
    let req = RegisterRequest {
        username: dto.username,
        password: dto.password,
    };

    match AuthService::new(db.conn().await?, &state.sessions)
        .register(req)
        .await
    {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(err @ (DomainError::Validation { .. } | DomainError::AlreadyExists(_))) => {
            Ok(Html(views::register_form(&username, Some(&err.to_string()))).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn login_form() -> Html<String> {
    Html(views::login_form("", None))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut db: RequestDb,
    Form(dto): Form<LoginDto>,
) -> AppResult<Response> {
    if let Err(errors) = dto.validate() {
        let message = first_message(&errors);
        return Ok(Html(views::login_form(&dto.username, Some(&message))).into_response());
    }

    let username = dto.username.clone();
    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    match AuthService::new(db.conn().await?, &state.sessions)
        .login(req)
        .await
    {
        Ok(token) => {
            let cookie = session_cookie(
                token,
                state.sessions.ttl_seconds(),
                state.secure_cookies,
            );
            Ok((jar.add(cookie), Redirect::to("/")).into_response())
        }
        Err(err @ (DomainError::Validation { .. } | DomainError::InvalidCredentials)) => {
            Ok(Html(views::login_form(&username, Some(&err.to_string()))).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(removal_cookie()), Redirect::to("/"))
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input.".to_string())
}
