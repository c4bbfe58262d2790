use axum::{
    Form,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::application::blog_service::BlogService;
use crate::domain::error::DomainError;
use crate::domain::post::PostForm;
use crate::presentation::http::app_error::{AppError, AppResult};
use crate::presentation::http::db::RequestDb;
use crate::presentation::http::middleware::auth::{CurrentUser, OptionalUser};
use crate::presentation::http::views;

const FEED_PATH: &str = "/";

// `/{id}/...` only matches integer ids; anything else is a missing route.
pub(crate) struct PostId(i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NoRoute)?;
        Ok(PostId(id))
    }
}

pub(crate) async fn index(
    OptionalUser(viewer): OptionalUser,
    mut db: RequestDb,
) -> AppResult<Html<String>> {
    let posts = BlogService::new(db.conn().await?).list_posts().await?;
    Ok(Html(views::index(viewer.as_ref(), &posts)))
}

pub(crate) async fn create_form(CurrentUser(user): CurrentUser) -> Html<String> {
    Html(views::create_form(&user, &PostForm::default(), None))
}

pub(crate) async fn create(
    CurrentUser(user): CurrentUser,
    mut db: RequestDb,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let result = BlogService::new(db.conn().await?)
        .create_post(user.id, form.clone())
        .await
        .map(|_| ());

    redirect_or_rerender(result, |message| {
        views::create_form(&user, &form, Some(message))
    })
}

pub(crate) async fn update_form(
    PostId(id): PostId,
    CurrentUser(user): CurrentUser,
    mut db: RequestDb,
) -> AppResult<Html<String>> {
    let post = BlogService::new(db.conn().await?)
        .get_post_checked(id, user.id, true)
        .await?;
    let form = PostForm::new(post.title.clone(), post.body);
    Ok(Html(views::update_form(&user, id, &post.title, &form, None)))
}

pub(crate) async fn update(
    PostId(id): PostId,
    CurrentUser(user): CurrentUser,
    mut db: RequestDb,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let mut blog = BlogService::new(db.conn().await?);

    match blog.update_post(user.id, id, form.clone()).await {
        Ok(()) => Ok(Redirect::to(FEED_PATH).into_response()),
        Err(DomainError::Validation { message, .. }) => {
            let stored = blog.get_post_checked(id, user.id, true).await?;
            let page = views::update_form(&user, id, &stored.title, &form, Some(&message));
            Ok(Html(page).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete(
    PostId(id): PostId,
    CurrentUser(user): CurrentUser,
    mut db: RequestDb,
) -> AppResult<Redirect> {
    BlogService::new(db.conn().await?)
        .delete_post(user.id, id)
        .await?;
    Ok(Redirect::to(FEED_PATH))
}

fn redirect_or_rerender(
    result: Result<(), DomainError>,
    rerender: impl FnOnce(&str) -> String,
) -> AppResult<Response> {
    match result {
        Ok(()) => Ok(Redirect::to(FEED_PATH).into_response()),
        Err(DomainError::Validation { message, .. }) => Ok(Html(rerender(&message)).into_response()),
        Err(err) => Err(err.into()),
    }
}
