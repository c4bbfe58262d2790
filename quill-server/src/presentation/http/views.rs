use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::post::{Post, PostForm};
use crate::domain::user::User;

pub(crate) fn index(viewer: Option<&User>, posts: &[Post]) -> String {
    let mut content = String::from(r#"<header><h1>Posts</h1>"#);
    if viewer.is_some() {
        content.push_str(r#"<a class="action" href="/create">New</a>"#);
    }
    content.push_str("</header>");

    for post in posts {
        let edit = match viewer {
            Some(user) if post.is_authored_by(user.id) => {
                format!(r#"<a class="action" href="/{}/update">Edit</a>"#, post.id)
            }
            _ => String::new(),
        };
        content.push_str(&format!(
            r#"<article class="post"><header><div><h1>{title}</h1><div class="about">by {author} on {created}</div></div>{edit}</header><p class="body">{body}</p></article>"#,
            title = encode_text(&post.title),
            author = encode_text(&post.username),
            created = post.created.format("%Y-%m-%d"),
            body = encode_text(&post.body),
        ));
    }

    layout("Posts", viewer, &content)
}

pub(crate) fn create_form(viewer: &User, form: &PostForm, error: Option<&str>) -> String {
    let content = format!(
        r#"<header><h1>New Post</h1></header>{flash}{fields}"#,
        flash = flash(error),
        fields = post_fields("/create", form),
    );
    layout("New Post", Some(viewer), &content)
}

pub(crate) fn update_form(
    viewer: &User,
    post_id: i64,
    stored_title: &str,
    form: &PostForm,
    error: Option<&str>,
) -> String {
    let content = format!(
        r#"<header><h1>Edit "{heading}"</h1></header>{flash}{fields}<hr><form action="/{post_id}/delete" method="post"><input class="danger" type="submit" value="Delete" onclick="return confirm('Are you sure?');"></form>"#,
        heading = encode_text(stored_title),
        flash = flash(error),
        fields = post_fields(&format!("/{post_id}/update"), form),
    );
    layout("Edit Post", Some(viewer), &content)
}

pub(crate) fn register_form(username: &str, error: Option<&str>) -> String {
    credentials_form("Register", "/auth/register", username, error)
}

pub(crate) fn login_form(username: &str, error: Option<&str>) -> String {
    credentials_form("Log In", "/auth/login", username, error)
}

pub(crate) fn error_page(status: &str, message: &str) -> String {
    layout(
        status,
        None,
        &format!(
            "<h1>{}</h1><p>{}</p>",
            encode_text(status),
            encode_text(message)
        ),
    )
}

fn credentials_form(heading: &str, action: &str, username: &str, error: Option<&str>) -> String {
    let content = format!(
        r#"<header><h1>{heading}</h1></header>{flash}<form method="post" action="{action}"><label for="username">Username</label><input name="username" id="username" value="{username}" required><label for="password">Password</label><input type="password" name="password" id="password" required><input type="submit" value="{heading}"></form>"#,
        flash = flash(error),
        username = encode_double_quoted_attribute(username),
    );
    layout(heading, None, &content)
}

fn post_fields(action: &str, form: &PostForm) -> String {
    format!(
        r#"<form method="post" action="{action}"><label for="title">Title</label><input name="title" id="title" value="{title}" required><label for="body">Body</label><textarea name="body" id="body">{body}</textarea><input type="submit" value="Save"></form>"#,
        title = encode_double_quoted_attribute(&form.title),
        body = encode_text(&form.body),
    )
}

fn flash(error: Option<&str>) -> String {
    error
        .map(|message| format!(r#"<div class="flash">{}</div>"#, encode_text(message)))
        .unwrap_or_default()
}

fn layout(title: &str, viewer: Option<&User>, content: &str) -> String {
    let nav = match viewer {
        Some(user) => format!(
            r#"<li><span>{}</span><li><a href="/auth/logout">Log Out</a>"#,
            encode_text(&user.username)
        ),
        None => {
            r#"<li><a href="/auth/register">Register</a><li><a href="/auth/login">Log In</a>"#
                .to_string()
        }
    };
    format!(
        r#"<!doctype html><html><head><meta charset="utf-8"><title>{title} - Quill</title></head><body><nav><h1><a href="/">Quill</a></h1><ul>{nav}</ul></nav><section class="content">{content}</section></body></html>"#,
        title = encode_text(title),
    )
}
