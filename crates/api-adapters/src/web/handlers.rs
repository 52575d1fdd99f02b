//! # Handlers
//!
//! Each handler turns the caller's session and form input into a call on the
//! directory or auth resolver, then answers with a redirect or a rendered page.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use domains::{DomainError, LoginOutcome, Post};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::cookies;
use super::error::ApiError;
use super::state::AppState;
use crate::templates::{
    HomeTemplate, LoginTemplate, NewPostTemplate, NotFoundTemplate, ProfileTemplate,
    RegisterSuccessTemplate, RegisterTemplate, UserListTemplate,
};

type HandlerResult = Result<Response, ApiError>;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// 302 to `location`.
fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

/// 302 to `location`, carrying the jar's cookie changes.
fn found_with(jar: CookieJar, location: impl Into<String>) -> Response {
    (jar, found(location)).into_response()
}

fn render(template: impl Template) -> HandlerResult {
    Ok(Html(template.render()?).into_response())
}

fn feed_path(username: &str) -> String {
    format!("/users/{username}")
}

const TAKEN_NOTICE: &str = "That username is already taken.";
const INVALID_NOTICE: &str = "Usernames and passwords must be 3 to 16 letters or digits.";

// ── Sign in / out ───────────────────────────────────────────────────────────

/// `GET /`: the login form, or the caller's feed when signed in.
pub async fn index(jar: CookieJar) -> HandlerResult {
    match cookies::session(&jar) {
        Some(name) => Ok(found(feed_path(&name))),
        None => render(LoginTemplate { failed: false }),
    }
}

/// `GET /incorrectPassword`
pub async fn incorrect_password(jar: CookieJar) -> HandlerResult {
    match cookies::session(&jar) {
        Some(name) => Ok(found(feed_path(&name))),
        None => render(LoginTemplate { failed: true }),
    }
}

/// `POST /` and `POST /incorrectPassword`.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Some(name) = cookies::session(&jar) {
        return found(feed_path(&name));
    }

    match state.auth.classify(&form.username, &form.password).await {
        LoginOutcome::Correct => {
            info!(username = %form.username, "login succeeded");
            let session = cookies::build(
                cookies::USERNAME,
                form.username.clone(),
                cookies::SESSION_MAX_AGE_SECS,
            );
            found_with(jar.add(session), "/")
        }
        outcome => {
            info!(username = %form.username, %outcome, "login rejected");
            found("/incorrectPassword")
        }
    }
}

/// `GET /logout`
pub async fn logout(jar: CookieJar) -> Response {
    match cookies::session(&jar) {
        Some(name) => {
            debug!(username = %name, "logout");
            found_with(jar.remove(cookies::removal(cookies::USERNAME)), "/")
        }
        None => found("/"),
    }
}

// ── Registration ────────────────────────────────────────────────────────────

async fn register_page(viewer: Option<String>, notice: Option<&'static str>) -> HandlerResult {
    match viewer {
        Some(name) => Ok(found(feed_path(&name))),
        None => render(RegisterTemplate { notice }),
    }
}

/// `GET /register`
pub async fn register_form(jar: CookieJar) -> HandlerResult {
    register_page(cookies::session(&jar), None).await
}

/// `GET /registerUsernameAlreadyTaken`
pub async fn register_taken_form(jar: CookieJar) -> HandlerResult {
    register_page(cookies::session(&jar), Some(TAKEN_NOTICE)).await
}

/// `GET /registerInvalidSymbols`
pub async fn register_invalid_form(jar: CookieJar) -> HandlerResult {
    register_page(cookies::session(&jar), Some(INVALID_NOTICE)).await
}

/// `POST` on any of the three registration pages.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> HandlerResult {
    if let Some(name) = cookies::session(&jar) {
        return Ok(found(feed_path(&name)));
    }

    match state.directory.register(&form.account, &form.password).await {
        Ok(_) => {
            let flag = cookies::build(
                cookies::REGISTER_SUCCESS,
                "true",
                cookies::REGISTER_SUCCESS_MAX_AGE_SECS,
            );
            Ok(found_with(jar.add(flag), "/registerSuccess"))
        }
        Err(DomainError::DuplicateUsername(_)) => Ok(found("/registerUsernameAlreadyTaken")),
        Err(DomainError::Validation(err)) => {
            debug!(account = %form.account, error = %err, "registration rejected");
            Ok(found("/registerInvalidSymbols"))
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /registerSuccess`: shown once, right after registering.
pub async fn register_success(jar: CookieJar) -> HandlerResult {
    if let Some(name) = cookies::session(&jar) {
        return Ok(found(feed_path(&name)));
    }
    if cookies::read(&jar, cookies::REGISTER_SUCCESS).is_none() {
        return Ok(found("/"));
    }

    let page = Html(RegisterSuccessTemplate.render()?);
    let jar = jar.remove(cookies::removal(cookies::REGISTER_SUCCESS));
    Ok((jar, page).into_response())
}

// ── Feeds ───────────────────────────────────────────────────────────────────

/// `GET /userList`
pub async fn user_list(State(state): State<AppState>, jar: CookieJar) -> HandlerResult {
    let Some(viewer) = cookies::session(&jar) else {
        return Ok(found("/"));
    };
    let users = state.directory.users().await;
    render(UserListTemplate { viewer, users })
}

/// `GET /users/{username}`: own feed with a post link, or a read-only one.
pub async fn user_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(username): Path<String>,
) -> HandlerResult {
    let Some(viewer) = cookies::session(&jar) else {
        return Ok(found("/"));
    };

    let Some(user) = state.directory.lookup(&username).await else {
        let page = Html(NotFoundTemplate { viewer, username }.render()?);
        return Ok((StatusCode::NOT_FOUND, page).into_response());
    };

    if user.username == viewer {
        render(HomeTemplate { viewer, user })
    } else {
        render(ProfileTemplate { viewer, user })
    }
}

// ── Posting ─────────────────────────────────────────────────────────────────

async fn new_post_page(viewer: Option<String>, username: String, invalid: bool) -> HandlerResult {
    let Some(viewer) = viewer else {
        return Ok(found("/"));
    };
    if viewer != username {
        return Ok(found(format!("/users/{viewer}/newPost")));
    }
    render(NewPostTemplate { viewer, invalid })
}

/// `GET /users/{username}/newPost`
pub async fn new_post_form(jar: CookieJar, Path(username): Path<String>) -> HandlerResult {
    new_post_page(cookies::session(&jar), username, false).await
}

/// `GET /users/{username}/newPostInvalidSymbols`
pub async fn new_post_invalid_form(jar: CookieJar, Path(username): Path<String>) -> HandlerResult {
    new_post_page(cookies::session(&jar), username, true).await
}

/// `POST /users/{username}/newPost`: appends to the caller's own feed only.
pub async fn create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(username): Path<String>,
    Form(form): Form<PostForm>,
) -> HandlerResult {
    let Some(viewer) = cookies::session(&jar) else {
        return Ok(found("/"));
    };
    if viewer != username {
        warn!(viewer = %viewer, requested = %username, "post to another user's feed refused");
        return Ok(found(feed_path(&viewer)));
    }

    match state
        .directory
        .append_post(&viewer, Post::now(form.title, form.body))
        .await
    {
        Ok(user) => {
            info!(username = %viewer, post_count = user.post_count, "post published");
            Ok(found(feed_path(&viewer)))
        }
        Err(DomainError::Validation(err)) => {
            debug!(username = %viewer, error = %err, "post rejected");
            Ok(found(format!("/users/{viewer}/newPostInvalidSymbols")))
        }
        Err(DomainError::UnknownUser(_)) => {
            warn!(username = %viewer, "session names an unknown user");
            Ok(found_with(jar.remove(cookies::removal(cookies::USERNAME)), "/"))
        }
        Err(err) => Err(err.into()),
    }
}
