//! # web
//!
//! The axum router: page routes, static images and the access-log layer.

pub mod cookies;
pub mod error;
pub mod handlers;
pub mod state;

use std::path::Path;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the full application router.
///
/// Both `/users/{username}` and `/users/{username}/` render a feed. The three
/// registration URLs share one POST handler, as do the two login URLs and the
/// two new-post URLs; only the GET pages differ by the notice they show.
pub fn router(state: AppState, images_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::login))
        .route(
            "/incorrectPassword",
            get(handlers::incorrect_password).post(handlers::login),
        )
        .route("/logout", get(handlers::logout))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route(
            "/registerUsernameAlreadyTaken",
            get(handlers::register_taken_form).post(handlers::register),
        )
        .route(
            "/registerInvalidSymbols",
            get(handlers::register_invalid_form).post(handlers::register),
        )
        .route("/registerSuccess", get(handlers::register_success))
        .route("/userList", get(handlers::user_list))
        .route("/users/{username}", get(handlers::user_page))
        .route("/users/{username}/", get(handlers::user_page))
        .route(
            "/users/{username}/newPost",
            get(handlers::new_post_form).post(handlers::create_post),
        )
        .route(
            "/users/{username}/newPostInvalidSymbols",
            get(handlers::new_post_invalid_form).post(handlers::create_post),
        )
        .nest_service("/images", ServeDir::new(images_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
