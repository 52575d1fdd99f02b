//! Maps failures that escape a handler to a generic 500.
//!
//! Recoverable domain outcomes (validation, duplicates) are turned into
//! redirects inside the handlers and never reach this type as such.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domains::DomainError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
