use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure talking to the GitHub REST API.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GitHub API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("Network error talking to GitHub: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing 'username' query parameter")]
    MissingUsername,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUsername => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
