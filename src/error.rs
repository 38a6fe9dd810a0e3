use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::templates;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("invalid form: {0}")]
    Validation(String),
    #[error("record not found")]
    NotFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, page) = match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "errors/404.html"),
            ref other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "errors/500.html")
            }
        };

        match templates::render_error_page(page) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                error!(error = %err, page, "error page failed to render");
                let reason = status.canonical_reason().unwrap_or("Error");
                (status, reason).into_response()
            }
        }
    }
}
