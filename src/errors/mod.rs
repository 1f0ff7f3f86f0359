use std::io;
use std::path::PathBuf;

use axum::{http::{header, StatusCode}, response::{IntoResponse, Response}};
use thiserror::Error;

use crate::config::ConfigError;

/// Failures raised by the page store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No catalogue record carries the requested id.
    #[error("page not found: {id}")]
    NotFound { id: String },

    /// A catalogue record exists but its body file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// A body file or the catalogue could not be written.
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Custom error types for the wiki application
#[derive(Debug, Error)]
pub enum WikiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Please provide a valid url: /{verb}/<page> (page ids are alphanumeric)")]
    Validation { verb: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("path {0:?} reached page id extraction without a known prefix")]
    UnroutablePath(String),

    #[error("Not found")]
    NotFound,

    #[error("Invalid path")]
    InvalidPath,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        match self {
            WikiError::Store(StoreError::NotFound { .. }) | WikiError::NotFound => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            WikiError::Validation { .. } | WikiError::InvalidPath => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            WikiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"quire\"")],
                "Authentication required",
            )
                .into_response(),
            other => {
                log::error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
