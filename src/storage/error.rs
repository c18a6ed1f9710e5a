//! Storage error kinds
//!
//! Every failure on the submission and quote paths is one of these variants.
//! Handlers convert them into JSON error bodies with [`StorageError::status`].

use hyper::StatusCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Request body is not a JSON object
    #[error("Invalid JSON: {0}")]
    Parse(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    /// Traversal sequence found in a requested file identifier
    #[error("Invalid file path")]
    UnsafePath,

    #[error("Quote file not found")]
    NotFound,

    #[error("Failed to {op} '{}': {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status the error is reported with
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Parse(_)
            | Self::MissingField(_)
            | Self::InvalidField { .. }
            | Self::MissingParameter(_)
            | Self::UnsafePath => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client errors are reported as-is, server errors carry a diagnostic
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
