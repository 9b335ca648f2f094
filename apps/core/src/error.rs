use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The predictive model could not be loaded.
    #[error("Model unavailable: {0}")]
    Model(#[from] ModelError),

    /// Represents errors returned by the music catalog.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(String),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., missing environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Reasons a predictive model artifact cannot be used.
///
/// Every variant is recovered locally by falling back to the rule-based
/// interpreter; none of them fails a playlist request.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("model artifact not found at {}", .0.display())]
    Missing(PathBuf),

    #[error("model artifact is malformed: {0}")]
    Malformed(String),

    #[error("model artifact is inconsistent: {0}")]
    Inconsistent(String),
}

/// Errors raised by a [`CatalogSearch`](crate::catalog::CatalogSearch) backend.
///
/// "Not found" is not an error: lookups return `Ok(None)` or an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Network or service hiccup limited to a single lookup.
    #[error("transient catalog failure: {0}")]
    Transient(String),

    /// Credentials or connectivity are missing altogether.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CatalogError::Unavailable(_))
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Io(io::Error::other(format!("HTTP error: {}", err)))
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for AppError {
    fn from(err: tokio::sync::oneshot::error::RecvError) -> Self {
        AppError::Actor(format!("Actor dropped the response channel: {}", err))
    }
}
