//! Error taxonomy for the core operations.
//!
//! `NotFound` covers records that do not exist *or* belong to another user,
//! so callers never learn whether a foreign record exists. `Contention` is
//! the bounded-wait failure of attempt numbering and is retryable.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug)]
pub enum Error {
    /// Referenced problem/attempt/stats record missing for this user
    NotFound(String),
    /// Per-(user, problem) lock could not be acquired within the allowed wait
    Contention,
    /// Malformed input, rejected before any state mutation
    Validation(String),
    /// Underlying storage failure
    Db(rusqlite::Error),
    /// Connection pool unusable (poisoned lock)
    Unavailable,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound(what) => write!(f, "{} not found", what),
            Error::Contention => write!(f, "Attempt logging contended, retry"),
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Db(e) => write!(f, "Database error: {}", e),
            Error::Unavailable => write!(f, "Database unavailable"),
        }
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Db(e)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Contention => StatusCode::CONFLICT,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Db(e) => {
                tracing::error!("database error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        let detail = match &self {
            Error::Db(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
