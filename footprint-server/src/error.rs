//! API error type
//!
//! Every failure leaves the server as `{ "success": false, "message": ... }`.
//! Store failures carry a generic message for the caller; the underlying
//! cause is only written to the log.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Body message for an unknown couple code
pub const NOT_FOUND_MESSAGE: &str = "커플 코드를 찾을 수 없습니다.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown couple code (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or invalid request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Backing store or unexpected failure (500)
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: footprint_common::Error,
    },
}

impl ApiError {
    /// Classify a common error, using `message` for anything that is not the
    /// caller's fault
    pub fn from_common(err: footprint_common::Error, message: &'static str) -> Self {
        use footprint_common::Error;

        match err {
            Error::NotFound(what) => {
                debug!("Not found: {}", what);
                ApiError::NotFound(NOT_FOUND_MESSAGE.to_string())
            }
            Error::InvalidInput(detail) => ApiError::BadRequest(detail),
            other => ApiError::Store {
                message,
                source: other,
            },
        }
    }

    /// `map_err` adapter: `.map_err(ApiError::store("Failed to ..."))`
    pub fn store(message: &'static str) -> impl FnOnce(footprint_common::Error) -> Self {
        move |err| Self::from_common(err, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
