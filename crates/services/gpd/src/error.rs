//! Error types for the gp service.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

/// Errors that can occur while serving reconcile requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Result(#[from] gp_result::error::Error),

    #[error(transparent)]
    Axum(#[from] axum::Error),

    #[error("Invalid WebSocket Message")]
    InvalidWsMessage,
}

impl Error {
    fn status(&self) -> (StatusCode, &'static str) {
        use gp_result::error::Error as ResultError;

        match self {
            Error::Result(ResultError::MalformedInput(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Malformed execution result")
            }
            Error::Result(ResultError::Json(_)) | Error::Json(_) | Error::InvalidWsMessage => {
                (StatusCode::BAD_REQUEST, "Invalid JSON payload")
            }
            Error::Result(ResultError::NoSubmission) => {
                (StatusCode::CONFLICT, "No submission in progress")
            }
            Error::Result(ResultError::SubmissionSettled) => {
                (StatusCode::CONFLICT, "Submission already settled")
            }
            Error::Result(ResultError::IO(_) | ResultError::Deserialization(_))
            | Error::IO(_)
            | Error::Axum(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }

    /// Error object shared by the HTTP and WebSocket surfaces.
    pub fn error_object(&self) -> serde_json::Value {
        let (status, message) = self.status();
        json!({
            "message": message,
            "detail": self.to_string(),
            "status": status.as_u16()
        })
    }

    /// HTTP response body.
    pub fn body(&self) -> serde_json::Value {
        json!({ "error": self.error_object() })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        error!("Creating API error response for error: {:?}", self);
        let (status, _) = self.status();
        (status, Json(self.body())).into_response()
    }
}
