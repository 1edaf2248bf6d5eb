//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `Upstream` → the upstream status (502 if it is not a valid status code)
//! - `Request` → 504 on timeout, 502 otherwise
//! - `Decode` → 502
//! - `BadRequest` → 400
//! - `WorkspaceNotFound`, `NoGroups` → 404
//! - `Directory`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("Student workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("No groups found")]
    NoGroups,

    #[error("Credential directory error: {0}")]
    Directory(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Request(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            AppError::Request(_) | AppError::Decode(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::WorkspaceNotFound(_) | AppError::NoGroups => StatusCode::NOT_FOUND,
            AppError::Directory(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Upstream { message, .. } => message.clone(),
            AppError::WorkspaceNotFound(_) => "Student workspace not found".to_string(),
            AppError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_passed_through() {
        let err = AppError::Upstream {
            status: 403,
            message: "Access denied".to_string(),
        };
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn bogus_upstream_status_becomes_bad_gateway() {
        let err = AppError::Upstream {
            status: 42,
            message: "weird".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_parameters_are_bad_requests() {
        let err = AppError::BadRequest("Workspace and access token are required.".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Workspace and access token are required.");
    }

    #[test]
    fn lookup_misses_are_not_found() {
        assert_eq!(
            AppError::WorkspaceNotFound("ws".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::NoGroups.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Directory("bad json".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
