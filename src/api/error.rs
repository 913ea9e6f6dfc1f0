//! HTTP error mapping.
//!
//! Every handler returns `Result<_, AppError>`. Client errors carry their message;
//! internal failures are logged in full and answered with a generic message.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// An HTTP error response: status plus a JSON `{"error": message}` body.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<Error>,
}

impl AppError {
    /// 400 with `msg`
    #[must_use]
    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    /// 401 with `msg`
    #[must_use]
    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    /// 403 with `msg`
    #[must_use]
    pub fn forbidden(msg: &str) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, msg)
    }

    /// 404 with `msg`
    #[must_use]
    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Status code this error will be answered with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Validation { message } => Self::bad_request(message),
            Error::InvalidAmount { .. } => Self::bad_request(&err.to_string()),
            Error::EmailAlreadyRegistered { .. } => Self::bad_request("Email already registered"),
            Error::UserNotFound { .. } => Self::not_found("User not found"),
            Error::GoalNotFound { .. } => {
                Self::not_found("Goal not found or user does not own goal")
            }
            Error::InvalidCredentials => Self::unauthorized("Invalid email or password"),
            Error::Unauthorized { .. } => Self::unauthorized("Invalid or expired token"),
            Error::Database(_)
            | Error::Config { .. }
            | Error::PasswordHash { .. }
            | Error::Token(_)
            | Error::Io(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(err),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
