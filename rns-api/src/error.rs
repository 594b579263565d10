//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use rns_core::error::RnsError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body of this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code.clone(),
            message: self.message.clone(),
        }
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Machine-readable code plus message.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: self.body() };
        (self.status, Json(body)).into_response()
    }
}

impl From<&RnsError> for ApiError {
    fn from(err: &RnsError) -> Self {
        match err {
            RnsError::HttpError(_)
            | RnsError::RpcError(_)
            | RnsError::ExecutionReverted(_)
            | RnsError::GraphqlError(_)
            | RnsError::ConnectionTimeout(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, err.to_string(), "UPSTREAM_ERROR")
            }
            RnsError::SessionMissing(_) => {
                ApiError::new(StatusCode::UNAUTHORIZED, err.to_string(), "SESSION_MISSING")
            }
            _ if err.is_config_absent() => {
                ApiError::new(StatusCode::NOT_FOUND, err.to_string(), "NOT_CONFIGURED")
            }
            _ if err.is_validation_error() => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), "VALIDATION_ERROR")
            }
            _ => {
                tracing::error!(error = %err, "Internal error");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl From<RnsError> for ApiError {
    fn from(err: RnsError) -> Self {
        ApiError::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_failures_are_bad_gateway() {
        let err = ApiError::from(RnsError::RpcError("header not found".into()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::from(RnsError::ExecutionReverted("".into()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_session_missing_is_unauthorized() {
        let err = ApiError::from(RnsError::SessionMissing("none".into()));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = ApiError::from(RnsError::InternalError("lock poisoned".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().message, "An internal error occurred");
    }
}
