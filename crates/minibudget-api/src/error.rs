//! Error types for minibudget-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use minibudget_core::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e {
                CoreError::TransactionNotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::ValidationError { .. }
                | CoreError::InvalidQuery { .. }
                | CoreError::ParseError { .. } => StatusCode::BAD_REQUEST,
                CoreError::IoError | CoreError::InvalidFormat { .. } | CoreError::InternalError { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Text for the `error` field of the response body
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Core(CoreError::TransactionNotFound { .. }) => "Not found".to_string(),
            ApiError::Core(CoreError::ValidationError { .. }) => "Missing required fields".to_string(),
            ApiError::Core(e) if self.status().is_server_error() => format!("[{}] {}", e.code(), e),
            other => other.to_string(),
        }
    }

    /// Log with operation context and convert to a response
    pub fn logged(self, operation: &str) -> Self {
        self.logged_with(&ErrorContext::new(operation))
    }

    /// Log with a full error context, e.g. the id a request addressed
    pub fn logged_with(self, context: &ErrorContext) -> Self {
        match &self {
            ApiError::Core(e) => DefaultErrorLogger.log_error(e, context),
            other => log::warn!(
                target: "minibudget::error",
                "{} - Operation: {} - Data: {}",
                other, context.operation, context.data
            ),
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = ApiError::from(CoreError::ValidationError { fields: vec!["date".to_string()] });
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.public_message(), "Missing required fields");

        let absent = ApiError::from(CoreError::TransactionNotFound { id: "x".to_string() });
        assert_eq!(absent.status(), StatusCode::NOT_FOUND);
        assert_eq!(absent.public_message(), "Not found");

        let io = ApiError::from(CoreError::IoError);
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(io.public_message().contains("IO_ERROR"));
    }

    #[test]
    fn test_logged_with_keeps_error() {
        let context = ErrorContext::new("update").with_data("id", serde_json::json!("t1"));
        let err = ApiError::from(CoreError::TransactionNotFound { id: "t1".to_string() }).logged_with(&context);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(context.data["id"], "t1");
    }

    #[test]
    fn test_bad_query_keeps_message() {
        let err = ApiError::from(CoreError::InvalidQuery {
            param: "min".to_string(),
            message: "'x' is not a number".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.public_message().contains("min"));
    }
}
