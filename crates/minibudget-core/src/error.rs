//! Error types for minibudget-core
//!
//! This module provides error handling for the core transaction logic,
//! including error codes, detailed messages, and suggestions.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Transaction not found
    TransactionNotFound,
    /// Required fields missing
    ValidationError,
    /// Malformed query parameter
    InvalidQuery,
    /// Import document could not be parsed
    ParseError,
    /// IO error
    IoError,
    /// Stored document is not valid
    InvalidFormat,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidQuery => write!(f, "INVALID_QUERY"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for logs and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - the request was rejected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - stored data may be unusable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for minibudget-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Missing required fields: {}", .fields.join(", "))]
    ValidationError { fields: Vec<String> },

    #[error("Invalid query parameter {param}: {message}")]
    InvalidQuery { param: String, message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("IO error occurred")]
    IoError,

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidQuery { .. } => ErrorCode::InvalidQuery,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InvalidQuery { .. } => ErrorSeverity::Warning,
            CoreError::ParseError { .. } => ErrorSeverity::Warning,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Critical,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/transactions endpoint to list all transactions.".to_string()
                );
            }
            CoreError::ValidationError { fields } => {
                details = details.with_detail(serde_json::json!({ "missing": fields }));
                details = details.with_suggestion(
                    "date, category and a numeric amount are required.".to_string()
                );
            }
            CoreError::InvalidQuery { param, .. } => {
                details = details.with_detail(serde_json::json!({ "param": param }));
            }
            CoreError::ParseError { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "CSV imports need a header row; JSON imports must be an array of objects.".to_string()
                );
            }
            CoreError::InvalidFormat { .. } => {
                details = details.with_suggestion(
                    "The data file must contain a JSON array of transactions.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

impl From<minibudget_parser::ParseError> for CoreError {
    fn from(error: minibudget_parser::ParseError) -> Self {
        match error {
            minibudget_parser::ParseError::IoError(_) => CoreError::IoError,
            other => CoreError::ParseError { message: other.to_string() },
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info => log::info!(
                target: "minibudget::error",
                "[{}] {} - Operation: {} - Data: {}",
                error.code(), error, context.operation, context.data
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "minibudget::error",
                "[{}] {} - Operation: {} - Data: {}",
                error.code(), error, context.operation, context.data
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "minibudget::error",
                "{} - Operation: {} - Data: {}",
                error.to_details(), context.operation, context.data
            ),
        }
    }
}

// ==================== Tests ====================
