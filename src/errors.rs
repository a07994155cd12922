//! # Application Error Types
//!
//! This module defines the error types used throughout the conversion engine.
//! Unparseable quantities are not errors: they resolve to
//! [`Quantity::NotApplicable`](crate::quantity::Quantity::NotApplicable) and pass through.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// A value of the wrong structural kind was given (e.g. a list where text was required)
    TypeMismatch(String),
    /// Configuration validation errors
    Config(String),
    /// Malformed configuration or recipe documents
    Parse(String),
    /// File system errors
    FileSystem(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::TypeMismatch(msg) => write!(f, "[TYPE_MISMATCH] {}", msg),
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Parse(msg) => write!(f, "[PARSE] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities
pub mod error_logging {
    use tracing::{error, warn};

    /// Log a rejected input whose kind cannot be coerced to text or number
    pub fn log_type_mismatch(operation: &str, expected: &str, found: &str) {
        warn!(
            operation = %operation,
            expected = %expected,
            found = %found,
            "Conversion input has the wrong type"
        );
    }

    /// Log configuration loading errors with the offending path
    pub fn log_config_error(error: &impl std::fmt::Display, operation: &str, path: Option<&str>) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            "Configuration operation failed"
        );
    }
}
