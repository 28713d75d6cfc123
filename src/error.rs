//! Error types and handling infrastructure for stroller-rental.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. The binary layers `anyhow` on top for argument validation.
//!
//! ## Design Principles
//!
//! - **Snapshot-first**: rental failures are recorded in the session snapshot, never
//!   thrown at the presentation layer
//! - **User-friendly messages**: Errors should provide actionable feedback
//! - **Consistency**: Standardized Result type across all modules

use thiserror::Error;

/// The main error type for stroller-rental operations.
#[derive(Error, Debug)]
pub enum RentalError {
    /// A simulated hardware phase failed.
    ///
    /// Displays as the bare message because the text is copied verbatim into
    /// `SessionSnapshot::error_message`.
    #[error("{message}")]
    OperationFailed { message: String },

    /// Terminal I/O errors
    #[error("I/O operation failed: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The state machine was created outside of a tokio runtime
    #[error("No tokio runtime available: {message}")]
    RuntimeUnavailable { message: String },
}

/// Standard Result type for stroller-rental operations.
pub type Result<T> = std::result::Result<T, RentalError>;

impl RentalError {
    /// Create an OperationFailed error for a simulated phase failure
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RentalError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            _ => "IO operation failed",
        };
        Self::Io {
            message: message.to_string(),
            source: err,
        }
    }
}
