//! Error types for `lessonkit`
//!
//! Aggregates the lesson errors from `lessonkit-core` with the CLI, site
//! build and preview-server failure modes, and maps each to an exit code.

use thiserror::Error;

pub use lessonkit_core::error::{LessonError, Severity, ValidationIssue};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `lessonkit` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Lesson error (invalid YAML, validation failure)
    pub const LESSON_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Preview server error (bind failed)
    pub const SERVER_ERROR: i32 = 4;

    /// Usage error (invalid arguments, unknown built-in lesson)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `lessonkit` operations.
#[derive(Debug, Error)]
pub enum LessonKitError {
    /// Lesson loading or validation error
    #[error(transparent)]
    Lesson(#[from] LessonError),

    /// Preview server error
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Invalid command-line usage
    #[error("{0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LessonKitError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Lesson(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::LESSON_ERROR,
            Self::Server(_) => ExitCode::SERVER_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Preview server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The bind address could not be parsed
    #[error("invalid bind address \"{input}\": {reason}")]
    InvalidBindAddress {
        /// Address as given on the command line
        input: String,
        /// Parser message
        reason: String,
    },

    /// Binding or serving failed
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics exporter could not be installed
    #[error("metrics exporter failed: {0}")]
    Metrics(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `lessonkit` operations.
pub type Result<T> = std::result::Result<T, LessonKitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::LESSON_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::SERVER_ERROR, 4);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_lesson_error_exit_code() {
        let err: LessonKitError = LessonError::MissingFile {
            path: PathBuf::from("/lessons/median.yaml"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::LESSON_ERROR);
    }

    #[test]
    fn test_server_error_exit_code() {
        let err: LessonKitError = ServerError::InvalidBindAddress {
            input: "nope".to_string(),
            reason: "invalid socket address syntax".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::SERVER_ERROR);
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = LessonKitError::Usage("Unknown lesson 'x'".to_string());
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
        assert_eq!(err.to_string(), "Unknown lesson 'x'");
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: LessonKitError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }
}
