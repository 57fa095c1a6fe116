//! Core error types for `lessonkit`
//!
//! Lesson loading and validation error types shared across the workspace.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Lesson Errors
// ============================================================================

/// Lesson loading and validation errors.
///
/// These errors cover all failure modes between reading a lesson file and
/// handing a frozen [`crate::schema::Lesson`] to the renderer.
#[derive(Debug, Error)]
pub enum LessonError {
    /// YAML parsing failed
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the lesson file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Lesson validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the lesson file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
        /// Warnings found alongside the errors
        warnings: Vec<ValidationIssue>,
    },

    /// Referenced lesson file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Two lessons in one library share an id
    #[error("duplicate lesson id '{id}' in {second} (first defined in {first})")]
    DuplicateId {
        /// The shared lesson id
        id: String,
        /// Origin of the first lesson with this id
        first: String,
        /// Origin of the second lesson with this id
        second: String,
    },

    /// One or more lesson files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while linting a lesson.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Dotted path to the problematic field (e.g., "sections[2].blocks[0].correct")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.path.is_empty() {
            write!(f, "{}: {}", prefix, self.message)
        } else {
            write!(f, "{}: {} at {}", prefix, self.message, self.path)
        }
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - the lesson must not be published
    Error,
    /// Warning - suspicious authoring that still renders
    Warning,
}
