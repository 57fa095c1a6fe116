//! Lesson loading and validation
//!
//! Reads lesson YAML from disk or memory, lints it, and freezes it for the
//! renderer.

pub mod loader;
pub mod validation;

pub use loader::{LessonLimits, LessonLoader, LoadResult, LoaderOptions};
pub use validation::{ValidationResult, Validator};
