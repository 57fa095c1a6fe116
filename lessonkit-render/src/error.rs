//! Error types for `lessonkit` rendering.
//!
//! Rendering itself never fails; these errors only surface through
//! [`crate::math::MathRenderer::try_render`] for linting and are otherwise
//! folded into fallback markup.

use thiserror::Error;

/// Errors produced by a math backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// The markup could not be parsed.
    #[error("math parse error: {0}")]
    Parse(String),

    /// The backend panicked while rendering.
    #[error("math backend panicked: {0}")]
    Panicked(String),
}
