//! `lessonkit` Render - math, prose and lesson page rendering
//!
//! Turns lesson data into static HTML. Every entry point returns a
//! `String`: malformed math degrades to plain text instead of failing,
//! and rendering the same lesson twice yields identical output.

pub mod error;
pub mod escape;
pub mod index;
pub mod math;
pub mod page;
pub mod primitives;
pub mod prose;

pub use error::MathError;
pub use index::render_index;
pub use math::{MathBackend, MathBackendKind, MathMode, MathRenderer, Strictness};
pub use page::{LessonRenderer, PageOptions};
