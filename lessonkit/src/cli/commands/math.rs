//! Math command handler
//!
//! Renders a single expression, which is handy when authoring lessons.

use lessonkit_render::math::{MathMode, MathRenderer, create_backend};

use crate::cli::args::MathArgs;

/// Render `args.expr` and print the markup to stdout.
///
/// Malformed input prints the plain-text fallback and logs the backend
/// error; it is never a command failure.
pub fn run(args: &MathArgs) {
    println!("{}", render(args));
}

fn render(args: &MathArgs) -> String {
    let math = MathRenderer::new(create_backend(args.math.into()));
    math.render(&args.expr, MathMode::from_display(args.display))
}
