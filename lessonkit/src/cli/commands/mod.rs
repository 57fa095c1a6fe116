//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler, and
//! holds the setup shared by the rendering commands.

pub mod build;
pub mod completions;
pub mod lessons;
pub mod math;
pub mod render;
pub mod serve;
pub mod validate;
pub mod version;

use std::fmt::Write as _;
use std::sync::Arc;

use lessonkit_core::Lesson;
use lessonkit_render::math::{MathRenderer, create_backend};
use lessonkit_render::{LessonRenderer, PageOptions};
use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, LessonSource, LessonsSubcommand, RenderFlags};
use crate::config::loader::{LessonLoader, LoadResult, LoaderOptions, check_unique_ids};
use crate::error::{LessonKitError, Result};
use crate::library;
use crate::site::DEFAULT_STYLESHEET_HREF;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<()> {
    match cli.command {
        Commands::Lessons(cmd) => match cmd.subcommand {
            LessonsSubcommand::List(args) => lessons::list(&args),
            LessonsSubcommand::Show(args) => lessons::show(&args),
        },
        Commands::Validate(args) => validate::run(&args),
        Commands::Render(args) => render::run(&args),
        Commands::Build(args) => build::run(&args),
        Commands::Serve(args) => serve::run(&args, cancel).await,
        Commands::Math(args) => {
            math::run(&args);
            Ok(())
        }
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}

// ============================================================================
// Shared Setup
// ============================================================================

/// Builds the math renderer selected by the shared flags.
pub(crate) fn math_renderer(flags: &RenderFlags) -> MathRenderer {
    MathRenderer::new(create_backend(flags.math.into())).with_strictness(flags.math_fallback.into())
}

/// Builds the page renderer selected by the shared flags.
///
/// Without `--stylesheet` pages link to the bundled stylesheet.
pub(crate) fn lesson_renderer(flags: &RenderFlags, site_name: Option<String>) -> LessonRenderer {
    let stylesheet = flags
        .stylesheet
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET_HREF.to_string());
    LessonRenderer::new(
        math_renderer(flags),
        PageOptions {
            stylesheet: Some(stylesheet),
            site_name,
            lang: None,
        },
    )
}

/// Loads every lesson named by a `--lessons`/`--builtin` source.
///
/// Directory lessons come first, then built-ins; ids must be unique across
/// both.
///
/// # Errors
///
/// Returns a usage error if no source is given, or the first load error.
pub(crate) fn load_sources(source: &LessonSource, math: MathRenderer) -> Result<Vec<Arc<Lesson>>> {
    if source.lessons.is_none() && !source.builtin {
        return Err(LessonKitError::Usage(
            "no lessons to render: pass --lessons <DIR> and/or --builtin".to_string(),
        ));
    }

    let loader = LessonLoader::new(LoaderOptions {
        strict: source.strict,
        ..LoaderOptions::default()
    })
    .with_math(math);

    let mut loaded = Vec::new();
    if let Some(dir) = &source.lessons {
        tracing::info!(dir = %dir.display(), "loading lessons");
        loaded.extend(loader.load_dir(dir)?);
    }
    if source.builtin {
        loaded.extend(library::load_all(&loader)?);
    }
    check_unique_ids(&loaded)?;

    log_warnings(&loaded);
    Ok(loaded.into_iter().map(|l| l.lesson).collect())
}

/// Logs every validation warning of the loaded lessons.
pub(crate) fn log_warnings(loaded: &[LoadResult]) {
    for result in loaded {
        for warning in &result.warnings {
            tracing::warn!(origin = %result.origin, path = %warning.path, "{}", warning.message);
        }
    }
}

/// Builds the usage error for an unknown built-in lesson name.
pub(crate) fn unknown_lesson(name: &str) -> LessonKitError {
    let mut message = format!("Unknown lesson '{name}'");

    if let Some(suggestion) = library::suggest_lesson(name) {
        let _ = write!(message, "\n\nDid you mean '{suggestion}'?");
    }

    message.push_str("\n\nAvailable lessons:");
    for name in library::list_lesson_names() {
        if let Some(l) = library::find_lesson(name) {
            let _ = write!(message, "\n  {:<28}{}", l.name, l.description);
        }
    }

    message.push_str("\n\nUse 'lessonkit lessons list' for full details.");
    LessonKitError::Usage(message)
}
