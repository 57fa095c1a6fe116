//! Render command handler

use std::path::Path;

use crate::cli::args::RenderArgs;
use crate::cli::commands::{lesson_renderer, log_warnings, math_renderer, unknown_lesson};
use crate::config::loader::{LessonLoader, LoadResult, LoaderOptions};
use crate::error::{LessonKitError, Result};
use crate::library;

/// Render one lesson to stdout or `--output`.
///
/// # Errors
///
/// Returns a usage error for an unknown built-in, the loader error for an
/// invalid lesson, or an I/O error if the output cannot be written.
pub fn run(args: &RenderArgs) -> Result<()> {
    let loader = LessonLoader::new(LoaderOptions::default()).with_math(math_renderer(&args.render));
    let loaded = load(args, &loader)?;
    log_warnings(std::slice::from_ref(&loaded));

    let renderer = lesson_renderer(&args.render, None);
    let html = if args.fragment {
        renderer.render_body(&loaded.lesson)
    } else {
        renderer.render_document(&loaded.lesson)
    };

    match &args.output {
        Some(path) => {
            write_output(path, &html)?;
            tracing::info!(lesson = %loaded.lesson.id, output = %path.display(), "lesson rendered");
        }
        None => print!("{html}"),
    }
    Ok(())
}

fn load(args: &RenderArgs, loader: &LessonLoader) -> Result<LoadResult> {
    if let Some(name) = &args.builtin {
        if library::find_lesson(name).is_none() {
            return Err(unknown_lesson(name));
        }
        return Ok(library::load_builtin(name, loader)?);
    }
    match &args.file {
        Some(path) => Ok(loader.load(path)?),
        None => Err(LessonKitError::Usage(
            "either <FILE> or --builtin is required".to_string(),
        )),
    }
}

fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{MathBackendArg, MathFallbackArg, RenderFlags};

    fn args(builtin: &str, output: &Path, fragment: bool) -> RenderArgs {
        RenderArgs {
            file: None,
            builtin: Some(builtin.to_string()),
            output: Some(output.to_path_buf()),
            fragment,
            render: RenderFlags {
                stylesheet: None,
                math: MathBackendArg::Plain,
                math_fallback: MathFallbackArg::Ignore,
            },
        }
    }

    #[test]
    fn test_render_builtin_document() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/ratios.html");
        run(&args("ratios-part-to-whole", &out, false)).unwrap();

        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
        assert!(html.contains("/assets/lesson.css"));
    }

    #[test]
    fn test_render_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frag.html");
        run(&args("ratios-part-to-whole", &out, true)).unwrap();

        let html = std::fs::read_to_string(out).unwrap();
        assert!(!html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<main"));
    }

    #[test]
    fn test_unknown_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args("ratio", &dir.path().join("x.html"), false)).unwrap_err();
        assert!(matches!(err, LessonKitError::Usage(_)));
    }
}
