//! Validate command handler
//!
//! Loads each file through the full pipeline and reports every issue,
//! continuing past failures so one run covers the whole batch.

use std::path::{Path, PathBuf};

use lessonkit_render::math::{MathRenderer, create_backend};
use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::loader::{LessonLoader, LoaderOptions};
use crate::error::{LessonError, Result, Severity, ValidationIssue};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// File as given on the command line.
    pub file: PathBuf,
    /// Lesson id, when the file parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether the file would be accepted by `build`.
    pub valid: bool,
    /// Blocking issues.
    pub errors: Vec<ValidationIssue>,
    /// Non-blocking issues.
    pub warnings: Vec<ValidationIssue>,
}

/// Validate lesson files without rendering them.
///
/// # Errors
///
/// Returns `ValidationFailed` if any file is rejected.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let loader = LessonLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    })
    .with_math(MathRenderer::new(create_backend(args.math.into())));

    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| validate_file(&loader, path))
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Human => print_human(&reports),
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(LessonError::ValidationFailed { count: failed }.into());
    }
    Ok(())
}

/// Validates one file into a report.
#[must_use]
pub fn validate_file(loader: &LessonLoader, path: &Path) -> FileReport {
    tracing::info!(file = %path.display(), "validating lesson");

    match loader.load(path) {
        Ok(result) => FileReport {
            file: path.to_path_buf(),
            id: Some(result.lesson.id.clone()),
            valid: true,
            errors: Vec::new(),
            warnings: result.warnings,
        },
        Err(LessonError::ValidationError {
            errors, warnings, ..
        }) => FileReport {
            file: path.to_path_buf(),
            id: None,
            valid: false,
            errors,
            warnings,
        },
        Err(err) => FileReport {
            file: path.to_path_buf(),
            id: None,
            valid: false,
            errors: vec![ValidationIssue {
                path: String::new(),
                message: err.to_string(),
                severity: Severity::Error,
            }],
            warnings: Vec::new(),
        },
    }
}

fn print_human(reports: &[FileReport]) {
    for report in reports {
        let status = if report.valid { "ok" } else { "FAILED" };
        println!("{}: {status}", report.file.display());
        for issue in report.errors.iter().chain(&report.warnings) {
            println!("  {issue}");
        }
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    println!(
        "\n{} file(s) checked, {} valid, {failed} failed",
        reports.len(),
        reports.len() - failed
    );
}
