//! Lesson loader
//!
//! Loading pipeline for a lesson file:
//! 1. Size limit check
//! 2. UTF-8 BOM stripping
//! 3. YAML parsing into typed [`Lesson`]
//! 4. Validation
//! 5. Freeze with `Arc`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lessonkit_core::Lesson;
use lessonkit_render::math::MathRenderer;

use crate::config::validation::Validator;
use crate::error::{LessonError, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Options for the lesson loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for lesson size.
    pub limits: LessonLimits,

    /// Treat validation warnings as errors.
    pub strict: bool,
}

/// Limits for lesson size to keep authoring mistakes from producing
/// unbounded pages.
#[derive(Debug, Clone)]
pub struct LessonLimits {
    /// Maximum lesson file size in bytes.
    pub max_lesson_size: usize,

    /// Maximum number of sections.
    pub max_sections: usize,

    /// Maximum number of blocks, counting nested ones.
    pub max_blocks: usize,

    /// Maximum number of options per multiple-choice example.
    pub max_options: usize,
}

impl Default for LessonLimits {
    fn default() -> Self {
        Self {
            max_lesson_size: env_or("LESSONKIT_MAX_LESSON_SIZE", 1024 * 1024),
            max_sections: env_or("LESSONKIT_MAX_SECTIONS", 200),
            max_blocks: env_or("LESSONKIT_MAX_BLOCKS", 2000),
            max_options: env_or("LESSONKIT_MAX_OPTIONS", 10),
        }
    }
}

/// Result of loading a lesson.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// The loaded and validated lesson.
    pub lesson: Arc<Lesson>,

    /// Where the lesson came from (file path or built-in name).
    pub origin: String,

    /// Validation warnings.
    pub warnings: Vec<ValidationIssue>,
}

/// Lesson loader.
#[derive(Debug, Default)]
pub struct LessonLoader {
    options: LoaderOptions,
    math: MathRenderer,
}

impl LessonLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            math: MathRenderer::default(),
        }
    }

    /// Creates a loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Uses `math` when checking that expressions render.
    #[must_use]
    pub fn with_math(mut self, math: MathRenderer) -> Self {
        self.math = math;
        self
    }

    /// The loader options.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads a lesson file and returns the frozen lesson.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, LessonError> {
        let metadata = std::fs::metadata(path).map_err(|_| LessonError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let max = self.options.limits.max_lesson_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max {
            return Err(size_error(file_size, max));
        }

        let content = std::fs::read_to_string(path).map_err(|e| LessonError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: e.to_string(),
        })?;

        self.load_from_str(&content, &path.display().to_string())
    }

    /// Loads a lesson from YAML text. `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the text exceeds the size limit, fails to parse,
    /// or fails validation.
    pub fn load_from_str(&self, content: &str, origin: &str) -> Result<LoadResult, LessonError> {
        let max = self.options.limits.max_lesson_size;
        if content.len() > max {
            return Err(size_error(content.len(), max));
        }

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if is_blank_document(content) {
            return Err(LessonError::ParseError {
                path: PathBuf::from(origin),
                line: None,
                message: "Lesson file is empty".to_string(),
            });
        }

        let lesson: Lesson =
            serde_yaml::from_str(content).map_err(|e| LessonError::ParseError {
                path: PathBuf::from(origin),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        let mut validator = Validator::with_math(self.math.clone());
        let mut result = validator.validate(&lesson, &self.options.limits);
        if self.options.strict {
            result = result.into_strict();
        }

        if result.has_errors() {
            return Err(LessonError::ValidationError {
                path: origin.to_string(),
                errors: result.errors,
                warnings: result.warnings,
            });
        }

        for warning in &result.warnings {
            tracing::debug!(origin, %warning, "lesson warning");
        }

        Ok(LoadResult {
            lesson: Arc::new(lesson),
            origin: origin.to_string(),
            warnings: result.warnings,
        })
    }

    /// Loads every `*.yaml` / `*.yml` file under `dir`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns the first load failure, `MissingFile` if `dir` is not a
    /// directory, or `DuplicateId` if two files share a lesson id.
    pub fn load_dir(&self, dir: &Path) -> Result<Vec<LoadResult>, LessonError> {
        if !dir.is_dir() {
            return Err(LessonError::MissingFile {
                path: dir.to_path_buf(),
            });
        }

        let files = lesson_files(dir)?;
        tracing::info!(dir = %dir.display(), count = files.len(), "loading lessons");

        let mut loaded = Vec::with_capacity(files.len());
        for file in &files {
            loaded.push(self.load(file)?);
        }
        check_unique_ids(&loaded)?;
        Ok(loaded)
    }
}

/// Lists lesson files under `dir` recursively, sorted by path.
///
/// # Errors
///
/// Returns `InvalidValue` if the directory cannot be traversed.
pub fn lesson_files(dir: &Path) -> Result<Vec<PathBuf>, LessonError> {
    let base = glob::Pattern::escape(&dir.display().to_string());
    let mut files = Vec::new();

    for extension in ["yaml", "yml"] {
        let pattern = format!("{base}/**/*.{extension}");
        let entries = glob::glob(&pattern).map_err(|e| LessonError::InvalidValue {
            field: "lessons".to_string(),
            value: pattern.clone(),
            expected: format!("a valid directory pattern: {e}"),
        })?;
        for entry in entries {
            let path = entry.map_err(|e| LessonError::InvalidValue {
                field: "lessons".to_string(),
                value: e.path().display().to_string(),
                expected: format!("a readable path: {}", e.error()),
            })?;
            if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Rejects two lessons with the same id.
///
/// # Errors
///
/// Returns `DuplicateId` naming both origins.
pub fn check_unique_ids(loaded: &[LoadResult]) -> Result<(), LessonError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for result in loaded {
        if let Some(first) = seen.insert(&result.lesson.id, &result.origin) {
            return Err(LessonError::DuplicateId {
                id: result.lesson.id.clone(),
                first: first.to_string(),
                second: result.origin.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn size_error(size: usize, max: usize) -> LessonError {
    LessonError::InvalidValue {
        field: "file_size".to_string(),
        value: format!("{size} bytes"),
        expected: format!("at most {max} bytes"),
    }
}

/// A document with nothing but whitespace and comments.
fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonkit_render::math::{MathBackendKind, create_backend};
    use std::io::Write;

    const VALID: &str = r#"
id: ratios-intro
title: "Ratios: the basics"
description: "Part-to-part and part-to-whole ratios."
sections:
  - heading: Example
    blocks:
      - type: multiple_choice
        number: 1
        prompt: "The ratio of boys to girls is 2:3 in a class of 30. How many girls?"
        options: ["12", "18", "20"]
        correct: "18"
        solution: "$\\frac{3}{5}\\cdot 30 = 18$."
"#;

    fn loader() -> LessonLoader {
        LessonLoader::with_defaults().with_math(MathRenderer::new(create_backend(MathBackendKind::Plain)))
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_lesson_limits_default() {
        let limits = LessonLimits::default();
        assert!(limits.max_lesson_size > 0);
        assert!(limits.max_sections > 0);
        assert!(limits.max_blocks > 0);
        assert!(limits.max_options > 0);
    }

    #[test]
    fn test_load_from_str_valid() {
        let result = loader().load_from_str(VALID, "ratios.yaml").unwrap();
        assert_eq!(result.lesson.id, "ratios-intro");
        assert_eq!(result.origin, "ratios.yaml");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_load_strips_bom() {
        let content = format!("\u{feff}{VALID}");
        assert!(loader().load_from_str(&content, "bom.yaml").is_ok());
    }

    #[test]
    fn test_load_empty_document() {
        let err = loader().load_from_str("# nothing here\n\n", "empty.yaml").unwrap_err();
        assert!(err.to_string().contains("Lesson file is empty"), "{err}");
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = loader()
            .load_from_str("id: x\ntitle: [unclosed\n", "bad.yaml")
            .unwrap_err();
        match err {
            LessonError::ParseError { path, line, .. } => {
                assert_eq!(path, PathBuf::from("bad.yaml"));
                assert!(line.is_some());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_block_type_is_parse_error() {
        let yaml = "id: a\ntitle: A\ndescription: D\nsections:\n  - blocks:\n      - type: video\n        url: x\n";
        let err = loader().load_from_str(yaml, "video.yaml").unwrap_err();
        assert!(matches!(err, LessonError::ParseError { .. }));
    }

    #[test]
    fn test_validation_error_is_reported() {
        let yaml = VALID.replace("correct: \"18\"", "correct: \"19\"");
        let err = loader().load_from_str(&yaml, "wrong.yaml").unwrap_err();
        match err {
            LessonError::ValidationError { path, errors, warnings } => {
                assert_eq!(path, "wrong.yaml");
                assert!(errors.iter().any(|e| e.path.ends_with(".correct")));
                assert!(warnings.is_empty());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_carries_warnings() {
        let yaml = VALID
            .replace("correct: \"18\"", "correct: \"19\"")
            .replace("        solution: \"$\\\\frac{3}{5}\\\\cdot 30 = 18$.\"\n", "");
        match loader().load_from_str(&yaml, "unsolved.yaml").unwrap_err() {
            LessonError::ValidationError { errors, warnings, .. } => {
                assert_eq!(errors.len(), 1, "{errors:?}");
                assert_eq!(warnings.len(), 1, "{warnings:?}");
                assert!(warnings[0].path.ends_with(".solution"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_rejects_warnings() {
        let yaml = VALID.replace(
            "        solution: \"$\\\\frac{3}{5}\\\\cdot 30 = 18$.\"\n",
            "",
        );
        assert!(!loader().load_from_str(&yaml, "lenient.yaml").unwrap().warnings.is_empty());

        let strict = LessonLoader::new(LoaderOptions {
            limits: LessonLimits::default(),
            strict: true,
        })
        .with_math(MathRenderer::new(create_backend(MathBackendKind::Plain)));
        assert!(matches!(
            strict.load_from_str(&yaml, "strict.yaml"),
            Err(LessonError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_size_limit() {
        let loader = LessonLoader::new(LoaderOptions {
            limits: LessonLimits {
                max_lesson_size: 16,
                ..LessonLimits::default()
            },
            strict: false,
        });
        let err = loader.load_from_str(VALID, "big.yaml").unwrap_err();
        assert!(matches!(err, LessonError::InvalidValue { ref field, .. } if field == "file_size"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = loader().load(Path::new("/nonexistent/lesson.yaml")).unwrap_err();
        assert!(matches!(err, LessonError::MissingFile { .. }));
    }

    #[test]
    fn test_load_dir_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.yaml", &VALID.replace("ratios-intro", "b-lesson"));
        write_file(dir.path(), "a.yml", &VALID.replace("ratios-intro", "a-lesson"));
        write_file(dir.path(), "nested/c.yaml", &VALID.replace("ratios-intro", "c-lesson"));
        write_file(dir.path(), "notes.txt", "ignored");

        let loaded = loader().load_dir(dir.path()).unwrap();
        let ids: Vec<_> = loaded.iter().map(|r| r.lesson.id.as_str()).collect();
        assert_eq!(ids, vec!["a-lesson", "b-lesson", "c-lesson"]);
    }

    #[test]
    fn test_load_dir_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "one.yaml", VALID);
        write_file(dir.path(), "two.yaml", VALID);

        let err = loader().load_dir(dir.path()).unwrap_err();
        match err {
            LessonError::DuplicateId { id, first, second } => {
                assert_eq!(id, "ratios-intro");
                assert!(first.ends_with("one.yaml"));
                assert!(second.ends_with("two.yaml"));
            }
            other => panic!("expected duplicate id, got {other:?}"),
        }
    }

    #[test]
    fn test_load_dir_missing() {
        let err = loader().load_dir(Path::new("/nonexistent/lessons")).unwrap_err();
        assert!(matches!(err, LessonError::MissingFile { .. }));
    }
}
