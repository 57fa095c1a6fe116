//! Built-in lesson library
//!
//! Curated lessons embedded in the binary at compile time, so
//! `lessonkit build --builtin` works with zero configuration.

use std::fmt;
use std::sync::LazyLock;

use crate::config::loader::{LessonLoader, LoadResult};
use crate::error::LessonError;

// ============================================================================
// Types
// ============================================================================

/// A built-in lesson embedded in the binary.
pub struct BuiltinLesson {
    /// Unique identifier, equal to the lesson id (kebab-case).
    pub name: &'static str,

    /// Short human-readable description.
    pub description: &'static str,

    /// Exam section the lesson belongs to.
    pub category: LessonCategory,

    /// Tags for filtering.
    pub tags: &'static [&'static str],

    /// Raw YAML content (embedded at compile time).
    pub yaml: &'static str,
}

/// Exam section a lesson belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LessonCategory {
    /// Quantitative reasoning.
    Quant,
    /// Verbal reasoning.
    Verbal,
    /// Data insights.
    #[value(name = "data-insights")]
    DataInsights,
}

impl LessonCategory {
    /// Returns the human-readable title-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quant => "Quant",
            Self::Verbal => "Verbal",
            Self::DataInsights => "Data Insights",
        }
    }

    /// Returns all category variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Quant, Self::Verbal, Self::DataInsights]
    }
}

impl fmt::Display for LessonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quant => write!(f, "quant"),
            Self::Verbal => write!(f, "verbal"),
            Self::DataInsights => write!(f, "data-insights"),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

static BUILTIN_LESSONS: LazyLock<Vec<BuiltinLesson>> = LazyLock::new(|| {
    vec![
        BuiltinLesson {
            name: "roots-exponents-intro",
            description: "Core identities for powers and radicals",
            category: LessonCategory::Quant,
            tags: &["exponents", "roots", "algebra"],
            yaml: include_str!("../../lessons/roots-exponents-intro.yaml"),
        },
        BuiltinLesson {
            name: "ratios-part-to-whole",
            description: "Part-to-part and part-to-whole ratios with a multiplier",
            category: LessonCategory::Quant,
            tags: &["ratios", "word-problems"],
            yaml: include_str!("../../lessons/ratios-part-to-whole.yaml"),
        },
        BuiltinLesson {
            name: "probability-sample-space",
            description: "Sample spaces and the sum-to-one rule",
            category: LessonCategory::Quant,
            tags: &["probability", "sample-space"],
            yaml: include_str!("../../lessons/probability-sample-space.yaml"),
        },
        BuiltinLesson {
            name: "statistics-nonzero-sd",
            description: "When a standard deviation must be positive",
            category: LessonCategory::Quant,
            tags: &["statistics", "standard-deviation", "data-sufficiency"],
            yaml: include_str!("../../lessons/statistics-nonzero-sd.yaml"),
        },
        BuiltinLesson {
            name: "cr-evaluate-the-argument",
            description: "Critical reasoning: evaluate the argument",
            category: LessonCategory::Verbal,
            tags: &["critical-reasoning", "verbal", "evaluate"],
            yaml: include_str!("../../lessons/cr-evaluate-the-argument.yaml"),
        },
        BuiltinLesson {
            name: "di-table-analysis",
            description: "Reading and sorting Table Analysis data",
            category: LessonCategory::DataInsights,
            tags: &["data-insights", "table-analysis"],
            yaml: include_str!("../../lessons/di-table-analysis.yaml"),
        },
    ]
});

// ============================================================================
// Public API
// ============================================================================

/// Look up a lesson by exact name.
#[must_use]
pub fn find_lesson(name: &str) -> Option<&'static BuiltinLesson> {
    BUILTIN_LESSONS.iter().find(|l| l.name == name)
}

/// List all lessons, optionally filtered by category and/or tag.
#[must_use]
pub fn list_lessons(
    category: Option<LessonCategory>,
    tag: Option<&str>,
) -> Vec<&'static BuiltinLesson> {
    BUILTIN_LESSONS
        .iter()
        .filter(|l| category.is_none_or(|c| l.category == c))
        .filter(|l| tag.is_none_or(|t| l.tags.contains(&t)))
        .collect()
}

/// Suggest a similar lesson name for typo correction.
///
/// Returns the closest match if its Jaro-Winkler similarity is at least 0.8.
#[must_use]
pub fn suggest_lesson(input: &str) -> Option<String> {
    BUILTIN_LESSONS
        .iter()
        .map(|l| (l.name, strsim::jaro_winkler(input, l.name)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name.to_string())
}

/// Returns all lesson names in registry order.
#[must_use]
pub fn list_lesson_names() -> Vec<&'static str> {
    BUILTIN_LESSONS.iter().map(|l| l.name).collect()
}

/// Parses and validates a built-in lesson.
///
/// # Errors
///
/// Returns `InvalidValue` for an unknown name, or the loader error if the
/// embedded YAML does not load.
pub fn load_builtin(name: &str, loader: &LessonLoader) -> Result<LoadResult, LessonError> {
    let lesson = find_lesson(name).ok_or_else(|| LessonError::InvalidValue {
        field: "lesson".to_string(),
        value: name.to_string(),
        expected: format!("one of: {}", list_lesson_names().join(", ")),
    })?;
    loader.load_from_str(lesson.yaml, &format!("builtin:{}", lesson.name))
}

/// Parses and validates every built-in lesson, in registry order.
///
/// # Errors
///
/// Returns the first loader error.
pub fn load_all(loader: &LessonLoader) -> Result<Vec<LoadResult>, LessonError> {
    BUILTIN_LESSONS
        .iter()
        .map(|l| load_builtin(l.name, loader))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
