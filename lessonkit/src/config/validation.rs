//! Lesson validation
//!
//! Lints a deserialized [`Lesson`] before it is published. Structural
//! problems that would render a broken or misleading page are errors;
//! suspicious authoring that still renders is a warning.
//!
//! Validation collects ALL issues (doesn't stop at the first) so authors
//! can fix a lesson in one pass.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use lessonkit_core::schema::{
    Block, ExampleCard, Image, Lesson, MultipleChoiceExample, Section, StatementSet, Table,
    TwoPartExample,
};
use lessonkit_core::{DsAnswer, ExampleRef, MathExpression};
use lessonkit_render::math::{MathMode, MathRenderer};
use lessonkit_render::page::section_anchor;
use lessonkit_render::prose::math_sources;
use regex::Regex;

use crate::config::loader::LessonLimits;
use crate::error::{Severity, ValidationIssue};

/// Meta descriptions longer than this are truncated by search engines.
pub const MAX_DESCRIPTION_CHARS: usize = 160;

static LESSON_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

// ============================================================================
// Public API
// ============================================================================

/// Result of lesson validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent publishing).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Promotes every warning to an error.
    #[must_use]
    pub fn into_strict(mut self) -> Self {
        self.errors.extend(self.warnings.drain(..).map(|mut issue| {
            issue.severity = Severity::Error;
            issue
        }));
        self
    }
}

/// Lesson validator.
#[derive(Debug, Default)]
pub struct Validator {
    math: MathRenderer,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
    example_numbers: HashMap<u32, String>,
}

impl Validator {
    /// Creates a validator using the default math backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that checks math against `math`.
    #[must_use]
    pub fn with_math(math: MathRenderer) -> Self {
        Self {
            math,
            ..Self::default()
        }
    }

    /// Validates a lesson and returns every issue found.
    pub fn validate(&mut self, lesson: &Lesson, limits: &LessonLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();
        self.example_numbers.clear();

        self.validate_metadata(lesson);
        self.validate_sections(lesson);
        self.validate_limits(lesson, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    fn validate_metadata(&mut self, lesson: &Lesson) {
        if lesson.id.trim().is_empty() {
            self.add_error("id", "Lesson id is required and cannot be empty");
        } else if !LESSON_ID_RE.is_match(&lesson.id) {
            self.add_error(
                "id",
                &format!(
                    "Lesson id '{}' must be kebab-case (lowercase letters, digits and single hyphens)",
                    lesson.id
                ),
            );
        }

        if lesson.title.trim().is_empty() {
            self.add_error("title", "Lesson title is required and cannot be empty");
        }

        if lesson.description.trim().is_empty() {
            self.add_error(
                "description",
                "Lesson description is required and cannot be empty",
            );
        } else {
            let len = lesson.description.chars().count();
            if len > MAX_DESCRIPTION_CHARS {
                self.add_warning(
                    "description",
                    &format!(
                        "Description is {len} characters; search results show about {MAX_DESCRIPTION_CHARS}"
                    ),
                );
            }
        }
    }

    // ========================================================================
    // Sections and Blocks
    // ========================================================================

    fn validate_sections(&mut self, lesson: &Lesson) {
        let mut anchors: HashMap<String, usize> = HashMap::new();
        // Example sections render with these ids.
        let example_ids: HashSet<String> = lesson
            .examples()
            .iter()
            .map(|e| format!("example-{}", e.number()))
            .collect();

        for (i, section) in lesson.sections.iter().enumerate() {
            let path = format!("sections[{i}]");

            if section.id.is_some() || section.heading.is_some() {
                let anchor = section_anchor(section, i);
                if example_ids.contains(&anchor) {
                    self.add_error(
                        &format!("{path}.id"),
                        &format!("Section anchor '{anchor}' is also the id of a worked example"),
                    );
                } else if let Some(first) = anchors.insert(anchor.clone(), i) {
                    self.add_error(
                        &format!("{path}.id"),
                        &format!("Duplicate section anchor '{anchor}' (first used by sections[{first}])"),
                    );
                }
            }

            if section.blocks.is_empty() {
                self.add_warning(&format!("{path}.blocks"), "Section has no blocks");
            }

            self.validate_blocks(&section.blocks, &format!("{path}.blocks"));
        }
    }

    fn validate_blocks(&mut self, blocks: &[Block], base_path: &str) {
        for (j, block) in blocks.iter().enumerate() {
            let path = format!("{base_path}[{j}]");
            match block {
                Block::Paragraph { text } => self.validate_prose(text, &format!("{path}.text")),
                Block::Math(expr) => self.validate_math_expression(expr, &path),
                Block::Callout(callout) => {
                    if callout.blocks.is_empty() {
                        self.add_warning(&format!("{path}.blocks"), "Callout has no content");
                    }
                    self.validate_blocks(&callout.blocks, &format!("{path}.blocks"));
                }
                Block::List(list) => {
                    if list.items.is_empty() {
                        self.add_warning(&format!("{path}.items"), "List has no items");
                    }
                    for (k, item) in list.items.iter().enumerate() {
                        self.validate_prose(item, &format!("{path}.items[{k}]"));
                    }
                }
                Block::Table(table) => self.validate_table(table, &path),
                Block::Image(image) => self.validate_image(image, &path),
                Block::Quote(quote) => {
                    if quote.text.trim().is_empty() {
                        self.add_error(&format!("{path}.text"), "Quote text cannot be empty");
                    }
                    self.validate_prose(&quote.text, &format!("{path}.text"));
                }
                Block::MultipleChoice(example) => self.validate_multiple_choice(example, &path),
                Block::ExampleCard(card) => self.validate_example_card(card, &path),
                Block::StatementSet(set) => self.validate_statement_set(set, &path),
                Block::TwoPart(example) => self.validate_two_part(example, &path),
            }
        }
    }

    fn validate_table(&mut self, table: &Table, path: &str) {
        if table.header.is_empty() {
            self.add_error(&format!("{path}.header"), "Table header cannot be empty");
        }
        for (c, cell) in table.header.iter().enumerate() {
            self.validate_prose(cell, &format!("{path}.header[{c}]"));
        }
        for (r, row) in table.rows.iter().enumerate() {
            if row.len() != table.header.len() {
                self.add_error(
                    &format!("{path}.rows[{r}]"),
                    &format!(
                        "Row has {} cells but the header has {} columns",
                        row.len(),
                        table.header.len()
                    ),
                );
            }
            for (c, cell) in row.iter().enumerate() {
                self.validate_prose(cell, &format!("{path}.rows[{r}][{c}]"));
            }
        }
    }

    fn validate_image(&mut self, image: &Image, path: &str) {
        let src = image.src.trim();
        if src.is_empty() {
            self.add_error(&format!("{path}.src"), "Image src cannot be empty");
        } else if !(src.starts_with("https://") || src.starts_with("http://") || src.starts_with('/'))
        {
            self.add_error(
                &format!("{path}.src"),
                &format!("Image src '{src}' must be an http(s) URL or a root-relative path"),
            );
        }

        if image.alt.trim().is_empty() {
            self.add_warning(
                &format!("{path}.alt"),
                "Image has no alt text; screen readers will skip it",
            );
        }

        if let Some(caption) = &image.caption {
            self.validate_prose(caption, &format!("{path}.caption"));
        }
    }

    // ========================================================================
    // Worked Examples
    // ========================================================================

    fn validate_multiple_choice(&mut self, example: &MultipleChoiceExample, path: &str) {
        self.validate_example_number(example.number, path);
        self.validate_prose(&example.prompt, &format!("{path}.prompt"));

        if example.options.len() < 2 {
            self.add_error(
                &format!("{path}.options"),
                &format!(
                    "Multiple-choice example needs at least 2 options, found {}",
                    example.options.len()
                ),
            );
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (k, option) in example.options.iter().enumerate() {
            let option_path = format!("{path}.options[{k}]");
            if let Some(first) = seen.insert(option.as_str(), k) {
                self.add_error(
                    &option_path,
                    &format!("Duplicate option '{option}' (same as options[{first}])"),
                );
            }
            self.validate_prose(option, &option_path);
        }

        if example.correct_index().is_none() {
            self.add_error(
                &format!("{path}.correct"),
                &format!(
                    "Correct answer '{}' is not one of the options",
                    example.correct
                ),
            );
        }

        self.validate_solution(&example.solution, path);
    }

    fn validate_example_card(&mut self, card: &ExampleCard, path: &str) {
        self.validate_example_number(card.number, path);

        if card.title.trim().is_empty() {
            self.add_warning(&format!("{path}.title"), "Example card has no title");
        }

        if card.statements.len() < 3 {
            self.add_warning(
                &format!("{path}.statements"),
                &format!(
                    "Data-sufficiency card has {} statement(s); expected a stem and two statements",
                    card.statements.len()
                ),
            );
        }
        for (k, statement) in card.statements.iter().enumerate() {
            self.validate_prose(statement, &format!("{path}.statements[{k}]"));
        }

        if DsAnswer::from_letter(&card.correct_letter).is_none() {
            self.add_error(
                &format!("{path}.correct_letter"),
                &format!(
                    "Correct letter '{}' must be one of A, B, C, D, E",
                    card.correct_letter
                ),
            );
        }

        self.validate_solution(&card.solution, path);
    }

    fn validate_statement_set(&mut self, set: &StatementSet, path: &str) {
        self.validate_example_number(set.number, path);
        self.validate_prose(&set.prompt, &format!("{path}.prompt"));
        self.validate_label_pair(&set.labels, &format!("{path}.labels"));

        if set.statements.is_empty() {
            self.add_error(
                &format!("{path}.statements"),
                "Statement set needs at least one statement",
            );
        }
        for (k, statement) in set.statements.iter().enumerate() {
            let text_path = format!("{path}.statements[{k}].text");
            if statement.text.trim().is_empty() {
                self.add_error(&text_path, "Statement text cannot be empty");
            }
            self.validate_prose(&statement.text, &text_path);
        }

        self.validate_solution(&set.solution, path);
    }

    fn validate_two_part(&mut self, example: &TwoPartExample, path: &str) {
        self.validate_example_number(example.number, path);
        self.validate_prose(&example.prompt, &format!("{path}.prompt"));
        self.validate_label_pair(&example.columns, &format!("{path}.columns"));

        if example.options.len() < 2 {
            self.add_error(
                &format!("{path}.options"),
                &format!(
                    "Two-part example needs at least 2 options, found {}",
                    example.options.len()
                ),
            );
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (k, option) in example.options.iter().enumerate() {
            let option_path = format!("{path}.options[{k}]");
            if let Some(first) = seen.insert(option.as_str(), k) {
                self.add_error(
                    &option_path,
                    &format!("Duplicate option '{option}' (same as options[{first}])"),
                );
            }
            self.validate_prose(option, &option_path);
        }

        for (k, index) in example.correct_indices().iter().enumerate() {
            if index.is_none() {
                self.add_error(
                    &format!("{path}.correct[{k}]"),
                    &format!(
                        "Correct answer '{}' for column '{}' is not one of the options",
                        example.correct[k], example.columns[k]
                    ),
                );
            }
        }

        self.validate_solution(&example.solution, path);
    }

    /// Column headers and judgement labels must be distinct and non-empty.
    fn validate_label_pair(&mut self, labels: &[String; 2], path: &str) {
        for (k, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                self.add_error(&format!("{path}[{k}]"), "Label cannot be empty");
            }
        }
        if !labels[0].trim().is_empty() && labels[0].trim().eq_ignore_ascii_case(labels[1].trim()) {
            self.add_error(
                &format!("{path}[1]"),
                &format!("Both labels read '{}'", labels[0].trim()),
            );
        }
    }

    fn validate_example_number(&mut self, number: u32, path: &str) {
        let number_path = format!("{path}.number");
        if let Some(first) = self.example_numbers.get(&number) {
            let message = format!("Duplicate example number {number} (first used at {first})");
            self.add_error(&number_path, &message);
        } else {
            self.example_numbers.insert(number, path.to_string());
        }
    }

    fn validate_solution(&mut self, solution: &str, path: &str) {
        let solution_path = format!("{path}.solution");
        if solution.trim().is_empty() {
            self.add_warning(&solution_path, "Example has no worked solution");
        } else {
            self.validate_prose(solution, &solution_path);
        }
    }

    // ========================================================================
    // Math
    // ========================================================================

    fn validate_math_expression(&mut self, expr: &MathExpression, path: &str) {
        if expr.source.trim().is_empty() {
            self.add_warning(&format!("{path}.source"), "Math expression is empty");
            return;
        }
        self.check_math(&expr.source, MathMode::from_display(expr.display), &format!("{path}.source"));
    }

    fn validate_prose(&mut self, text: &str, path: &str) {
        for (source, mode) in math_sources(text) {
            if source.trim().is_empty() {
                self.add_warning(path, "Prose contains an empty math span");
            } else {
                self.check_math(&source, mode, path);
            }
        }
    }

    fn check_math(&mut self, source: &str, mode: MathMode, path: &str) {
        if let Err(err) = self.math.try_render(source.trim(), mode) {
            self.add_warning(
                path,
                &format!("Math '{source}' does not render ({err}); it will be shown as plain text"),
            );
        }
    }

    // ========================================================================
    // Limits
    // ========================================================================

    fn validate_limits(&mut self, lesson: &Lesson, limits: &LessonLimits) {
        if lesson.sections.len() > limits.max_sections {
            self.add_error(
                "sections",
                &format!(
                    "Too many sections: {} (maximum: {}). \
                     Set LESSONKIT_MAX_SECTIONS to increase the limit.",
                    lesson.sections.len(),
                    limits.max_sections
                ),
            );
        }

        let block_count = lesson.block_count();
        if block_count > limits.max_blocks {
            self.add_error(
                "sections",
                &format!(
                    "Too many blocks: {block_count} (maximum: {}). \
                     Set LESSONKIT_MAX_BLOCKS to increase the limit.",
                    limits.max_blocks
                ),
            );
        }

        for example in lesson.examples() {
            let (count, noun) = match example {
                ExampleRef::MultipleChoice(mcq) => (mcq.options.len(), "options"),
                ExampleRef::TwoPart(two_part) => (two_part.options.len(), "options"),
                ExampleRef::Statements(set) => (set.statements.len(), "statements"),
                ExampleRef::Card(_) => continue,
            };
            if count > limits.max_options {
                self.add_error(
                    "sections",
                    &format!(
                        "Example {} has {count} {noun} (maximum: {}). \
                         Set LESSONKIT_MAX_OPTIONS to increase the limit.",
                        example.number(),
                        limits.max_options
                    ),
                );
            }
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
