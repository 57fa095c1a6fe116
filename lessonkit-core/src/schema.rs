//! Lesson schema types
//!
//! A lesson is a fixed, declarative document: page metadata, prose with
//! embedded math, callouts, and worked examples. These types are
//! deserialized from YAML lesson files and never mutated afterwards.

use serde::{Deserialize, Serialize};

// ============================================================================
// Lesson
// ============================================================================

/// Root type of a lesson file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Lesson {
    /// Kebab-case slug, unique within a library (used in URLs and file names)
    pub id: String,

    /// Page title (document `<title>`)
    pub title: String,

    /// Page description for discovery (`<meta name="description">`)
    pub description: String,

    /// Chapter line rendered as the page `<h1>` (e.g. "14. Statistics")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,

    /// Lesson heading rendered as the page `<h2>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Topic used to group lessons on the index page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Free-form tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Ordered content sections
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Lesson {
    /// Returns every worked example in document order, including examples
    /// nested inside callouts.
    #[must_use]
    pub fn examples(&self) -> Vec<ExampleRef<'_>> {
        let mut out = Vec::new();
        for section in &self.sections {
            collect_examples(&section.blocks, &mut out);
        }
        out
    }

    /// Finds a worked example by its authored number.
    #[must_use]
    pub fn find_example(&self, number: u32) -> Option<ExampleRef<'_>> {
        self.examples().into_iter().find(|e| e.number() == number)
    }

    /// Total number of blocks in the lesson, counting nested blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks.iter().map(|b| 1 + count(b.children())).sum()
        }
        self.sections.iter().map(|s| count(&s.blocks)).sum()
    }
}

fn collect_examples<'a>(blocks: &'a [Block], out: &mut Vec<ExampleRef<'a>>) {
    for block in blocks {
        match block {
            Block::MultipleChoice(mcq) => out.push(ExampleRef::MultipleChoice(mcq)),
            Block::ExampleCard(card) => out.push(ExampleRef::Card(card)),
            Block::StatementSet(set) => out.push(ExampleRef::Statements(set)),
            Block::TwoPart(example) => out.push(ExampleRef::TwoPart(example)),
            other => collect_examples(other.children(), out),
        }
    }
}

/// A borrowed reference to any kind of worked example.
#[derive(Debug, Clone, Copy)]
pub enum ExampleRef<'a> {
    /// Multiple-choice problem solving example
    MultipleChoice(&'a MultipleChoiceExample),
    /// Data-sufficiency example card
    Card(&'a ExampleCard),
    /// Table Analysis statement set
    Statements(&'a StatementSet),
    /// Two-Part Analysis example
    TwoPart(&'a TwoPartExample),
}

impl ExampleRef<'_> {
    /// The authored example number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        match self {
            Self::MultipleChoice(mcq) => mcq.number,
            Self::Card(card) => card.number,
            Self::Statements(set) => set.number,
            Self::TwoPart(example) => example.number,
        }
    }

    /// Compares a learner's selection against the authored answer.
    #[must_use]
    pub fn check(&self, selected: &str) -> crate::answer::AnswerOutcome {
        match self {
            Self::MultipleChoice(mcq) => mcq.check(selected),
            Self::Card(card) => card.check(selected),
            Self::Statements(set) => set.check(selected),
            Self::TwoPart(example) => example.check(selected),
        }
    }
}

// ============================================================================
// Sections and Blocks
// ============================================================================

/// A titled group of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Section {
    /// Anchor id; derived from the heading when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Section heading rendered as `<h3>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Section content
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A unit of lesson content, tagged by `type` in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Markdown prose with `$inline$` and `$$display$$` math
    Paragraph {
        /// Markdown source
        text: String,
    },

    /// A standalone math expression
    Math(MathExpression),

    /// "Must know" callout wrapping child blocks
    Callout(Callout),

    /// Bulleted or numbered list
    List(ListBlock),

    /// Table with a header row
    Table(Table),

    /// Externally hosted image
    Image(Image),

    /// Quotation with optional attribution
    Quote(Quote),

    /// Multiple-choice problem solving example
    MultipleChoice(MultipleChoiceExample),

    /// Data-sufficiency example card
    ExampleCard(ExampleCard),

    /// Table Analysis statements, each judged one way or the other
    StatementSet(StatementSet),

    /// Two-Part Analysis: one option chosen per column
    TwoPart(TwoPartExample),
}

impl Block {
    /// Child blocks for container blocks, empty otherwise.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Callout(callout) => &callout.blocks,
            _ => &[],
        }
    }

    /// Short kind name, matching the YAML `type` tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Math(_) => "math",
            Self::Callout(_) => "callout",
            Self::List(_) => "list",
            Self::Table(_) => "table",
            Self::Image(_) => "image",
            Self::Quote(_) => "quote",
            Self::MultipleChoice(_) => "multiple_choice",
            Self::ExampleCard(_) => "example_card",
            Self::StatementSet(_) => "statement_set",
            Self::TwoPart(_) => "two_part",
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Math markup plus layout mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MathExpression {
    /// LaTeX source
    pub source: String,

    /// Block layout when `true`, inline otherwise
    #[serde(default = "default_true")]
    pub display: bool,

    /// Accessible label; defaults to the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
}

impl MathExpression {
    /// Creates a display-mode expression.
    #[must_use]
    pub fn display(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            display: true,
            aria_label: None,
        }
    }

    /// Creates an inline expression.
    #[must_use]
    pub fn inline(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            display: false,
            aria_label: None,
        }
    }
}

/// Key-takeaway box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Callout {
    /// Heading shown in the box (defaults to "Must know")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Wrapped content
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Bulleted or numbered list of inline prose items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListBlock {
    /// Numbered list when `true`
    #[serde(default)]
    pub ordered: bool,

    /// Items (inline Markdown)
    pub items: Vec<String>,
}

/// Table of inline prose cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Table {
    /// Caption, read by screen readers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Column headers
    pub header: Vec<String>,

    /// Body rows
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// Externally hosted image (diagram).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Image {
    /// Absolute `http(s)` URL or root-relative path
    pub src: String,

    /// Alternative text
    #[serde(default)]
    pub alt: String,

    /// Caption shown below the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Intrinsic width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Intrinsic height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Quotation rendered as a figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Quote {
    /// Quoted text (inline Markdown)
    pub text: String,

    /// Attribution line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

// ============================================================================
// Worked Examples
// ============================================================================

/// A numbered multiple-choice example with an authored answer.
///
/// `correct` is compared by string equality against `options`; nothing about
/// the answer is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MultipleChoiceExample {
    /// Example number shown to the learner
    pub number: u32,

    /// Question prompt (Markdown)
    pub prompt: String,

    /// Answer options in display order (inline Markdown)
    pub options: Vec<String>,

    /// The correct option, verbatim
    pub correct: String,

    /// Worked solution (Markdown)
    #[serde(default)]
    pub solution: String,
}

/// A numbered data-sufficiency example card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExampleCard {
    /// Example number shown to the learner
    pub number: u32,

    /// Card title
    pub title: String,

    /// Question stem followed by the numbered statements (inline Markdown)
    pub statements: Vec<String>,

    /// Authored answer letter, A through E
    pub correct_letter: String,

    /// Worked solution (Markdown)
    #[serde(default)]
    pub solution: String,
}

fn default_judgement_labels() -> [String; 2] {
    ["Yes".to_string(), "No".to_string()]
}

/// A numbered Table Analysis example: statements judged Yes/No (or
/// True/False) against a table shown earlier in the lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatementSet {
    /// Example number shown to the learner
    pub number: u32,

    /// Heading shown above the statements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Instructions (Markdown)
    pub prompt: String,

    /// Column labels for the affirmative and negative judgement
    #[serde(default = "default_judgement_labels")]
    pub labels: [String; 2],

    /// Statements in display order
    pub statements: Vec<JudgedStatement>,

    /// Worked solution (Markdown)
    #[serde(default)]
    pub solution: String,
}

/// One statement of a [`StatementSet`] with its authored judgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JudgedStatement {
    /// Statement text (inline Markdown)
    pub text: String,

    /// `true` when the first label (e.g. "Yes") is the answer
    pub answer: bool,
}

/// A numbered Two-Part Analysis example: one shared option list, one
/// selection per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TwoPartExample {
    /// Example number shown to the learner
    pub number: u32,

    /// Heading shown above the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Question prompt (Markdown)
    pub prompt: String,

    /// Labels of the two answer columns
    pub columns: [String; 2],

    /// Options shared by both columns (inline Markdown)
    pub options: Vec<String>,

    /// Authored option for each column, verbatim
    pub correct: [String; 2],

    /// Worked solution (Markdown)
    #[serde(default)]
    pub solution: String,
}
