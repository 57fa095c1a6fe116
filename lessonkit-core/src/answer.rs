//! Answer labels and answer checking.
//!
//! Checking is a single equality comparison against the authored literal.
//! Nothing here evaluates whether an answer is mathematically right.

use std::fmt;

use serde::Serialize;

use crate::schema::{ExampleCard, MultipleChoiceExample, StatementSet, TwoPartExample};

/// Separates the parts of a multi-part answer (`"Yes|No|No"`, `"B|D"`).
pub const ANSWER_SEPARATOR: char = '|';

/// Outcome of comparing a selection against the authored answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The selection matches the authored answer.
    Correct,
    /// The selection is a valid choice but not the authored answer.
    Incorrect {
        /// Letter of the authored answer
        expected: String,
    },
    /// Some judgements of a statement set are wrong.
    Scored {
        /// Number of statements judged as authored
        score: usize,
        /// Number of statements
        total: usize,
        /// Authored judgements, separated by `|`
        expected: String,
    },
    /// The selection is not one of the available choices.
    UnknownOption,
}

impl AnswerOutcome {
    /// Returns `true` for [`AnswerOutcome::Correct`].
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Letter label for the option at `index` (`0 -> 'A'`).
///
/// Indices past `Z` wrap around; lessons are limited to far fewer options.
#[must_use]
pub fn option_label(index: usize) -> char {
    const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    char::from(LETTERS[index % LETTERS.len()])
}

/// Resolves a selection to an option index, by exact text first and then
/// by letter label.
fn resolve_option(options: &[String], selected: &str) -> Option<usize> {
    options
        .iter()
        .position(|o| o == selected)
        .or_else(|| label_index(selected).filter(|i| *i < options.len()))
}

/// Parses a single option letter into an index (`"c" -> 2`).
fn label_index(label: &str) -> Option<usize> {
    let mut chars = label.trim().chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !c.is_ascii_uppercase() {
        return None;
    }
    Some(usize::from(c as u8 - b'A'))
}

impl MultipleChoiceExample {
    /// Position of the authored answer among the options.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct)
    }

    /// Letter of the authored answer, if it is one of the options.
    #[must_use]
    pub fn correct_label(&self) -> Option<char> {
        self.correct_index().map(option_label)
    }

    /// Compares a selection against the authored answer.
    ///
    /// `selected` may be the option text itself or its letter label.
    #[must_use]
    pub fn check(&self, selected: &str) -> AnswerOutcome {
        let Some(selected_index) = resolve_option(&self.options, selected) else {
            return AnswerOutcome::UnknownOption;
        };

        match self.correct_index() {
            Some(correct) if correct == selected_index => AnswerOutcome::Correct,
            Some(correct) => AnswerOutcome::Incorrect {
                expected: option_label(correct).to_string(),
            },
            None => AnswerOutcome::Incorrect {
                expected: self.correct.clone(),
            },
        }
    }
}

// ============================================================================
// Data Sufficiency
// ============================================================================

/// The five standard data-sufficiency answer choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DsAnswer {
    /// Statement (1) alone is sufficient, (2) alone is not.
    A,
    /// Statement (2) alone is sufficient, (1) alone is not.
    B,
    /// Both together are sufficient, neither alone is.
    C,
    /// Each statement alone is sufficient.
    D,
    /// The statements together are not sufficient.
    E,
}

impl DsAnswer {
    /// Parses a letter, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            "E" | "e" => Some(Self::E),
            _ => None,
        }
    }

    /// All choices in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::A, Self::B, Self::C, Self::D, Self::E]
    }

    /// Uppercase letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }

    /// Standard wording of the choice.
    #[must_use]
    pub const fn meaning(self) -> &'static str {
        match self {
            Self::A => "Statement (1) ALONE is sufficient, but statement (2) alone is not sufficient.",
            Self::B => "Statement (2) ALONE is sufficient, but statement (1) alone is not sufficient.",
            Self::C => "BOTH statements TOGETHER are sufficient, but NEITHER statement ALONE is sufficient.",
            Self::D => "EACH statement ALONE is sufficient.",
            Self::E => "Statements (1) and (2) TOGETHER are NOT sufficient.",
        }
    }
}

impl fmt::Display for DsAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl ExampleCard {
    /// The authored answer, if it is a valid letter.
    #[must_use]
    pub fn answer(&self) -> Option<DsAnswer> {
        DsAnswer::from_letter(&self.correct_letter)
    }

    /// Compares a selected letter against the authored answer.
    #[must_use]
    pub fn check(&self, selected: &str) -> AnswerOutcome {
        let Some(selected) = DsAnswer::from_letter(selected) else {
            return AnswerOutcome::UnknownOption;
        };
        match self.answer() {
            Some(answer) if answer == selected => AnswerOutcome::Correct,
            Some(answer) => AnswerOutcome::Incorrect {
                expected: answer.to_string(),
            },
            None => AnswerOutcome::Incorrect {
                expected: self.correct_letter.clone(),
            },
        }
    }
}

// ============================================================================
// Data Insights
// ============================================================================

impl StatementSet {
    /// Parses one judgement: either label (case-insensitive), or
    /// yes/no, y/n, true/false, t/f.
    #[must_use]
    pub fn parse_judgement(&self, judgement: &str) -> Option<bool> {
        let judgement = judgement.trim();
        if judgement.eq_ignore_ascii_case(self.labels[0].trim()) {
            return Some(true);
        }
        if judgement.eq_ignore_ascii_case(self.labels[1].trim()) {
            return Some(false);
        }
        match judgement.to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "t" => Some(true),
            "no" | "n" | "false" | "f" => Some(false),
            _ => None,
        }
    }

    /// Label of the authored judgement for each statement.
    #[must_use]
    pub fn answer_labels(&self) -> Vec<&str> {
        self.statements
            .iter()
            .map(|s| {
                let label = if s.answer { &self.labels[0] } else { &self.labels[1] };
                label.as_str()
            })
            .collect()
    }

    /// Scores one judgement per statement, separated by `|`.
    #[must_use]
    pub fn check(&self, selected: &str) -> AnswerOutcome {
        let parts: Vec<&str> = selected.split(ANSWER_SEPARATOR).collect();
        if parts.len() != self.statements.len() {
            return AnswerOutcome::UnknownOption;
        }
        let Some(judgements) = parts
            .iter()
            .map(|p| self.parse_judgement(p))
            .collect::<Option<Vec<bool>>>()
        else {
            return AnswerOutcome::UnknownOption;
        };

        let total = self.statements.len();
        let score = judgements
            .iter()
            .zip(&self.statements)
            .filter(|(judged, statement)| **judged == statement.answer)
            .count();
        if score == total {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Scored {
                score,
                total,
                expected: self.answer_labels().join("|"),
            }
        }
    }
}

impl TwoPartExample {
    /// Position of the authored option for each column.
    #[must_use]
    pub fn correct_indices(&self) -> [Option<usize>; 2] {
        [
            self.options.iter().position(|o| *o == self.correct[0]),
            self.options.iter().position(|o| *o == self.correct[1]),
        ]
    }

    /// Authored answer as column letters (`"B|D"`), falling back to the
    /// literal for a column whose answer is not an option.
    #[must_use]
    pub fn expected(&self) -> String {
        self.correct_indices()
            .into_iter()
            .zip(&self.correct)
            .map(|(index, literal)| index.map_or_else(|| literal.clone(), |i| option_label(i).to_string()))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Compares a `left|right` selection against the authored pair.
    ///
    /// Each part may be the option text or its letter label.
    #[must_use]
    pub fn check(&self, selected: &str) -> AnswerOutcome {
        let Some((left, right)) = selected.split_once(ANSWER_SEPARATOR) else {
            return AnswerOutcome::UnknownOption;
        };
        let (Some(left), Some(right)) = (
            resolve_option(&self.options, left.trim()),
            resolve_option(&self.options, right.trim()),
        ) else {
            return AnswerOutcome::UnknownOption;
        };

        if self.correct_indices() == [Some(left), Some(right)] {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                expected: self.expected(),
            }
        }
    }
}
