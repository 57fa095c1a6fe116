//! `lessonkit` Core - lesson schema and shared error types
//!
//! This crate provides the lesson data model, answer checking, and the
//! error types shared across `lessonkit` (CLI, loader, preview server) and
//! `lessonkit-render` (math, prose and page rendering).

pub mod answer;
pub mod error;
pub mod schema;

pub use answer::{ANSWER_SEPARATOR, AnswerOutcome, DsAnswer, option_label};
pub use schema::{
    Block, Callout, ExampleCard, ExampleRef, Image, JudgedStatement, Lesson, ListBlock,
    MathExpression, MultipleChoiceExample, Quote, Section, StatementSet, Table, TwoPartExample,
};
