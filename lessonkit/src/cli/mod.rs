//! Command-line interface
//!
//! Argument definitions and command handlers for the `lessonkit` binary.

pub mod args;
pub mod commands;
