//! `lessonkit` - render, validate and serve GMAT prep lessons
//!
//! Lessons are YAML documents of prose, math and worked examples. This
//! crate loads and validates them, builds static sites, and serves a
//! live preview; the rendering itself lives in `lessonkit-render`.

pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod observability;
pub mod server;
pub mod site;
