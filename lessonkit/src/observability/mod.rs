//! Observability module
//!
//! Logging and metrics for `lessonkit` runs.

pub mod logging;
pub mod metrics;

pub use logging::{LogFormat, init_logging};
pub use metrics::init_metrics;
