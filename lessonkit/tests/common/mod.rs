//! Shared integration-test harness for running the `lessonkit` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs `lessonkit` with `args` and waits for it to exit.
///
/// Logging is silenced so stderr only carries error messages.
#[allow(clippy::missing_panics_doc)]
pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lessonkit"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("LESSONKIT_LESSONS")
        .env_remove("LESSONKIT_STYLESHEET")
        .env_remove("LESSONKIT_LOG_LEVEL")
        .output()
        .expect("failed to spawn lessonkit")
}

/// Stdout of a finished run as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished run as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Fixture path as a `&str` argument.
pub fn fixture_arg(name: &str) -> String {
    fixture_path(name)
        .to_str()
        .expect("non-UTF-8 fixture path")
        .to_string()
}
