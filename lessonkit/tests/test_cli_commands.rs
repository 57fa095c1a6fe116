mod common;

use common::{fixture_arg, run, stderr, stdout};

#[test]
fn validate_valid_lesson() {
    let output = run(&["validate", "--math", "plain", &fixture_arg("median.yaml")]);
    assert!(
        output.status.success(),
        "validate should succeed for a valid lesson: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("1 valid, 0 failed"));
}

#[test]
fn validate_reports_every_file() {
    let output = run(&[
        "validate",
        "--math",
        "plain",
        &fixture_arg("median.yaml"),
        &fixture_arg("wrong_correct.yaml"),
        &fixture_arg("malformed.yaml"),
    ]);
    assert_eq!(output.status.code(), Some(2));

    let out = stdout(&output);
    assert!(out.contains("wrong_correct.yaml: FAILED"), "{out}");
    assert!(out.contains("malformed.yaml: FAILED"), "{out}");
    assert!(out.contains("3 file(s) checked, 1 valid, 2 failed"), "{out}");
    assert!(stderr(&output).contains("2 file(s) failed validation"));
}

#[test]
fn validate_json_output() {
    let output = run(&[
        "validate",
        "--format",
        "json",
        "--math",
        "plain",
        &fixture_arg("wrong_correct.yaml"),
    ]);
    assert!(!output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("output should be valid JSON");
    let report = &parsed[0];
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"][0]["severity"], "error");
    assert!(
        report["errors"][0]["path"]
            .as_str()
            .unwrap()
            .ends_with(".correct")
    );
}

#[test]
fn validate_missing_file() {
    let output = run(&["validate", "/tmp/nonexistent_lessonkit_test_file.yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn lessons_list_json() {
    let output = run(&["lessons", "list", "--format", "json", "--category", "verbal"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = parsed.as_array().unwrap();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e["category"] == "verbal"));
}

#[test]
fn lessons_list_human() {
    let output = run(&["lessons", "list"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Built-in Lessons"));
    assert!(out.contains("Data Insights"));
}

#[test]
fn lessons_show_prints_yaml() {
    let output = run(&["lessons", "show", "ratios-part-to-whole"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("id: ratios-part-to-whole"));
}

#[test]
fn lessons_show_unknown_suggests() {
    let output = run(&["lessons", "show", "ratios-part-to-hole"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(stderr(&output).contains("Did you mean 'ratios-part-to-whole'?"));
}

#[test]
fn render_file_to_stdout() {
    let output = run(&[
        "render",
        "--math",
        "plain",
        "--stylesheet",
        "/css/site.css",
        &fixture_arg("median.yaml"),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let html = stdout(&output);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Median with Unknown Values | Statistics</title>"));
    assert!(html.contains("href=\"/css/site.css\""));
}

#[test]
fn render_invalid_lesson_fails() {
    let output = run(&["render", &fixture_arg("wrong_correct.yaml")]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn render_requires_a_source() {
    let output = run(&["render"]);
    assert_eq!(output.status.code(), Some(2), "clap usage errors exit with 2");
}

#[test]
fn math_plain_escapes() {
    let output = run(&["math", "--math", "plain", "a<b"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("a&lt;b"));
}

#[test]
fn math_malformed_never_fails() {
    let output = run(&["--quiet", "math", "\\frac{1}{"]);
    assert!(output.status.success());
    assert!(!stdout(&output).is_empty());
}

#[test]
fn version_json() {
    let output = run(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["name"], "lessonkit");
}

#[test]
fn completions_bash() {
    let output = run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("lessonkit"));
}

#[test]
fn build_without_source_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["build", "-o", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(64));
}
