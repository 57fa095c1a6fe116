//! Metrics collection for `lessonkit`.
//!
//! Prometheus-compatible metrics for rendering and the preview server.
//! Without an installed recorder every `record_*` call is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::ServerError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Route templates served by the preview server.
///
/// Anything else is bucketed as `"__unknown__"` so arbitrary request paths
/// cannot grow label cardinality.
const KNOWN_ROUTES: [&str; 6] = [
    "/",
    "/lessons/{id}",
    "/api/lessons",
    "/api/lessons/{id}/examples/{number}/check",
    "/healthz",
    "/assets/lesson.css",
];

/// Sanitizes a matched route template for use as a metrics label.
#[must_use]
pub fn sanitize_route_label(route: &str) -> &str {
    if KNOWN_ROUTES.contains(&route) {
        route
    } else {
        "__unknown__"
    }
}

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `ServerError::Metrics` if the recorder or HTTP listener cannot
/// be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), ServerError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| ServerError::Metrics(e.to_string()))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "lessonkit_pages_rendered_total",
        "Total number of lesson pages rendered"
    );
    describe_histogram!(
        "lessonkit_render_duration_ms",
        "Lesson page rendering duration in milliseconds"
    );
    describe_counter!(
        "lessonkit_math_fallbacks_total",
        "Math expressions that fell back to plain text"
    );
    describe_counter!(
        "lessonkit_http_requests_total",
        "Preview server requests by route and status"
    );
    describe_counter!(
        "lessonkit_answer_checks_total",
        "Answer checks by outcome"
    );
    describe_gauge!("lessonkit_lessons_loaded", "Lessons served by the preview server");
}

/// Records a preview server request.
pub fn record_http_request(route: &str, status: u16) {
    counter!(
        "lessonkit_http_requests_total",
        "route" => sanitize_route_label(route).to_owned(),
        "status" => status.to_string(),
    )
    .increment(1);
}

/// Records an answer check outcome (`correct`, `incorrect`, `unknown_option`).
pub fn record_answer_check(outcome: &'static str) {
    counter!("lessonkit_answer_checks_total", "outcome" => outcome).increment(1);
}

/// Sets the number of lessons being served.
#[allow(clippy::cast_precision_loss)]
pub fn set_lessons_loaded(count: usize) {
    gauge!("lessonkit_lessons_loaded").set(count as f64);
}

/// Records the time taken to build a whole site.
pub fn record_site_build(duration: Duration) {
    histogram!("lessonkit_site_build_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_known_route_returns_original() {
        assert_eq!(sanitize_route_label("/lessons/{id}"), "/lessons/{id}");
        assert_eq!(sanitize_route_label("/healthz"), "/healthz");
    }

    #[test]
    fn sanitize_unknown_route_returns_unknown() {
        assert_eq!(sanitize_route_label("/wp-admin"), "__unknown__");
        assert_eq!(sanitize_route_label("/lessons/median"), "__unknown__");
    }

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        record_http_request("/", 200);
        record_answer_check("correct");
        set_lessons_loaded(3);
        record_site_build(Duration::from_millis(12));
    }
}
