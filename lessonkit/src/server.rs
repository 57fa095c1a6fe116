//! HTTP preview server
//!
//! Serves a pre-rendered site over HTTP. All pages are rendered once at
//! startup and shared immutably between requests.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | index page |
//! | `GET /lessons/{id}` | lesson page (`.html` suffix optional) |
//! | `GET /api/lessons` | JSON manifest |
//! | `GET /api/lessons/{id}/examples/{number}/check?answer=X` | answer check (`X\|Y` for multi-part examples) |
//! | `GET /assets/lesson.css` | bundled stylesheet |
//! | `GET /healthz` | `ok` |

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{MatchedPath, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use lessonkit_core::{AnswerOutcome, Lesson};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::ServerError;
use crate::observability::metrics;
use crate::site::{DEFAULT_STYLESHEET_CSS, ManifestEntry, SiteOptions, render_site};

/// Default bind address for `lessonkit serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:4000";

// ============================================================================
// State
// ============================================================================

/// Immutable state shared by every request.
#[derive(Debug)]
pub struct SiteState {
    index: String,
    pages: BTreeMap<String, String>,
    lessons: BTreeMap<String, Arc<Lesson>>,
    manifest: Vec<ManifestEntry>,
}

impl SiteState {
    /// Renders every page up front.
    #[must_use]
    pub fn new(lessons: &[Arc<Lesson>], options: &SiteOptions) -> Self {
        let site = render_site(lessons, options);
        let lessons = lessons
            .iter()
            .map(|l| (l.id.clone(), Arc::clone(l)))
            .collect();
        Self {
            index: site.index,
            pages: site.pages,
            lessons,
            manifest: site.manifest,
        }
    }

    /// Number of lessons served.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.pages.len()
    }
}

// ============================================================================
// Axum Router
// ============================================================================

/// Builds the preview router.
pub fn build_router(state: Arc<SiteState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/lessons/{id}", get(handle_lesson))
        .route("/api/lessons", get(handle_manifest))
        .route(
            "/api/lessons/{id}/examples/{number}/check",
            get(handle_check),
        )
        .route("/assets/lesson.css", get(handle_stylesheet))
        .route("/healthz", get(handle_health))
        .layer(middleware::from_fn(track_request))
        .with_state(state)
}

/// Records a metric per request, labelled by route template.
async fn track_request(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "__unknown__".to_string(), |p| p.as_str().to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    metrics::record_http_request(&route, status);
    tracing::debug!(%method, %uri, status, "request served");
    response
}

async fn handle_index(State(state): State<Arc<SiteState>>) -> Html<String> {
    Html(state.index.clone())
}

async fn handle_lesson(
    State(state): State<Arc<SiteState>>,
    Path(id): Path<String>,
) -> Response {
    let id = id.strip_suffix(".html").unwrap_or(&id);
    state.pages.get(id).map_or_else(
        || {
            (
                StatusCode::NOT_FOUND,
                Html(format!(
                    "<!DOCTYPE html>\n<title>Not found</title>\n<p>No lesson named {}.</p>\n",
                    lessonkit_render::escape::escape_html(id)
                )),
            )
                .into_response()
        },
        |page| Html(page.clone()).into_response(),
    )
}

async fn handle_manifest(State(state): State<Arc<SiteState>>) -> Json<Vec<ManifestEntry>> {
    Json(state.manifest.clone())
}

/// Query string of the answer-check endpoint.
#[derive(Debug, Deserialize)]
struct CheckParams {
    answer: String,
}

/// Answer-check response body.
#[derive(Debug, Serialize)]
struct CheckResponse {
    lesson: String,
    example: u32,
    #[serde(flatten)]
    outcome: AnswerOutcome,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: message })).into_response()
}

async fn handle_check(
    State(state): State<Arc<SiteState>>,
    Path((id, number)): Path<(String, u32)>,
    Query(params): Query<CheckParams>,
) -> Response {
    let Some(lesson) = state.lessons.get(&id) else {
        return not_found(format!("unknown lesson '{id}'"));
    };
    let Some(example) = lesson.find_example(number) else {
        return not_found(format!("lesson '{id}' has no example {number}"));
    };

    let outcome = example.check(&params.answer);
    metrics::record_answer_check(match outcome {
        AnswerOutcome::Correct => "correct",
        AnswerOutcome::Incorrect { .. } => "incorrect",
        AnswerOutcome::Scored { .. } => "scored",
        AnswerOutcome::UnknownOption => "unknown_option",
    });

    Json(CheckResponse {
        lesson: id,
        example: number,
        outcome,
    })
    .into_response()
}

async fn handle_stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        DEFAULT_STYLESHEET_CSS,
    )
}

async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================================
// Serving
// ============================================================================

/// Serves `state` on `listener` until `cancel` fires.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the server fails while running.
pub async fn serve(
    listener: TcpListener,
    state: Arc<SiteState>,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let bound_addr = listener.local_addr()?;
    metrics::set_lessons_loaded(state.lesson_count());
    tracing::info!(%bound_addr, lessons = state.lesson_count(), "preview server started");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::debug!("preview server shut down");
    Ok(())
}

/// Binds a listener on `addr`.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the address cannot be bound.
pub async fn bind(addr: &str) -> Result<(TcpListener, SocketAddr), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;
    Ok((listener, bound))
}

/// Normalises a bind address.
///
/// Accepts `":4000"` and `"4000"` (all interfaces) as well as full
/// `host:port` socket addresses.
///
/// # Errors
///
/// Returns [`ServerError::InvalidBindAddress`] if the result cannot be
/// parsed as a socket address.
pub fn parse_bind_addr(input: &str) -> Result<String, ServerError> {
    let addr = if input.starts_with(':') {
        format!("0.0.0.0{input}")
    } else if input.parse::<u16>().is_ok() {
        format!("0.0.0.0:{input}")
    } else {
        input.to_string()
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| ServerError::InvalidBindAddress {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
    Ok(addr)
}

// ============================================================================
// Tests
// ============================================================================
