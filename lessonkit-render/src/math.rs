//! Math rendering with graceful degradation.
//!
//! Every page funnels its LaTeX through one [`MathRenderer`]. Rendering is
//! best-effort: a parse failure or a backend panic produces an unstyled
//! fallback that shows the escaped source, never an error.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use lessonkit_core::MathExpression;
use latex2mathml::{DisplayStyle, latex_to_mathml};

use crate::error::MathError;
use crate::escape::escape_html;

/// Layout of a rendered expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Flows with the surrounding text.
    Inline,
    /// Centred on its own line.
    Display,
}

impl MathMode {
    /// Mode for a `display` flag.
    #[must_use]
    pub const fn from_display(display: bool) -> Self {
        if display { Self::Display } else { Self::Inline }
    }
}

/// Converts math markup into embeddable markup.
pub trait MathBackend: Send + Sync {
    /// Render `source` in the given mode.
    ///
    /// # Errors
    ///
    /// Returns `MathError::Parse` if the markup is malformed.
    fn render(&self, source: &str, mode: MathMode) -> Result<String, MathError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Available backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathBackendKind {
    /// LaTeX to presentation MathML.
    #[default]
    MathMl,
    /// Escaped LaTeX source in a `<code>` element.
    Plain,
}

/// Create a backend of the given kind.
#[must_use]
pub fn create_backend(kind: MathBackendKind) -> Arc<dyn MathBackend> {
    match kind {
        MathBackendKind::MathMl => Arc::new(MathMlBackend),
        MathBackendKind::Plain => Arc::new(PlainBackend),
    }
}

/// LaTeX to MathML via `latex2mathml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMlBackend;

impl MathBackend for MathMlBackend {
    fn render(&self, source: &str, mode: MathMode) -> Result<String, MathError> {
        let style = match mode {
            MathMode::Inline => DisplayStyle::Inline,
            MathMode::Display => DisplayStyle::Block,
        };
        latex_to_mathml(source, style).map_err(|e| MathError::Parse(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "mathml"
    }
}

/// Shows the source verbatim; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainBackend;

impl MathBackend for PlainBackend {
    fn render(&self, source: &str, _mode: MathMode) -> Result<String, MathError> {
        Ok(format!("<code class=\"math-source\">{}</code>", escape_html(source)))
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// What to do when an expression falls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Fall back silently.
    Ignore,
    /// Fall back and emit a warning event.
    #[default]
    Warn,
}

/// Shared, stateless math renderer.
#[derive(Clone)]
pub struct MathRenderer {
    backend: Arc<dyn MathBackend>,
    strictness: Strictness,
}

impl fmt::Debug for MathRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathRenderer")
            .field("backend", &self.backend.name())
            .field("strictness", &self.strictness)
            .finish()
    }
}

impl Default for MathRenderer {
    fn default() -> Self {
        Self::new(create_backend(MathBackendKind::default()))
    }
}

impl MathRenderer {
    /// Creates a renderer over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn MathBackend>) -> Self {
        Self {
            backend,
            strictness: Strictness::default(),
        }
    }

    /// Sets the fallback strictness.
    #[must_use]
    pub const fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Runs the backend and reports failures instead of falling back.
    ///
    /// Backend panics are caught and reported as [`MathError::Panicked`].
    ///
    /// # Errors
    ///
    /// Returns the backend error for malformed markup.
    pub fn try_render(&self, source: &str, mode: MathMode) -> Result<String, MathError> {
        catch_unwind(AssertUnwindSafe(|| self.backend.render(source, mode)))
            .unwrap_or_else(|payload| Err(MathError::Panicked(panic_message(payload.as_ref()))))
    }

    /// Renders `source` into a labelled wrapper, falling back to plain text.
    #[must_use]
    pub fn render(&self, source: &str, mode: MathMode) -> String {
        self.render_labelled(source, mode, None)
    }

    /// Renders a [`MathExpression`], honouring its layout and label.
    #[must_use]
    pub fn render_expression(&self, expr: &MathExpression) -> String {
        self.render_labelled(
            &expr.source,
            MathMode::from_display(expr.display),
            expr.aria_label.as_deref(),
        )
    }

    fn render_labelled(&self, source: &str, mode: MathMode, label: Option<&str>) -> String {
        let source = source.trim();
        let label = escape_html(label.unwrap_or(source));

        if source.is_empty() {
            return wrap(mode, "math", &label, None, "");
        }

        match self.try_render(source, mode) {
            Ok(markup) => wrap(mode, "math", &label, None, &markup),
            Err(err) => {
                metrics::counter!("lessonkit_math_fallbacks_total").increment(1);
                if self.strictness == Strictness::Warn {
                    tracing::warn!(source, error = %err, "math fell back to plain text");
                }
                let title = escape_html(&err.to_string());
                wrap(
                    mode,
                    "math math-error",
                    &label,
                    Some(&title),
                    &escape_html(source),
                )
            }
        }
    }
}

fn wrap(mode: MathMode, class: &str, label: &str, title: Option<&str>, inner: &str) -> String {
    let (tag, layout) = match mode {
        MathMode::Inline => ("span", "math-inline"),
        MathMode::Display => ("div", "math-display"),
    };
    let title = title.map_or_else(String::new, |t| format!(" title=\"{t}\""));
    format!("<{tag} class=\"{class} {layout}\" aria-label=\"{label}\"{title}>{inner}</{tag}>")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
