//! Markdown prose with embedded math.
//!
//! Prose goes through CommonMark with `$…$` / `$$…$$` math enabled; math
//! events are swapped for [`MathRenderer`] output. Raw HTML in lesson text
//! is escaped, never passed through.

use pulldown_cmark::{Event, Options, Parser, html};

use crate::math::{MathMode, MathRenderer};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_MATH);
    options
}

/// Render block-level Markdown prose to HTML.
#[must_use]
pub fn render_markdown(text: &str, math: &MathRenderer) -> String {
    let parser = Parser::new_ext(text, options()).map(|event| match event {
        Event::InlineMath(source) => Event::InlineHtml(math.render(&source, MathMode::Inline).into()),
        Event::DisplayMath(source) => {
            Event::InlineHtml(math.render(&source, MathMode::Display).into())
        }
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// Math spans embedded in `text`, in document order.
#[must_use]
pub fn math_sources(text: &str) -> Vec<(String, MathMode)> {
    Parser::new_ext(text, options())
        .filter_map(|event| match event {
            Event::InlineMath(source) => Some((source.into_string(), MathMode::Inline)),
            Event::DisplayMath(source) => Some((source.into_string(), MathMode::Display)),
            _ => None,
        })
        .collect()
}

/// Render a single line of prose for inline contexts (options, cells, list
/// items), dropping the enclosing paragraph.
#[must_use]
pub fn render_inline(text: &str, math: &MathRenderer) -> String {
    let rendered = render_markdown(text, math);
    let trimmed = rendered.trim_end();

    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => trimmed.to_string(),
    }
}
