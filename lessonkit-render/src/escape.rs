//! HTML escaping and anchor slugification.
//!
//! Lesson text is authored by hand and routinely contains `<`, `>` and `&`
//! (inequalities, "A & B" statements), so every literal that reaches the
//! page goes through [`escape_html`].

/// Escape text for use in HTML element content or a quoted attribute value.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Slugify a heading into an HTML anchor id.
///
/// # Rules
/// 1. Lowercase the entire string
/// 2. Replace spaces, dashes and underscores with `-`
/// 3. Strip any character not in `[a-z0-9-]`
/// 4. Collapse consecutive dashes
/// 5. Trim leading/trailing dashes
/// 6. If result is empty, use `section-{index}`
#[must_use]
pub fn slugify(text: &str, index: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let mapped = match c {
            ' ' | '-' | '_' => '-',
            c if c.is_ascii_alphanumeric() => c,
            _ => continue,
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("section-{index}")
    } else {
        slug.to_string()
    }
}

/// Truncate a string to `max_chars` characters, appending `...` if truncated.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated.trim_end())
    }
}
