//! Library index page.

use std::collections::BTreeMap;

use lessonkit_core::schema::Lesson;

use crate::escape::{escape_html, truncate};
use crate::page::{PageOptions, head};

/// Heading used for lessons without a topic.
pub const UNGROUPED_TOPIC: &str = "Other";

/// Maximum summary length shown per lesson.
const SUMMARY_CHARS: usize = 200;

/// Path of a lesson page relative to the site root.
#[must_use]
pub fn lesson_href(id: &str) -> String {
    format!("lessons/{id}.html")
}

/// Render the index document listing `lessons` grouped by topic.
///
/// Topics are sorted by name with [`UNGROUPED_TOPIC`] last; lessons keep
/// the order they were given in.
#[must_use]
pub fn render_index<'a>(
    lessons: impl IntoIterator<Item = &'a Lesson>,
    site_title: &str,
    options: &PageOptions,
) -> String {
    let mut topics: BTreeMap<&str, Vec<&Lesson>> = BTreeMap::new();
    let mut ungrouped = Vec::new();
    for lesson in lessons {
        match lesson.topic.as_deref() {
            Some(topic) if !topic.trim().is_empty() => topics.entry(topic).or_default().push(lesson),
            _ => ungrouped.push(lesson),
        }
    }

    let total = topics.values().map(Vec::len).sum::<usize>() + ungrouped.len();
    let description = format!("{total} lessons");

    let mut lines = head(site_title, &description, options);
    lines.push("<body>".to_string());
    lines.push("<main class=\"lesson-index\">".to_string());
    lines.push(format!("<h1>{}</h1>", escape_html(site_title)));

    let groups = topics
        .into_iter()
        .chain((!ungrouped.is_empty()).then_some((UNGROUPED_TOPIC, ungrouped)));
    for (topic, entries) in groups {
        lines.push("<section class=\"topic\">".to_string());
        lines.push(format!("<h2>{}</h2>", escape_html(topic)));
        lines.push("<ul>".to_string());
        for lesson in entries {
            lines.push(format!(
                "<li><a href=\"{}\">{}</a><p>{}</p></li>",
                escape_html(&lesson_href(&lesson.id)),
                escape_html(&lesson.title),
                escape_html(&truncate(&lesson.description, SUMMARY_CHARS))
            ));
        }
        lines.push("</ul>".to_string());
        lines.push("</section>".to_string());
    }

    lines.push("</main>".to_string());
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());
    lines.push(String::new());
    lines.join("\n")
}
