//! Lesson page rendering.
//!
//! Assembles page metadata, the header, and every section of a lesson into
//! a standalone HTML document. Rendering is a pure function of the lesson
//! and the page options: the same input always yields the same bytes.

use std::time::Instant;

use lessonkit_core::schema::{Block, Lesson, Section};

use crate::escape::{escape_html, slugify};
use crate::math::MathRenderer;
use crate::primitives;
use crate::prose::render_markdown;

/// Options shared by every page of a site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Stylesheet linked from each document head
    pub stylesheet: Option<String>,

    /// Site name appended to `og:site_name`
    pub site_name: Option<String>,

    /// Language attribute of the `<html>` element (defaults to `en`)
    pub lang: Option<String>,
}

/// Renders lessons into HTML.
#[derive(Debug, Clone, Default)]
pub struct LessonRenderer {
    math: MathRenderer,
    options: PageOptions,
}

impl LessonRenderer {
    /// Creates a renderer with the given math renderer and page options.
    #[must_use]
    pub const fn new(math: MathRenderer, options: PageOptions) -> Self {
        Self { math, options }
    }

    /// The math renderer used for every page.
    #[must_use]
    pub const fn math(&self) -> &MathRenderer {
        &self.math
    }

    /// The page options.
    #[must_use]
    pub const fn options(&self) -> &PageOptions {
        &self.options
    }

    /// Render a complete HTML document for a lesson.
    #[must_use]
    pub fn render_document(&self, lesson: &Lesson) -> String {
        let started = Instant::now();

        let mut lines = head(
            &lesson.title,
            &lesson.description,
            &self.options,
        );
        lines.push("<body>".to_string());
        lines.push(self.render_body(lesson));
        lines.push("</body>".to_string());
        lines.push("</html>".to_string());
        lines.push(String::new());

        metrics::counter!("lessonkit_pages_rendered_total").increment(1);
        metrics::histogram!("lessonkit_render_duration_ms")
            .record(started.elapsed().as_secs_f64() * 1000.0);
        tracing::debug!(lesson = %lesson.id, "rendered lesson page");

        lines.join("\n")
    }

    /// Render the `<main>` element of a lesson page.
    #[must_use]
    pub fn render_body(&self, lesson: &Lesson) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "<main class=\"lesson\" data-lesson=\"{}\">",
            escape_html(&lesson.id)
        ));

        if lesson.chapter.is_some() || lesson.heading.is_some() {
            lines.push("<header class=\"lesson-header\">".to_string());
            if let Some(chapter) = &lesson.chapter {
                lines.push(format!("<h1>{}</h1>", escape_html(chapter)));
            }
            if let Some(heading) = &lesson.heading {
                lines.push(format!("<h2>{}</h2>", escape_html(heading)));
            }
            lines.push("</header>".to_string());
        }

        lines.push("<article class=\"lesson-content\">".to_string());
        for (index, section) in lesson.sections.iter().enumerate() {
            lines.push(self.render_section(section, index));
        }
        lines.push("</article>".to_string());
        lines.push("</main>".to_string());
        lines.join("\n")
    }

    fn render_section(&self, section: &Section, index: usize) -> String {
        let mut lines = Vec::new();

        match &section.heading {
            Some(heading) => {
                let id = section_anchor(section, index);
                lines.push(format!("<section aria-labelledby=\"{id}\">"));
                lines.push(format!("<h3 id=\"{id}\">{}</h3>", escape_html(heading)));
            }
            None => match &section.id {
                Some(id) => lines.push(format!("<section id=\"{}\">", escape_html(id))),
                None => lines.push("<section>".to_string()),
            },
        }

        for block in &section.blocks {
            lines.push(self.render_block(block));
        }
        lines.push("</section>".to_string());
        lines.join("\n")
    }

    /// Render a single block.
    #[must_use]
    pub fn render_block(&self, block: &Block) -> String {
        let math = &self.math;
        match block {
            Block::Paragraph { text } => render_markdown(text, math).trim_end().to_string(),
            Block::Math(expr) => math.render_expression(expr),
            Block::Callout(callout) => {
                let inner: Vec<String> = callout
                    .blocks
                    .iter()
                    .map(|b| self.render_block(b))
                    .collect();
                primitives::callout(callout.title.as_deref(), &inner.join("\n"))
            }
            Block::List(list) => primitives::list(list, math),
            Block::Table(table) => primitives::table(table, math),
            Block::Image(image) => primitives::image(image, math),
            Block::Quote(quote) => primitives::quote(quote, math),
            Block::MultipleChoice(example) => primitives::multiple_choice(example, math),
            Block::ExampleCard(card) => primitives::example_card(card, math),
            Block::StatementSet(set) => primitives::statement_set(set, math),
            Block::TwoPart(example) => primitives::two_part(example, math),
        }
    }
}

/// Anchor id of a section: its explicit id, or its slugified heading.
#[must_use]
pub fn section_anchor(section: &Section, index: usize) -> String {
    section.id.as_deref().map_or_else(
        || slugify(section.heading.as_deref().unwrap_or_default(), index),
        escape_html,
    )
}

/// Document preamble through `</head>`.
pub(crate) fn head(title: &str, description: &str, options: &PageOptions) -> Vec<String> {
    let title = escape_html(title);
    let description = escape_html(description);
    let lang = escape_html(options.lang.as_deref().unwrap_or("en"));

    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        format!("<html lang=\"{lang}\">"),
        "<head>".to_string(),
        "<meta charset=\"utf-8\">".to_string(),
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_string(),
        format!("<title>{title}</title>"),
        format!("<meta name=\"description\" content=\"{description}\">"),
        format!("<meta property=\"og:title\" content=\"{title}\">"),
        format!("<meta property=\"og:description\" content=\"{description}\">"),
    ];
    if let Some(site_name) = &options.site_name {
        lines.push(format!(
            "<meta property=\"og:site_name\" content=\"{}\">",
            escape_html(site_name)
        ));
    }
    if let Some(stylesheet) = &options.stylesheet {
        lines.push(format!(
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_html(stylesheet)
        ));
    }
    lines.push("</head>".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{MathBackendKind, create_backend};

    const LESSON: &str = r#"
id: roots-intro
title: "5. Roots and Exponents — 5.1 Introduction"
description: "Core identities for powers & radicals."
chapter: 5. Roots and Exponents
heading: 5.1 Introduction
sections:
  - blocks:
      - type: paragraph
        text: "This chapter is your foundation for powers and radicals."
  - heading: Why this matters
    blocks:
      - type: math
        source: "a^{m/n}=\\sqrt[n]{a^m}"
      - type: callout
        blocks:
          - type: list
            items: ["$a^m a^n = a^{m+n}$", "$(a^m)^n = a^{mn}$"]
  - heading: Quick warm-up
    id: warmup
    blocks:
      - type: multiple_choice
        number: 1
        prompt: "Evaluate $27^{2/3}$."
        options: ["3", "6", "9"]
        correct: "9"
        solution: "$27^{1/3}=3$, so the answer is $3^2=9$."
      - type: example_card
        number: 2
        title: When is a square root an integer?
        statements: ["Is $\\sqrt{18a}$ an integer?", "1) a is a multiple of 2", "2) a is a multiple of 9"]
        correct_letter: E
"#;

    fn lesson() -> Lesson {
        serde_yaml::from_str(LESSON).expect("lesson should parse")
    }

    fn renderer() -> LessonRenderer {
        LessonRenderer::new(
            MathRenderer::new(create_backend(MathBackendKind::Plain)),
            PageOptions {
                stylesheet: Some("/assets/lesson.css".to_string()),
                site_name: Some("GMAT Prep".to_string()),
                lang: None,
            },
        )
    }

    #[test]
    fn test_document_head_metadata() {
        let html = renderer().render_document(&lesson());
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>5. Roots and Exponents — 5.1 Introduction</title>"));
        assert!(html.contains(
            "<meta name=\"description\" content=\"Core identities for powers &amp; radicals.\">"
        ));
        assert!(html.contains("<meta property=\"og:site_name\" content=\"GMAT Prep\">"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/assets/lesson.css\">"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_header_levels() {
        let html = renderer().render_body(&lesson());
        assert!(html.contains("<h1>5. Roots and Exponents</h1>"));
        assert!(html.contains("<h2>5.1 Introduction</h2>"));
    }

    #[test]
    fn test_section_anchors() {
        let html = renderer().render_body(&lesson());
        assert!(html.contains("<section aria-labelledby=\"why-this-matters\">"));
        assert!(html.contains("<h3 id=\"why-this-matters\">Why this matters</h3>"));
        assert!(html.contains("<section aria-labelledby=\"warmup\">"));
    }

    #[test]
    fn test_all_block_kinds_rendered() {
        let html = renderer().render_body(&lesson());
        assert!(html.contains("math-display"));
        assert!(html.contains("callout-must-know"));
        assert!(html.contains("example-mcq"));
        assert!(html.contains("example-ds"));
        assert_eq!(html.matches("<section").count(), 5);
    }

    #[test]
    fn test_callout_wraps_children() {
        let html = renderer().render_body(&lesson());
        let start = html.find("<aside").expect("callout present");
        let end = html.find("</aside>").expect("callout closed");
        assert!(html[start..end].contains("<ul>"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = LessonRenderer::default();
        let lesson = lesson();
        assert_eq!(renderer.render_document(&lesson), renderer.render_document(&lesson));
    }

    #[test]
    fn test_empty_lesson_renders() {
        let lesson = Lesson {
            id: "empty".to_string(),
            title: "Empty".to_string(),
            description: String::new(),
            chapter: None,
            heading: None,
            topic: None,
            tags: vec![],
            sections: vec![],
        };
        let html = renderer().render_body(&lesson);
        assert!(!html.contains("<header"));
        assert!(html.contains("<article class=\"lesson-content\">\n</article>"));
    }

    #[test]
    fn test_section_anchor_fallback() {
        let section = Section {
            id: None,
            heading: Some("∑".to_string()),
            blocks: vec![],
        };
        assert_eq!(section_anchor(&section, 4), "section-4");
    }

    #[test]
    fn test_data_insights_blocks_rendered() {
        let yaml = r#"
id: di
title: Data Insights
description: Table and two-part formats.
sections:
  - blocks:
      - type: statement_set
        number: 3
        prompt: Judge each statement.
        statements:
          - text: The median is 5.
            answer: true
      - type: two_part
        number: 4
        prompt: Pick a minimum and a maximum.
        columns: [Minimum, Maximum]
        options: ["1", "9"]
        correct: ["1", "9"]
"#;
        let lesson: Lesson = serde_yaml::from_str(yaml).expect("lesson should parse");
        let html = renderer().render_body(&lesson);
        assert!(html.contains("id=\"example-3\""));
        assert!(html.contains("example-statements"));
        assert!(html.contains("id=\"example-4\""));
        assert!(html.contains("example-two-part"));
    }

    mod prop {
        use super::*;
        use lessonkit_core::schema::{
            JudgedStatement, MultipleChoiceExample, StatementSet, TwoPartExample,
        };
        use proptest::prelude::*;
        use proptest::prelude::prop;

        fn arb_block() -> impl Strategy<Value = Block> {
            prop_oneof![
                "[ -~]{0,40}".prop_map(|text| Block::Paragraph { text }),
                (
                    1u32..20,
                    "[ -~]{0,20}",
                    prop::collection::vec("[ -~]{0,8}", 0..5),
                    "[ -~]{0,8}",
                )
                    .prop_map(|(number, prompt, options, correct)| {
                        Block::MultipleChoice(MultipleChoiceExample {
                            number,
                            prompt,
                            options,
                            correct,
                            solution: String::new(),
                        })
                    }),
                (1u32..20, prop::collection::vec(("[ -~]{0,16}", any::<bool>()), 0..4)).prop_map(
                    |(number, statements)| {
                        Block::StatementSet(StatementSet {
                            number,
                            title: None,
                            prompt: "Judge each statement.".to_string(),
                            labels: ["Yes".to_string(), "No".to_string()],
                            statements: statements
                                .into_iter()
                                .map(|(text, answer)| JudgedStatement { text, answer })
                                .collect(),
                            solution: String::new(),
                        })
                    }
                ),
                (
                    1u32..20,
                    prop::collection::vec("[ -~]{0,8}", 0..4),
                    "[ -~]{0,8}",
                    "[ -~]{0,8}",
                )
                    .prop_map(|(number, options, left, right)| {
                        Block::TwoPart(TwoPartExample {
                            number,
                            title: None,
                            prompt: "Pick one value per column.".to_string(),
                            columns: ["Left".to_string(), "Right".to_string()],
                            options,
                            correct: [left, right],
                            solution: String::new(),
                        })
                    }),
            ]
        }

        fn arb_lesson() -> impl Strategy<Value = Lesson> {
            (
                "[ -~]{0,30}",
                ".{0,40}",
                prop::collection::vec(
                    (
                        proptest::option::of("[ -~]{0,16}"),
                        prop::collection::vec(arb_block(), 0..4),
                    ),
                    0..4,
                ),
            )
                .prop_map(|(title, description, sections)| Lesson {
                    id: "generated".to_string(),
                    title,
                    description,
                    chapter: None,
                    heading: None,
                    topic: None,
                    tags: vec![],
                    sections: sections
                        .into_iter()
                        .map(|(heading, blocks)| Section {
                            id: None,
                            heading,
                            blocks,
                        })
                        .collect(),
                })
        }

        proptest! {
            #[test]
            fn render_document_is_deterministic(lesson in arb_lesson()) {
                let renderer = LessonRenderer::default();
                let first = renderer.render_document(&lesson);
                prop_assert_eq!(&first, &renderer.render_document(&lesson));
                prop_assert!(first.ends_with("</html>\n"));
            }
        }
    }
}
