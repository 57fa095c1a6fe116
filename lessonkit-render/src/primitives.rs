//! Reusable presentational components.
//!
//! Each function is a pure mapping from authored data to an HTML fragment.
//! Answers are shown exactly as authored; nothing is evaluated.

use lessonkit_core::answer::{DsAnswer, option_label};
use lessonkit_core::schema::{
    ExampleCard, Image, ListBlock, MultipleChoiceExample, Quote, StatementSet, Table,
    TwoPartExample,
};

use crate::escape::escape_html;
use crate::math::MathRenderer;
use crate::prose::{render_inline, render_markdown};

/// Default callout heading.
pub const MUST_KNOW: &str = "Must know";

/// Wrap already-rendered content in a "must know" callout box.
#[must_use]
pub fn callout(title: Option<&str>, inner_html: &str) -> String {
    let title = escape_html(title.unwrap_or(MUST_KNOW));
    [
        "<aside class=\"callout callout-must-know\" role=\"note\">".to_string(),
        format!("<p class=\"callout-title\">{title}</p>"),
        "<div class=\"callout-body\">".to_string(),
        inner_html.trim_end().to_string(),
        "</div>".to_string(),
        "</aside>".to_string(),
    ]
    .join("\n")
}

/// Render a numbered multiple-choice example with a collapsible solution.
#[must_use]
pub fn multiple_choice(example: &MultipleChoiceExample, math: &MathRenderer) -> String {
    let correct_index = example.correct_index();
    let mut lines = Vec::new();

    lines.push(format!(
        "<section class=\"example example-mcq\" id=\"example-{n}\" data-example=\"{n}\">",
        n = example.number
    ));
    lines.push(format!(
        "<p class=\"example-number\">Example {}</p>",
        example.number
    ));
    lines.push("<div class=\"example-prompt\">".to_string());
    lines.push(render_markdown(&example.prompt, math).trim_end().to_string());
    lines.push("</div>".to_string());

    lines.push("<ol class=\"options\" type=\"A\">".to_string());
    for (i, option) in example.options.iter().enumerate() {
        let label = option_label(i);
        let body = render_inline(option, math);
        if correct_index == Some(i) {
            lines.push(format!(
                "<li class=\"option option-correct\" data-option=\"{label}\" data-correct=\"true\">{body}</li>"
            ));
        } else {
            lines.push(format!(
                "<li class=\"option\" data-option=\"{label}\">{body}</li>"
            ));
        }
    }
    lines.push("</ol>".to_string());

    let answer = correct_index.map_or_else(
        || render_inline(&example.correct, math),
        |i| format!("({}) {}", option_label(i), render_inline(&example.options[i], math)),
    );
    push_solution(&mut lines, &answer, &example.solution, math);

    lines.push("</section>".to_string());
    lines.join("\n")
}

/// Render a numbered data-sufficiency example card.
#[must_use]
pub fn example_card(card: &ExampleCard, math: &MathRenderer) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "<section class=\"example example-ds\" id=\"example-{n}\" data-example=\"{n}\">",
        n = card.number
    ));
    lines.push(format!(
        "<p class=\"example-number\">Example {}</p>",
        card.number
    ));
    lines.push(format!(
        "<h4 class=\"example-title\">{}</h4>",
        render_inline(&card.title, math)
    ));

    let mut statements = card.statements.iter();
    if let Some(stem) = statements.next() {
        lines.push(format!(
            "<p class=\"ds-stem\">{}</p>",
            render_inline(stem, math)
        ));
    }
    let rest: Vec<&String> = statements.collect();
    if !rest.is_empty() {
        lines.push("<ul class=\"ds-statements\">".to_string());
        for statement in rest {
            let (marker, body) = split_marker(statement);
            let body = render_inline(body, math);
            match marker {
                Some(marker) => lines.push(format!(
                    "<li><span class=\"ds-marker\">{}</span> {body}</li>",
                    escape_html(marker)
                )),
                None => lines.push(format!("<li>{body}</li>")),
            }
        }
        lines.push("</ul>".to_string());
    }

    lines.push("<ol class=\"ds-choices\" type=\"A\">".to_string());
    for choice in DsAnswer::all() {
        lines.push(format!(
            "<li data-option=\"{}\">{}</li>",
            choice.letter(),
            escape_html(choice.meaning())
        ));
    }
    lines.push("</ol>".to_string());

    let answer = card
        .answer()
        .map_or_else(|| escape_html(card.correct_letter.trim()), |a| a.to_string());
    push_solution(&mut lines, &answer, &card.solution, math);

    lines.push("</section>".to_string());
    lines.join("\n")
}

/// Render a table-analysis statement set: one row per statement with a
/// column for each judgement label.
#[must_use]
pub fn statement_set(set: &StatementSet, math: &MathRenderer) -> String {
    let mut lines = example_header("example-statements", set.number, set.title.as_deref(), math);
    lines.push("<div class=\"example-prompt\">".to_string());
    lines.push(render_markdown(&set.prompt, math).trim_end().to_string());
    lines.push("</div>".to_string());

    let labels = set.labels.each_ref().map(|l| render_inline(l, math));
    lines.push("<table class=\"statements\">".to_string());
    lines.push("<thead>".to_string());
    lines.push(format!(
        "<tr><th scope=\"col\">{}</th><th scope=\"col\">{}</th><th scope=\"col\">Statement</th></tr>",
        labels[0], labels[1]
    ));
    lines.push("</thead>".to_string());
    lines.push("<tbody>".to_string());
    for (i, statement) in set.statements.iter().enumerate() {
        let (yes, no) = if statement.answer {
            (" data-correct=\"true\"", "")
        } else {
            ("", " data-correct=\"true\"")
        };
        lines.push(format!("<tr data-statement=\"{}\">", i + 1));
        lines.push(format!("<td class=\"judgement\"{yes}></td>"));
        lines.push(format!("<td class=\"judgement\"{no}></td>"));
        lines.push(format!("<td>{}</td>", render_inline(&statement.text, math)));
        lines.push("</tr>".to_string());
    }
    lines.push("</tbody>".to_string());
    lines.push("</table>".to_string());

    let answer = set
        .answer_labels()
        .iter()
        .map(|l| render_inline(l, math))
        .collect::<Vec<_>>()
        .join(", ");
    push_solution(&mut lines, &answer, &set.solution, math);

    lines.push("</section>".to_string());
    lines.join("\n")
}

/// Render a two-part analysis example: a shared option list with one
/// selection column per part.
#[must_use]
pub fn two_part(example: &TwoPartExample, math: &MathRenderer) -> String {
    let correct = example.correct_indices();
    let mut lines = example_header("example-two-part", example.number, example.title.as_deref(), math);
    lines.push("<div class=\"example-prompt\">".to_string());
    lines.push(render_markdown(&example.prompt, math).trim_end().to_string());
    lines.push("</div>".to_string());

    let columns = example.columns.each_ref().map(|c| render_inline(c, math));
    lines.push("<table class=\"two-part\">".to_string());
    lines.push("<thead>".to_string());
    lines.push(format!(
        "<tr><th scope=\"col\">{}</th><th scope=\"col\">{}</th><th scope=\"col\">Value</th></tr>",
        columns[0], columns[1]
    ));
    lines.push("</thead>".to_string());
    lines.push("<tbody>".to_string());
    for (i, option) in example.options.iter().enumerate() {
        lines.push(format!("<tr data-option=\"{}\">", option_label(i)));
        for column in correct {
            if column == Some(i) {
                lines.push("<td class=\"selector\" data-correct=\"true\"></td>".to_string());
            } else {
                lines.push("<td class=\"selector\"></td>".to_string());
            }
        }
        lines.push(format!("<td>{}</td>", render_inline(option, math)));
        lines.push("</tr>".to_string());
    }
    lines.push("</tbody>".to_string());
    lines.push("</table>".to_string());

    let answer = columns
        .iter()
        .zip(&example.correct)
        .map(|(column, value)| format!("{column}: {}", render_inline(value, math)))
        .collect::<Vec<_>>()
        .join("; ");
    push_solution(&mut lines, &answer, &example.solution, math);

    lines.push("</section>".to_string());
    lines.join("\n")
}

fn example_header(class: &str, number: u32, title: Option<&str>, math: &MathRenderer) -> Vec<String> {
    let mut lines = vec![
        format!("<section class=\"example {class}\" id=\"example-{number}\" data-example=\"{number}\">"),
        format!("<p class=\"example-number\">Example {number}</p>"),
    ];
    if let Some(title) = title {
        lines.push(format!(
            "<h4 class=\"example-title\">{}</h4>",
            render_inline(title, math)
        ));
    }
    lines
}

/// Split a leading statement marker such as `1)` or `(2)` from its text.
///
/// Markdown would otherwise read `1) ...` as an ordered list.
fn split_marker(statement: &str) -> (Option<&str>, &str) {
    let trimmed = statement.trim_start();
    let digits_start = usize::from(trimmed.starts_with('('));
    let digits = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return (None, statement);
    }
    let end = digits_start + digits;
    let closer = trimmed[end..].chars().next();
    let marker_end = match (digits_start, closer) {
        (1, Some(')')) | (0, Some(')' | '.')) => end + 1,
        _ => return (None, statement),
    };
    (Some(&trimmed[..marker_end]), trimmed[marker_end..].trim_start())
}

fn push_solution(lines: &mut Vec<String>, answer_html: &str, solution: &str, math: &MathRenderer) {
    lines.push("<details class=\"solution\">".to_string());
    lines.push("<summary>Show solution</summary>".to_string());
    lines.push(format!(
        "<p class=\"solution-answer\"><strong>Answer:</strong> {answer_html}</p>"
    ));
    if !solution.trim().is_empty() {
        lines.push(render_markdown(solution, math).trim_end().to_string());
    }
    lines.push("</details>".to_string());
}

/// Render a bulleted or numbered list.
#[must_use]
pub fn list(block: &ListBlock, math: &MathRenderer) -> String {
    let tag = if block.ordered { "ol" } else { "ul" };
    let mut lines = vec![format!("<{tag}>")];
    for item in &block.items {
        lines.push(format!("<li>{}</li>", render_inline(item, math)));
    }
    lines.push(format!("</{tag}>"));
    lines.join("\n")
}

/// Render a table with an optional caption.
#[must_use]
pub fn table(block: &Table, math: &MathRenderer) -> String {
    let mut lines = vec!["<table>".to_string()];
    if let Some(caption) = &block.caption {
        lines.push(format!("<caption>{}</caption>", render_inline(caption, math)));
    }
    if !block.header.is_empty() {
        lines.push("<thead>".to_string());
        lines.push("<tr>".to_string());
        for cell in &block.header {
            lines.push(format!(
                "<th scope=\"col\">{}</th>",
                render_inline(cell, math)
            ));
        }
        lines.push("</tr>".to_string());
        lines.push("</thead>".to_string());
    }
    lines.push("<tbody>".to_string());
    for row in &block.rows {
        lines.push("<tr>".to_string());
        for cell in row {
            lines.push(format!("<td>{}</td>", render_inline(cell, math)));
        }
        lines.push("</tr>".to_string());
    }
    lines.push("</tbody>".to_string());
    lines.push("</table>".to_string());
    lines.join("\n")
}

/// Render an externally hosted image as a figure.
#[must_use]
pub fn image(block: &Image, math: &MathRenderer) -> String {
    let mut attrs = format!(
        "src=\"{}\" alt=\"{}\"",
        escape_html(&block.src),
        escape_html(&block.alt)
    );
    if let Some(width) = block.width {
        attrs.push_str(&format!(" width=\"{width}\""));
    }
    if let Some(height) = block.height {
        attrs.push_str(&format!(" height=\"{height}\""));
    }

    let mut lines = vec![
        "<figure class=\"figure-image\">".to_string(),
        format!("<img {attrs} loading=\"lazy\">"),
    ];
    if let Some(caption) = &block.caption {
        lines.push(format!(
            "<figcaption>{}</figcaption>",
            render_inline(caption, math)
        ));
    }
    lines.push("</figure>".to_string());
    lines.join("\n")
}

/// Render a quotation with optional attribution.
#[must_use]
pub fn quote(block: &Quote, math: &MathRenderer) -> String {
    let mut lines = vec![
        "<figure class=\"figure-quote\">".to_string(),
        format!(
            "<blockquote>{}</blockquote>",
            render_inline(&block.text, math)
        ),
    ];
    if let Some(attribution) = &block.attribution {
        lines.push(format!(
            "<figcaption>{}</figcaption>",
            render_inline(attribution, math)
        ));
    }
    lines.push("</figure>".to_string());
    lines.join("\n")
}
