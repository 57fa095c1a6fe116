//! Lessons command handlers
//!
//! Implements `lessons list` and `lessons show`.

use crate::cli::args::{LessonsListArgs, LessonsShowArgs, OutputFormat};
use crate::cli::commands::unknown_lesson;
use crate::error::Result;
use crate::library::{self, LessonCategory};

/// List the built-in lessons.
///
/// Displays lessons grouped by category (human) or as a JSON array.
///
/// # Errors
///
/// Returns a JSON error if output serialization fails.
pub fn list(args: &LessonsListArgs) -> Result<()> {
    let results = library::list_lessons(args.category, args.tag.as_deref());

    match args.format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = results
                .iter()
                .map(|l| {
                    serde_json::json!({
                        "name": l.name,
                        "description": l.description,
                        "category": l.category.to_string(),
                        "tags": l.tags,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Human => {
            if results.is_empty() {
                println!("No lessons match the given filters.");
                return Ok(());
            }

            println!("Built-in Lessons ({} available)\n", results.len());

            for cat in LessonCategory::all() {
                let in_cat: Vec<_> = results.iter().filter(|l| l.category == *cat).collect();
                if in_cat.is_empty() {
                    continue;
                }

                println!("  {}", cat.label());
                for l in in_cat {
                    let tags = format!("[{}]", l.tags.join(", "));
                    println!("    {:<28}{:<58}{tags}", l.name, l.description);
                }
                println!();
            }

            println!("Render a lesson: lessonkit render --builtin <name>");
            println!("View YAML:       lessonkit lessons show <name>");
        }
    }

    Ok(())
}

/// Print the YAML source of a built-in lesson.
///
/// # Errors
///
/// Returns a usage error if the lesson name is not found.
pub fn show(args: &LessonsShowArgs) -> Result<()> {
    let lesson = library::find_lesson(&args.name).ok_or_else(|| unknown_lesson(&args.name))?;
    print!("{}", lesson.yaml);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LessonKitError;

    #[test]
    fn test_show_unknown_is_usage_error() {
        let err = show(&LessonsShowArgs {
            name: "nope".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, LessonKitError::Usage(_)));
    }
}
