//! Build command handler

use crate::cli::args::{BuildArgs, OutputFormat};
use crate::cli::commands::{lesson_renderer, load_sources, math_renderer};
use crate::error::Result;
use crate::site::{SiteOptions, build_site};

/// Build a static site into `--output`.
///
/// # Errors
///
/// Returns a usage error if no lesson source is given, the first lesson
/// load error, or an I/O error if the site cannot be written.
pub fn run(args: &BuildArgs) -> Result<()> {
    let lessons = load_sources(&args.source, math_renderer(&args.render))?;
    let options = SiteOptions {
        title: args.title.clone(),
        renderer: lesson_renderer(&args.render, Some(args.title.clone())),
    };

    let report = build_site(&lessons, &args.output, &options)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => println!(
            "Built {} lesson page(s) into {} ({} files)",
            report.lessons,
            report.output_dir.display(),
            report.files.len()
        ),
    }
    Ok(())
}
