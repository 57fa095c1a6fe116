//! CLI argument definitions
//!
//! All Clap derive structs for `lessonkit` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use lessonkit_render::math::{MathBackendKind, Strictness};

use crate::library::LessonCategory;
use crate::observability::LogFormat;
use crate::server::DEFAULT_BIND;
use crate::site::DEFAULT_SITE_TITLE;

// ============================================================================
// Root CLI
// ============================================================================

/// Render, validate and serve GMAT prep lessons.
#[derive(Parser, Debug)]
#[command(name = "lessonkit", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "LESSONKIT_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormatArg,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the built-in lesson library.
    Lessons(LessonsCommand),

    /// Validate lesson files without rendering them.
    Validate(ValidateArgs),

    /// Render a single lesson to HTML.
    Render(RenderArgs),

    /// Build a static site from a set of lessons.
    Build(BuildArgs),

    /// Serve rendered lessons over HTTP for preview.
    Serve(ServeArgs),

    /// Render one math expression to stdout.
    Math(MathArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Lessons Command
// ============================================================================

/// Built-in library commands.
#[derive(Args, Debug)]
pub struct LessonsCommand {
    /// Lessons subcommand.
    #[command(subcommand)]
    pub subcommand: LessonsSubcommand,
}

/// Built-in library subcommands.
#[derive(Subcommand, Debug)]
pub enum LessonsSubcommand {
    /// List built-in lessons.
    List(LessonsListArgs),

    /// Print the YAML source of a built-in lesson.
    Show(LessonsShowArgs),
}

/// Arguments for `lessons list`.
#[derive(Args, Debug)]
pub struct LessonsListArgs {
    /// Only list lessons in this category.
    #[arg(long)]
    pub category: Option<LessonCategory>,

    /// Only list lessons with this tag.
    #[arg(long)]
    pub tag: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `lessons show`.
#[derive(Args, Debug)]
pub struct LessonsShowArgs {
    /// Built-in lesson name.
    pub name: String,
}

// ============================================================================
// Validate / Render / Build / Serve
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Lesson files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,

    /// Math backend used to check that expressions render.
    #[arg(long, default_value = "mathml")]
    pub math: MathBackendArg,
}

/// Rendering flags shared by `render`, `build` and `serve`.
#[derive(Args, Debug, Clone)]
pub struct RenderFlags {
    /// Stylesheet URL linked from every page.
    #[arg(long, env = "LESSONKIT_STYLESHEET")]
    pub stylesheet: Option<String>,

    /// Math backend.
    #[arg(long, default_value = "mathml")]
    pub math: MathBackendArg,

    /// What to do when an expression cannot be rendered.
    #[arg(long, default_value = "warn")]
    pub math_fallback: MathFallbackArg,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("source").required(true).multiple(false))]
pub struct RenderArgs {
    /// Lesson file to render.
    #[arg(group = "source")]
    pub file: Option<PathBuf>,

    /// Built-in lesson to render.
    #[arg(long, group = "source")]
    pub builtin: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit only the `<main>` element.
    #[arg(long)]
    pub fragment: bool,

    /// Shared rendering flags.
    #[command(flatten)]
    pub render: RenderFlags,
}

/// Where `build` and `serve` take lessons from.
#[derive(Args, Debug, Clone)]
pub struct LessonSource {
    /// Directory of lesson YAML files (searched recursively).
    #[arg(long, env = "LESSONKIT_LESSONS")]
    pub lessons: Option<PathBuf>,

    /// Include the built-in lessons.
    #[arg(long)]
    pub builtin: bool,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Lesson sources.
    #[command(flatten)]
    pub source: LessonSource,

    /// Output directory.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Index page title.
    #[arg(long, default_value = DEFAULT_SITE_TITLE)]
    pub title: String,

    /// Print a JSON build report to stdout.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Shared rendering flags.
    #[command(flatten)]
    pub render: RenderFlags,
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Lesson sources.
    #[command(flatten)]
    pub source: LessonSource,

    /// Bind address as `[host:]port`.
    #[arg(long, default_value = DEFAULT_BIND, env = "LESSONKIT_BIND")]
    pub bind: String,

    /// Expose Prometheus metrics on `127.0.0.1:<port>`.
    #[arg(long)]
    pub metrics_port: Option<u16>,

    /// Index page title.
    #[arg(long, default_value = DEFAULT_SITE_TITLE)]
    pub title: String,

    /// Shared rendering flags.
    #[command(flatten)]
    pub render: RenderFlags,
}

/// Arguments for `math`.
#[derive(Args, Debug)]
pub struct MathArgs {
    /// LaTeX source.
    pub expr: String,

    /// Render in display (block) mode.
    #[arg(long)]
    pub display: bool,

    /// Math backend.
    #[arg(long, default_value = "mathml")]
    pub math: MathBackendArg,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Math backend flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MathBackendArg {
    /// LaTeX to MathML.
    #[default]
    #[value(name = "mathml")]
    MathMl,
    /// Escaped LaTeX source.
    Plain,
}

impl From<MathBackendArg> for MathBackendKind {
    fn from(arg: MathBackendArg) -> Self {
        match arg {
            MathBackendArg::MathMl => Self::MathMl,
            MathBackendArg::Plain => Self::Plain,
        }
    }
}

/// Math fallback flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MathFallbackArg {
    /// Fall back silently.
    Ignore,
    /// Fall back and log a warning.
    #[default]
    Warn,
}

impl From<MathFallbackArg> for Strictness {
    fn from(arg: MathFallbackArg) -> Self {
        match arg {
            MathFallbackArg::Ignore => Self::Ignore,
            MathFallbackArg::Warn => Self::Warn,
        }
    }
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_file() {
        let cli = Cli::try_parse_from(["lessonkit", "render", "median.yaml"]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_render_builtin() {
        let cli = Cli::try_parse_from(["lessonkit", "render", "--builtin", "ratios-part-to-whole"]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_render_requires_one_source() {
        assert!(Cli::try_parse_from(["lessonkit", "render"]).is_err());
        assert!(
            Cli::try_parse_from(["lessonkit", "render", "a.yaml", "--builtin", "b"]).is_err(),
            "Expected mutual exclusion error"
        );
    }

    #[test]
    fn test_validate_requires_files() {
        assert!(Cli::try_parse_from(["lessonkit", "validate"]).is_err());
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["lessonkit", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["lessonkit", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["lessonkit", "build", "--builtin", "-o", "site"]).unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("Expected BuildArgs");
        };
        assert!(args.source.builtin);
        assert_eq!(args.title, DEFAULT_SITE_TITLE);
        assert_eq!(args.render.math, MathBackendArg::MathMl);
        assert_eq!(args.render.math_fallback, MathFallbackArg::Warn);
    }

    #[test]
    fn test_serve_bind_default() {
        let cli = Cli::try_parse_from(["lessonkit", "serve", "--builtin"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("Expected ServeArgs");
        };
        assert_eq!(args.bind, DEFAULT_BIND);
        assert!(args.metrics_port.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lessonkit",
            "lessons",
            "list",
            "-vv",
            "--log-format",
            "json",
            "--color",
            "never",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormatArg::Json);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_category_values() {
        let cli =
            Cli::try_parse_from(["lessonkit", "lessons", "list", "--category", "data-insights"])
                .unwrap();
        let Commands::Lessons(cmd) = cli.command else {
            panic!("Expected lessons command");
        };
        let LessonsSubcommand::List(args) = cmd.subcommand else {
            panic!("Expected list");
        };
        assert_eq!(args.category, Some(LessonCategory::DataInsights));
    }

    #[test]
    fn test_math_backend_conversion() {
        assert_eq!(MathBackendKind::from(MathBackendArg::Plain), MathBackendKind::Plain);
        assert_eq!(Strictness::from(MathFallbackArg::Ignore), Strictness::Ignore);
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
