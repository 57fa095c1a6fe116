//! Static site builder
//!
//! Renders a set of lessons into an output directory:
//!
//! ```text
//! <out>/index.html
//! <out>/lessons/<id>.html
//! <out>/lessons.json
//! <out>/assets/lesson.css   (unless an external stylesheet is given)
//! ```
//!
//! Output depends only on the lessons and options: lessons are ordered by
//! id and nothing time-dependent is written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use lessonkit_core::Lesson;
use lessonkit_render::index::lesson_href;
use lessonkit_render::{LessonRenderer, render_index};
use serde::Serialize;

use crate::error::{LessonError, Result};
use crate::observability::metrics;

/// Default stylesheet bundled with the binary.
pub const DEFAULT_STYLESHEET_CSS: &str = include_str!("../assets/lesson.css");

/// Site path of the bundled stylesheet.
pub const DEFAULT_STYLESHEET_HREF: &str = "/assets/lesson.css";

/// Default index page title.
pub const DEFAULT_SITE_TITLE: &str = "GMAT Lessons";

// ============================================================================
// Types
// ============================================================================

/// Options for rendering a site.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    /// Title of the index page.
    pub title: String,

    /// Renderer shared by every page.
    pub renderer: LessonRenderer,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_SITE_TITLE.to_string(),
            renderer: LessonRenderer::default(),
        }
    }
}

/// One `lessons.json` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Lesson id.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Page description.
    pub description: String,
    /// Index topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Number of worked examples.
    pub examples: usize,
    /// Page path relative to the site root.
    pub path: String,
}

impl ManifestEntry {
    /// Builds the manifest entry for a lesson.
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            topic: lesson.topic.clone(),
            tags: lesson.tags.clone(),
            examples: lesson.examples().len(),
            path: lesson_href(&lesson.id),
        }
    }
}

/// A fully rendered site held in memory.
#[derive(Debug, Clone)]
pub struct RenderedSite {
    /// Index document.
    pub index: String,
    /// Lesson documents keyed by lesson id.
    pub pages: BTreeMap<String, String>,
    /// Manifest entries in id order.
    pub manifest: Vec<ManifestEntry>,
}

/// Summary of a build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Every file written, relative to `output_dir`, in write order.
    pub files: Vec<PathBuf>,
    /// Number of lesson pages.
    pub lessons: usize,
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders every page of the site in memory.
#[must_use]
pub fn render_site(lessons: &[Arc<Lesson>], options: &SiteOptions) -> RenderedSite {
    let mut sorted: Vec<&Lesson> = lessons.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let renderer = &options.renderer;
    let pages = sorted
        .iter()
        .map(|lesson| (lesson.id.clone(), renderer.render_document(lesson)))
        .collect();
    let manifest = sorted.iter().map(|l| ManifestEntry::from_lesson(l)).collect();
    let index = render_index(sorted.iter().copied(), &options.title, renderer.options());

    RenderedSite {
        index,
        pages,
        manifest,
    }
}

/// Renders `lessons` and writes the site into `output_dir`.
///
/// The bundled stylesheet is written only when the renderer links to
/// [`DEFAULT_STYLESHEET_HREF`].
///
/// # Errors
///
/// Returns `DuplicateId` if two lessons share an id, or an I/O error if the
/// output cannot be written.
pub fn build_site(
    lessons: &[Arc<Lesson>],
    output_dir: &Path,
    options: &SiteOptions,
) -> Result<BuildReport> {
    let started = Instant::now();
    check_duplicate_ids(lessons)?;

    let site = render_site(lessons, options);
    let mut files = Vec::new();

    std::fs::create_dir_all(output_dir.join("lessons"))?;

    write_file(output_dir, Path::new("index.html"), &site.index, &mut files)?;
    for (id, html) in &site.pages {
        write_file(output_dir, &PathBuf::from(lesson_href(id)), html, &mut files)?;
    }

    let mut manifest = serde_json::to_string_pretty(&site.manifest)?;
    manifest.push('\n');
    write_file(output_dir, Path::new("lessons.json"), &manifest, &mut files)?;

    if options.renderer.options().stylesheet.as_deref() == Some(DEFAULT_STYLESHEET_HREF) {
        std::fs::create_dir_all(output_dir.join("assets"))?;
        write_file(
            output_dir,
            Path::new("assets/lesson.css"),
            DEFAULT_STYLESHEET_CSS,
            &mut files,
        )?;
    }

    metrics::record_site_build(started.elapsed());
    tracing::info!(
        output = %output_dir.display(),
        lessons = site.pages.len(),
        files = files.len(),
        "site built"
    );

    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        files,
        lessons: site.pages.len(),
    })
}

fn write_file(root: &Path, relative: &Path, content: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    std::fs::write(root.join(relative), content)?;
    tracing::debug!(file = %relative.display(), bytes = content.len(), "wrote file");
    files.push(relative.to_path_buf());
    Ok(())
}

fn check_duplicate_ids(lessons: &[Arc<Lesson>]) -> std::result::Result<(), LessonError> {
    let mut seen = BTreeMap::new();
    for (i, lesson) in lessons.iter().enumerate() {
        if let Some(first) = seen.insert(lesson.id.as_str(), i) {
            return Err(LessonError::DuplicateId {
                id: lesson.id.clone(),
                first: format!("lesson #{}", first + 1),
                second: format!("lesson #{}", i + 1),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonkit_core::schema::{Block, Section};
    use lessonkit_render::PageOptions;
    use lessonkit_render::math::{MathBackendKind, MathRenderer, create_backend};

    fn lesson(id: &str, topic: Option<&str>) -> Arc<Lesson> {
        Arc::new(Lesson {
            id: id.to_string(),
            title: format!("Lesson {id}"),
            description: "A lesson.".to_string(),
            chapter: None,
            heading: None,
            topic: topic.map(String::from),
            tags: vec!["t".to_string()],
            sections: vec![Section {
                id: None,
                heading: None,
                blocks: vec![Block::Paragraph {
                    text: "Body of $x^2$.".to_string(),
                }],
            }],
        })
    }

    fn options(stylesheet: Option<&str>) -> SiteOptions {
        SiteOptions {
            title: "Test Site".to_string(),
            renderer: LessonRenderer::new(
                MathRenderer::new(create_backend(MathBackendKind::Plain)),
                PageOptions {
                    stylesheet: stylesheet.map(String::from),
                    ..PageOptions::default()
                },
            ),
        }
    }

    #[test]
    fn test_render_site_orders_by_id() {
        let site = render_site(&[lesson("b", None), lesson("a", Some("Ratios"))], &options(None));
        let ids: Vec<_> = site.pages.keys().cloned().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(site.manifest[0].id, "a");
        assert_eq!(site.manifest[0].path, "lessons/a.html");
        assert!(site.index.contains("<h1>Test Site</h1>"));
    }

    #[test]
    fn test_build_site_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let lessons = [lesson("median", Some("Statistics")), lesson("ratios", None)];
        let report = build_site(&lessons, dir.path(), &options(Some(DEFAULT_STYLESHEET_HREF))).unwrap();

        assert_eq!(report.lessons, 2);
        assert_eq!(
            report.files,
            vec![
                PathBuf::from("index.html"),
                PathBuf::from("lessons/median.html"),
                PathBuf::from("lessons/ratios.html"),
                PathBuf::from("lessons.json"),
                PathBuf::from("assets/lesson.css"),
            ]
        );
        for file in &report.files {
            assert!(dir.path().join(file).is_file(), "{} missing", file.display());
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("lessons.json")).unwrap())
                .unwrap();
        assert_eq!(manifest[0]["id"], "median");
        assert_eq!(manifest[0]["topic"], "Statistics");
        assert!(manifest[1].get("topic").is_none());
    }

    #[test]
    fn test_external_stylesheet_skips_bundled_css() {
        let dir = tempfile::tempdir().unwrap();
        let report = build_site(
            &[lesson("a", None)],
            dir.path(),
            &options(Some("https://cdn.example.com/site.css")),
        )
        .unwrap();
        assert!(!report.files.contains(&PathBuf::from("assets/lesson.css")));
        assert!(!dir.path().join("assets").exists());
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let lessons = [lesson("a", None), lesson("b", Some("x"))];
        let report = build_site(&lessons, first.path(), &options(None)).unwrap();
        build_site(&lessons, second.path(), &options(None)).unwrap();

        for file in &report.files {
            assert_eq!(
                std::fs::read(first.path().join(file)).unwrap(),
                std::fs::read(second.path().join(file)).unwrap(),
                "{} differs between builds",
                file.display()
            );
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_site(&[lesson("a", None), lesson("a", None)], dir.path(), &options(None))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate lesson id 'a'"), "{err}");
    }
}
