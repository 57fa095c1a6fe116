//! Every built-in lesson must load, validate and render with both math
//! backends.

use lessonkit::config::loader::{LessonLimits, LessonLoader, LoaderOptions};
use lessonkit::library;
use lessonkit_render::math::{MathBackendKind, MathRenderer, create_backend};
use lessonkit_render::{LessonRenderer, PageOptions};

fn renderer(kind: MathBackendKind) -> LessonRenderer {
    LessonRenderer::new(
        MathRenderer::new(create_backend(kind)),
        PageOptions::default(),
    )
}

fn loader(kind: MathBackendKind) -> LessonLoader {
    LessonLoader::new(LoaderOptions {
        limits: LessonLimits::default(),
        strict: false,
    })
    .with_math(MathRenderer::new(create_backend(kind)))
}

#[test]
fn builtin_lessons_render_with_mathml() {
    let renderer = renderer(MathBackendKind::MathMl);
    for loaded in library::load_all(&loader(MathBackendKind::MathMl)).unwrap() {
        let html = renderer.render_document(&loaded.lesson);
        assert!(html.starts_with("<!DOCTYPE html>"), "{}", loaded.origin);
        assert!(html.ends_with("</html>\n"), "{}", loaded.origin);
        assert!(
            html.contains(&format!("data-lesson=\"{}\"", loaded.lesson.id)),
            "{}",
            loaded.origin
        );
    }
}

#[test]
fn builtin_rendering_is_deterministic() {
    let renderer = renderer(MathBackendKind::MathMl);
    for loaded in library::load_all(&loader(MathBackendKind::MathMl)).unwrap() {
        assert_eq!(
            renderer.render_document(&loaded.lesson),
            renderer.render_document(&loaded.lesson),
            "{} renders differently on a second pass",
            loaded.origin
        );
    }
}

#[test]
fn every_example_is_rendered() {
    let renderer = renderer(MathBackendKind::Plain);
    for loaded in library::load_all(&loader(MathBackendKind::Plain)).unwrap() {
        let html = renderer.render_body(&loaded.lesson);
        for example in loaded.lesson.examples() {
            let marker = format!("Example {}", example.number());
            assert!(html.contains(&marker), "{}: {marker} missing", loaded.origin);
        }
    }
}

#[test]
fn builtin_lessons_have_no_warnings() {
    for loaded in library::load_all(&loader(MathBackendKind::Plain)).unwrap() {
        assert!(
            loaded.warnings.is_empty(),
            "{}: {:?}",
            loaded.origin,
            loaded.warnings
        );
    }
}
