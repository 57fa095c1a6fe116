#![no_main]

use libfuzzer_sys::fuzz_target;
use lessonkit::config::loader::LessonLoader;
use lessonkit_render::LessonRenderer;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = LessonLoader::with_defaults();

        // Anything that loads must also render
        if let Ok(loaded) = loader.load_from_str(yaml_str, "fuzz") {
            let _ = LessonRenderer::default().render_document(&loaded.lesson);
        }
    }
});
