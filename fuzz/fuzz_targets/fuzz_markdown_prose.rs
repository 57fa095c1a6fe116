#![no_main]

use libfuzzer_sys::fuzz_target;
use lessonkit_render::math::{MathRenderer, Strictness};
use lessonkit_render::prose::{math_sources, render_markdown};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let math = MathRenderer::default().with_strictness(Strictness::Ignore);
        let _ = render_markdown(text, &math);
        let _ = math_sources(text);
    }
});
