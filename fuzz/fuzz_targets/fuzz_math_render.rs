#![no_main]

use libfuzzer_sys::fuzz_target;
use lessonkit_render::math::{MathMode, MathRenderer, Strictness};

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let math = MathRenderer::default().with_strictness(Strictness::Ignore);
        let _ = math.render(source, MathMode::Inline);
        let _ = math.render(source, MathMode::Display);
    }
});
