use super::*;
use crate::{
    compile::plan::{CaptionSlot, DrawOp},
    meme::model::SourceImage,
    test_support::{gradient_image, system_engine},
};

fn unavailable_font() -> Compositor {
    Compositor::new(FontSource::File("missing/font.ttf".into()))
}

fn loaded(width: u32, height: u32) -> LoadedImage {
    LoadedImage {
        source: SourceImage {
            id: "abc".into(),
            url: "https://cdn.example/abc.jpg".into(),
            width,
            height,
        },
        pixels: gradient_image(width, height),
    }
}

#[test]
fn blank_caption_never_resolves_the_font() {
    let mut c = unavailable_font();
    let frame = c.preview(&gradient_image(64, 48), &CaptionPair::default(), 128).unwrap();
    assert_eq!((frame.width, frame.height), (128, 96));
    assert!(format!("{c:?}").contains("engine_ready: false"));
}

#[test]
fn caption_without_font_fails_with_font_error() {
    let mut c = unavailable_font();
    let err = c
        .preview(&gradient_image(64, 48), &CaptionPair::new("hi", ""), 128)
        .unwrap_err();
    assert!(matches!(err, MemeError::Font(_)), "{err}");
}

#[test]
fn export_carries_stamp_source_and_caption() {
    let mut c = unavailable_font();
    let image = loaded(50, 25);
    let stamp = MemeStamp {
        id: "1700000000123".into(),
        created_at_ms: 1_700_000_000_123,
    };
    let result = c.export(&image, &CaptionPair::default(), 100, stamp).unwrap();
    assert_eq!(result.id, "1700000000123");
    assert_eq!(result.created_at_ms, 1_700_000_000_123);
    assert_eq!(result.source_url, "https://cdn.example/abc.jpg");
    assert_eq!(result.caption, CaptionPair::default());

    let decoded = image::load_from_memory(&result.jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 50));
}

#[test]
fn plan_uses_the_real_engine_for_captions() {
    let Some(engine) = system_engine() else {
        return;
    };
    let mut c = Compositor::with_engine(engine);
    let plan = c.plan(400, 300, &CaptionPair::new("much wow", ""), 800).unwrap();
    assert_eq!(plan.canvas.height, 600);
    assert_eq!(plan.text_ops(CaptionSlot::Top).count(), 2);
    assert_eq!(plan.text_ops(CaptionSlot::Bottom).count(), 0);
    let DrawOp::Text { text, .. } = plan.text_ops(CaptionSlot::Top).next().unwrap() else {
        unreachable!()
    };
    assert_eq!(text, "MUCH WOW");
}

#[test]
fn exported_jpeg_matches_preview_within_quantization() {
    let Some(engine) = system_engine() else {
        return;
    };
    let mut c = Compositor::with_engine(engine);
    let image = loaded(160, 120);
    let caption = CaptionPair::new("top", "bottom");

    let preview = c.preview(&image.pixels, &caption, 320).unwrap();
    let jpeg = c.compose_jpeg(&image.pixels, &caption, 320).unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (preview.width, preview.height));

    let expected = preview.to_rgb8_over_black();
    let total: u64 = expected
        .iter()
        .zip(decoded.as_raw())
        .map(|(a, b)| u64::from(a.abs_diff(*b)))
        .sum();
    let mean = total as f64 / expected.len() as f64;
    assert!(mean < 8.0, "mean channel error {mean}");
}
