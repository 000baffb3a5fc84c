//! Shared fixtures for unit tests.

use std::io::Cursor;

use crate::{
    assets::{
        decode::DecodedImage,
        font::FontSource,
        text::{TextLayoutEngine, TextMeasurer, TextMetrics},
    },
    foundation::error::MemeResult,
};

/// Text engine over a system font, or `None` on machines without usable fonts.
pub(crate) fn system_engine() -> Option<TextLayoutEngine> {
    let engine = FontSource::System
        .resolve()
        .and_then(TextLayoutEngine::new);
    match engine {
        Ok(engine) => Some(engine),
        Err(e) => {
            eprintln!("skipping font-dependent test: {e}");
            None
        }
    }
}

/// Monospaced stand-in measurer: every char advances `advance_per_char` pixels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedMeasurer {
    pub advance_per_char: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self {
            advance_per_char: 30.0,
            ascent: 44.0,
            descent: 12.0,
        }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&mut self, text: &str, _size_px: f32) -> MemeResult<TextMetrics> {
        Ok(TextMetrics {
            advance: self.advance_per_char * text.chars().count() as f32,
            ascent: self.ascent,
            descent: self.descent,
            baseline: self.ascent,
        })
    }
}

/// Opaque horizontal gradient, premultiplied (alpha is 255 so it equals straight RGBA).
pub(crate) fn gradient_image(width: u32, height: u32) -> DecodedImage {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            data.extend_from_slice(&[r, g, 96, 255]);
        }
    }
    DecodedImage::from_premul_rgba8(width, height, data).unwrap()
}

pub(crate) fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
