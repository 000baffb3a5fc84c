use std::borrow::Cow;

use crate::{
    assets::font::MemeFont,
    foundation::error::{MemeError, MemeResult},
};

/// Metrics of a single shaped caption line, in layout pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of the whole line.
    pub advance: f32,
    /// Distance from the baseline up to the top of the em box.
    pub ascent: f32,
    /// Distance from the baseline down to the bottom of the em box.
    pub descent: f32,
    /// Baseline offset from the top of the layout.
    pub baseline: f32,
}

/// Measures caption lines for layout compilation.
///
/// [`TextLayoutEngine`] is the real implementation; tests substitute deterministic measurers.
pub trait TextMeasurer {
    /// Measure `text` as one unwrapped line at `size_px`.
    fn measure(&mut self, text: &str, size_px: f32) -> MemeResult<TextMetrics>;
}

/// Replace every whitespace character (newlines included) with a plain space.
///
/// Parley breaks at hard line breaks even when wrapping is off, so captions are flattened before
/// shaping to stay on one line.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// A shaped, unwrapped caption line ready for rasterization.
pub struct ShapedLine {
    pub layout: parley::Layout<()>,
    pub metrics: TextMetrics,
}

/// Shapes caption lines with one registered font using Parley.
pub struct TextLayoutEngine {
    font: MemeFont,
    family_name: String,
    blob: vello_cpu::peniko::Blob<u8>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl TextLayoutEngine {
    /// Register `font` in a fresh Parley context.
    pub fn new(font: MemeFont) -> MemeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        // A collection registers one family per face group; shape with the one holding our face.
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| MemeError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::font("registered font family has no name"))?
            .to_string();

        let blob = vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone());

        Ok(Self {
            font,
            family_name,
            blob,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// Font this engine shapes with.
    pub fn font(&self) -> &MemeFont {
        &self.font
    }

    /// Family name Parley resolved from the font bytes.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Glyph source for the rasterizer: face `index` of the registered font bytes.
    ///
    /// Glyph ids from a shaped run are only valid for the face that run was shaped with, so
    /// callers pass `run.font().index`.
    pub fn face_data(&self, index: u32) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(self.blob.clone(), index)
    }

    /// Shape `text` as a single bold line. Lines are never wrapped.
    pub fn shape_line(&mut self, text: &str, size_px: f32) -> MemeResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MemeError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let text = single_line(text);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));

        let mut layout: parley::Layout<()> = builder.build(&text);
        layout.break_all_lines(None);

        let metrics = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                TextMetrics {
                    advance: m.advance,
                    ascent: m.ascent,
                    descent: m.descent,
                    baseline: m.baseline,
                }
            })
            .unwrap_or_default();

        Ok(ShapedLine { layout, metrics })
    }
}

impl TextMeasurer for TextLayoutEngine {
    fn measure(&mut self, text: &str, size_px: f32) -> MemeResult<TextMetrics> {
        Ok(self.shape_line(text, size_px)?.metrics)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
