//! Meme layout compilation.
//!
//! [`compile_meme`] turns (source size, caption, target width) into a backend-agnostic
//! [`MemePlan`]. Preview and export both render plans produced here, so they share every layout
//! constant below.

use crate::{
    assets::text::{TextMeasurer, TextMetrics, single_line},
    foundation::core::{Affine, Canvas, Rgba8},
    foundation::error::{MemeError, MemeResult},
    meme::model::CaptionPair,
};

/// Default output width in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 800;
/// Caption font size. It does not scale with the canvas.
pub const FONT_SIZE_PX: f32 = 48.0;
/// Distance between a caption's em box and the nearest horizontal canvas edge.
pub const EDGE_MARGIN_PX: f64 = 20.0;
/// Captions are limited to `canvas width - SIDE_INSET_PX`.
pub const SIDE_INSET_PX: f64 = 40.0;
/// Outline width of the caption stroke.
pub const STROKE_WIDTH_PX: f64 = 6.0;
pub const STROKE_COLOR: Rgba8 = Rgba8::BLACK;
pub const FILL_COLOR: Rgba8 = Rgba8::WHITE;

/// Which caption line a text op belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptionSlot {
    /// Em-box top anchored [`EDGE_MARGIN_PX`] below the top edge.
    Top,
    /// Em-box bottom anchored [`EDGE_MARGIN_PX`] above the bottom edge.
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextPaint {
    Stroke { width: f64, color: Rgba8 },
    Fill { color: Rgba8 },
}

/// Draw operation emitted by the compiler.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Draw the source image; `transform` maps image pixels onto the canvas.
    Image {
        src_width: u32,
        src_height: u32,
        transform: Affine,
    },
    /// Draw one caption line; `transform` maps Parley layout space onto the canvas.
    Text {
        slot: CaptionSlot,
        text: String,
        size_px: f32,
        paint: TextPaint,
        transform: Affine,
    },
}

/// Backend-agnostic description of one composite.
#[derive(Clone, Debug, PartialEq)]
pub struct MemePlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

impl MemePlan {
    pub fn has_text(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Text { .. }))
    }

    /// Text ops for `slot`, in draw order.
    pub fn text_ops(&self, slot: CaptionSlot) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(move |op| matches!(op, DrawOp::Text { slot: s, .. } if *s == slot))
    }
}

/// Compile the draw ops for `caption` burned into a `src_width x src_height` image scaled to
/// `target_width`.
///
/// Captions are upper-cased and their whitespace flattened to spaces here. An empty caption line emits no ops and is never measured, so a
/// blank caption never needs a font.
#[tracing::instrument(skip(caption, measurer))]
pub fn compile_meme(
    src_width: u32,
    src_height: u32,
    caption: &CaptionPair,
    target_width: u32,
    measurer: &mut dyn TextMeasurer,
) -> MemeResult<MemePlan> {
    let canvas = Canvas::fit_width(src_width, src_height, target_width)?;
    if canvas.width > u32::from(u16::MAX) || canvas.height > u32::from(u16::MAX) {
        return Err(MemeError::validation(format!(
            "canvas {}x{} exceeds the {} px raster limit",
            canvas.width,
            canvas.height,
            u16::MAX
        )));
    }

    let mut ops = vec![DrawOp::Image {
        src_width,
        src_height,
        transform: Affine::scale_non_uniform(
            f64::from(canvas.width) / f64::from(src_width),
            f64::from(canvas.height) / f64::from(src_height),
        ),
    }];

    for (slot, text) in [
        (CaptionSlot::Top, caption.top.as_str()),
        (CaptionSlot::Bottom, caption.bottom.as_str()),
    ] {
        if text.is_empty() {
            continue;
        }
        let text = single_line(&text.to_uppercase());
        let metrics = measurer.measure(&text, FONT_SIZE_PX)?;
        let Some(transform) = place_caption(slot, canvas, metrics) else {
            continue;
        };

        ops.push(DrawOp::Text {
            slot,
            text: text.clone(),
            size_px: FONT_SIZE_PX,
            paint: TextPaint::Stroke {
                width: STROKE_WIDTH_PX,
                color: STROKE_COLOR,
            },
            transform,
        });
        ops.push(DrawOp::Text {
            slot,
            text,
            size_px: FONT_SIZE_PX,
            paint: TextPaint::Fill { color: FILL_COLOR },
            transform,
        });
    }

    Ok(MemePlan { canvas, ops })
}

/// Horizontal compression applied to a line of `advance` pixels under `max_width`.
pub fn condense_factor(advance: f64, max_width: f64) -> f64 {
    if advance > max_width && advance > 0.0 {
        max_width / advance
    } else {
        1.0
    }
}

/// Transform for one caption line, or `None` when the canvas leaves no room for text.
fn place_caption(slot: CaptionSlot, canvas: Canvas, metrics: TextMetrics) -> Option<Affine> {
    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);
    let max_width = width - SIDE_INSET_PX;
    if max_width <= 0.0 {
        return None;
    }

    let advance = f64::from(metrics.advance);
    let scale_x = condense_factor(advance, max_width);
    let left = width / 2.0 - advance * scale_x / 2.0;

    let baseline_y = match slot {
        CaptionSlot::Top => EDGE_MARGIN_PX + f64::from(metrics.ascent),
        CaptionSlot::Bottom => height - EDGE_MARGIN_PX - f64::from(metrics.descent),
    };
    let top = baseline_y - f64::from(metrics.baseline);

    Some(Affine::translate((left, top)) * Affine::scale_non_uniform(scale_x, 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
