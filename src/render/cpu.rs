//! CPU execution of a [`MemePlan`] with `vello_cpu`.

use std::sync::Arc;

use crate::{
    assets::{decode::DecodedImage, text::TextLayoutEngine},
    compile::plan::{DrawOp, MemePlan, TextPaint},
    foundation::core::{Affine, Rgba8},
    foundation::error::{MemeError, MemeResult},
    render::backend::FrameRGBA,
};

/// Rasterize `plan` over `image`.
///
/// `engine` is only consulted for text ops; a plan with captions and no engine is a font error.
#[tracing::instrument(skip_all, fields(w = plan.canvas.width, h = plan.canvas.height, ops = plan.ops.len()))]
pub fn render_plan(
    plan: &MemePlan,
    image: &DecodedImage,
    mut engine: Option<&mut TextLayoutEngine>,
) -> MemeResult<FrameRGBA> {
    let width: u16 = plan
        .canvas
        .width
        .try_into()
        .map_err(|_| MemeError::validation("canvas width exceeds u16"))?;
    let height: u16 = plan
        .canvas
        .height
        .try_into()
        .map_err(|_| MemeError::validation("canvas height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    for op in &plan.ops {
        match op {
            DrawOp::Image {
                src_width,
                src_height,
                transform,
            } => {
                if (*src_width, *src_height) != (image.width, image.height) {
                    return Err(MemeError::validation(format!(
                        "plan expects a {src_width}x{src_height} image, got {}x{}",
                        image.width, image.height
                    )));
                }
                let paint = image_paint(image)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(*src_width),
                    f64::from(*src_height),
                ));
            }
            DrawOp::Text {
                text,
                size_px,
                paint,
                transform,
                ..
            } => {
                let engine = engine
                    .as_deref_mut()
                    .ok_or_else(|| MemeError::font("caption text requires a font"))?;
                let line = engine.shape_line(text, *size_px)?;
                ctx.set_transform(affine_to_cpu(*transform));
                match *paint {
                    TextPaint::Stroke { width, color } => {
                        ctx.set_paint(cpu_color(color));
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width).with_miter_limit(10.0));
                    }
                    TextPaint::Fill { color } => ctx.set_paint(cpu_color(color)),
                }

                for l in line.layout.lines() {
                    for item in l.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        let face = engine.face_data(run.run().font().index);
                        let builder = ctx.glyph_run(&face).font_size(run.run().font_size());
                        match paint {
                            TextPaint::Stroke { .. } => builder.stroke_glyphs(glyphs),
                            TextPaint::Fill { .. } => builder.fill_glyphs(glyphs),
                        }
                    }
                }
            }
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width: plan.canvas.width,
        height: plan.canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn image_paint(image: &DecodedImage) -> MemeResult<vello_cpu::Image> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| MemeError::validation("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| MemeError::validation("image height exceeds u16"))?;
    // Already premultiplied.
    let pixels = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
