use crate::{
    assets::{
        decode::DecodedImage,
        font::FontSource,
        text::{TextLayoutEngine, TextMeasurer, TextMetrics},
    },
    compile::plan::{MemePlan, compile_meme},
    encode::jpeg::{JPEG_QUALITY, encode_jpeg},
    foundation::error::{MemeError, MemeResult},
    meme::model::{CaptionPair, CompositeResult, LoadedImage, MemeStamp},
    render::{backend::FrameRGBA, cpu::render_plan},
};

/// Compile + render + encode memes.
///
/// Preview and export go through the same [`MemePlan`] and the same CPU backend, so a preview
/// frame and the exported JPEG differ only by JPEG quantization.
///
/// The caption font is resolved on first use. Blank captions never touch it.
pub struct Compositor {
    font_source: FontSource,
    engine: Option<TextLayoutEngine>,
}

impl Compositor {
    pub fn new(font_source: FontSource) -> Self {
        Self {
            font_source,
            engine: None,
        }
    }

    /// Compositor over an already built text engine.
    pub fn with_engine(engine: TextLayoutEngine) -> Self {
        Self {
            font_source: FontSource::System,
            engine: Some(engine),
        }
    }

    pub fn font_source(&self) -> &FontSource {
        &self.font_source
    }

    /// Text engine, resolving the font the first time it is needed.
    pub fn engine(&mut self) -> MemeResult<&mut TextLayoutEngine> {
        if self.engine.is_none() {
            let font = self.font_source.resolve()?;
            self.engine = Some(TextLayoutEngine::new(font)?);
        }
        self.engine
            .as_mut()
            .ok_or_else(|| MemeError::font("text engine unavailable"))
    }

    /// Layout for `caption` over an image of `width x height`, scaled to `target_width`.
    pub fn plan(
        &mut self,
        width: u32,
        height: u32,
        caption: &CaptionPair,
        target_width: u32,
    ) -> MemeResult<MemePlan> {
        if caption.is_blank() {
            return compile_meme(width, height, caption, target_width, &mut NoText);
        }
        compile_meme(width, height, caption, target_width, self.engine()?)
    }

    /// Render the live preview frame (premultiplied RGBA8).
    #[tracing::instrument(skip(self, image, caption))]
    pub fn preview(
        &mut self,
        image: &DecodedImage,
        caption: &CaptionPair,
        target_width: u32,
    ) -> MemeResult<FrameRGBA> {
        let plan = self.plan(image.width, image.height, caption, target_width)?;
        let engine = if plan.has_text() {
            Some(self.engine()?)
        } else {
            None
        };
        render_plan(&plan, image, engine)
    }

    /// Render and encode the export JPEG.
    pub fn compose_jpeg(
        &mut self,
        image: &DecodedImage,
        caption: &CaptionPair,
        target_width: u32,
    ) -> MemeResult<Vec<u8>> {
        let frame = self.preview(image, caption, target_width)?;
        encode_jpeg(&frame, JPEG_QUALITY)
    }

    /// Produce the immutable [`CompositeResult`] for a save.
    #[tracing::instrument(skip_all, fields(id = %stamp.id))]
    pub fn export(
        &mut self,
        image: &LoadedImage,
        caption: &CaptionPair,
        target_width: u32,
        stamp: MemeStamp,
    ) -> MemeResult<CompositeResult> {
        let jpeg = self.compose_jpeg(&image.pixels, caption, target_width)?;
        Ok(CompositeResult {
            id: stamp.id,
            jpeg,
            source_url: image.source.url.clone(),
            caption: caption.clone(),
            created_at_ms: stamp.created_at_ms,
        })
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("font_source", &self.font_source)
            .field("engine_ready", &self.engine.is_some())
            .finish()
    }
}

/// Measurer for captions with no text; never called.
struct NoText;

impl TextMeasurer for NoText {
    fn measure(&mut self, _text: &str, _size_px: f32) -> MemeResult<TextMetrics> {
        Err(MemeError::font("blank caption was measured"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
