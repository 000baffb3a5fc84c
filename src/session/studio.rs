//! The meme-making workflow: load a cat, caption it, preview, save, manage history.

use std::path::PathBuf;

use crate::{
    compile::plan::DEFAULT_TARGET_WIDTH,
    encode::export::Exporter,
    foundation::error::{MemeError, MemeResult},
    history::{kv::KvStore, store::HistoryStore},
    meme::model::{CaptionPair, HistoryRecord, StampGenerator},
    render::{backend::FrameRGBA, pipeline::Compositor},
    session::state::Session,
    sources::{
        caption::CaptionSource,
        image::{ImageSource, load_random_image},
    },
};

/// User-facing outcome of a studio action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    LoadImage,
    GenerateCaption,
    Save,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message shown after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Success message for `action`.
    pub fn done(action: Action) -> Self {
        Self::success(match action {
            Action::LoadImage => "New cat loaded!",
            Action::GenerateCaption => "Caption generated!",
            Action::Save => "Meme saved and downloaded!",
            Action::Delete => "Meme deleted",
        })
    }

    /// Error message for a failed `action`.
    ///
    /// Precondition failures carry their own user-facing text; everything else gets the
    /// action's generic retry message.
    pub fn from_error(action: Action, err: &MemeError) -> Self {
        if let MemeError::Validation(msg) = err {
            return Self::error(msg.clone());
        }
        Self::error(match action {
            Action::LoadImage => "Failed to load cat image. Please try again.",
            Action::GenerateCaption => "Failed to generate caption. Please try again.",
            Action::Save => "Failed to save meme. Please try again.",
            Action::Delete => "Failed to delete meme. Please try again.",
        })
    }

    pub fn from_result<T>(action: Action, result: &MemeResult<T>) -> Self {
        match result {
            Ok(_) => Self::done(action),
            Err(e) => Self::from_error(action, e),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// A meme that was exported and recorded in history.
#[derive(Clone, Debug)]
pub struct SavedMeme {
    pub record: HistoryRecord,
    pub path: PathBuf,
}

/// Binds the session to its collaborators.
pub struct Studio<I, C, K> {
    images: I,
    captions: C,
    compositor: Compositor,
    history: HistoryStore<K>,
    exporter: Exporter,
    stamps: StampGenerator,
    session: Session,
    target_width: u32,
}

impl<I, C, K> Studio<I, C, K>
where
    I: ImageSource,
    C: CaptionSource,
    K: KvStore,
{
    pub fn new(
        images: I,
        captions: C,
        compositor: Compositor,
        history: HistoryStore<K>,
        exporter: Exporter,
    ) -> Self {
        Self {
            images,
            captions,
            compositor,
            history,
            exporter,
            stamps: StampGenerator::new(),
            session: Session::new(),
            target_width: DEFAULT_TARGET_WIDTH,
        }
    }

    pub fn with_target_width(mut self, target_width: u32) -> Self {
        self.target_width = target_width;
        self
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &HistoryStore<K> {
        &self.history
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Fetch and decode a new random image; on success the caption is cleared.
    ///
    /// Returns `false` when a newer load superseded this one.
    #[tracing::instrument(skip(self))]
    pub async fn load_new_image(&mut self) -> MemeResult<bool> {
        let ticket = self.session.begin_image_load();
        match load_random_image(&self.images).await {
            Ok(image) => Ok(self.session.finish_image_load(ticket, image)),
            Err(e) => {
                self.session.fail_image_load(ticket);
                tracing::warn!(error = %e, "image load failed");
                Err(e)
            }
        }
    }

    /// Replace both caption lines with a generated pair. On failure they are left unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn generate_caption(&mut self) -> MemeResult<CaptionPair> {
        if self.session.image().is_none() {
            return Err(MemeError::validation("Load a cat picture first"));
        }
        self.session.set_generating_caption(true);
        let result = self.captions.request_caption().await;
        self.session.set_generating_caption(false);

        let caption = result.inspect_err(|e| tracing::warn!(error = %e, "caption failed"))?;
        self.session.apply_caption(caption.clone());
        Ok(caption)
    }

    pub fn set_top_text(&mut self, text: &str) {
        self.session.set_top_text(text);
    }

    pub fn set_bottom_text(&mut self, text: &str) {
        self.session.set_bottom_text(text);
    }

    /// Live preview of the current image and caption.
    pub fn preview(&mut self) -> MemeResult<FrameRGBA> {
        let image = self
            .session
            .image()
            .ok_or_else(|| MemeError::validation("Load a cat picture first"))?;
        self.compositor
            .preview(&image.pixels, self.session.caption(), self.target_width)
    }

    /// Composite, export and record the current meme.
    ///
    /// Preconditions are checked before any work. The exported file is removed again when the
    /// history entry cannot be written.
    #[tracing::instrument(skip(self))]
    pub fn save(&mut self) -> MemeResult<SavedMeme> {
        if self.session.image().is_none() {
            return Err(MemeError::validation("Load a cat picture first"));
        }
        if self.session.caption().is_blank() {
            return Err(MemeError::validation("Please add some text to your meme"));
        }

        self.session.set_saving(true);
        let result = self.export_current();
        self.session.set_saving(false);
        result
    }

    fn export_current(&mut self) -> MemeResult<SavedMeme> {
        let image = self
            .session
            .image()
            .ok_or_else(|| MemeError::validation("Load a cat picture first"))?;
        let composite = self.compositor.export(
            image,
            self.session.caption(),
            self.target_width,
            self.stamps.next(),
        )?;
        let path = self.exporter.write(&composite)?;
        let record = composite.to_record();
        if let Err(e) = self.history.append(record.clone()) {
            if let Err(rm) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %rm, "could not remove export");
            }
            return Err(e);
        }
        Ok(SavedMeme { record, path })
    }

    /// Delete a saved meme. Returns `false` when no meme has that id.
    pub fn delete(&mut self, id: &str) -> MemeResult<bool> {
        self.history.remove(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
