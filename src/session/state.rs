use crate::meme::model::{CaptionPair, LoadedImage};

/// Manual caption input is capped at this many characters per line.
pub const MANUAL_TEXT_MAX_CHARS: usize = 60;

/// Proof that an image load was started; only the latest ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What the user is currently working on.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<LoadedImage>,
    caption: CaptionPair,
    loading_image: bool,
    generating_caption: bool,
    saving: bool,
    load_generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn caption(&self) -> &CaptionPair {
        &self.caption
    }

    pub fn is_loading_image(&self) -> bool {
        self.loading_image
    }

    pub fn is_generating_caption(&self) -> bool {
        self.generating_caption
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Start an image load. Any load still in flight becomes stale.
    pub fn begin_image_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.loading_image = true;
        LoadTicket(self.load_generation)
    }

    /// Apply a finished load. Returns `false` and changes nothing when `ticket` is stale.
    ///
    /// A new image starts with an empty caption.
    pub fn finish_image_load(&mut self, ticket: LoadTicket, image: LoadedImage) -> bool {
        if ticket.0 != self.load_generation {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.load_generation,
                "discarding stale image load"
            );
            return false;
        }
        self.image = Some(image);
        self.caption = CaptionPair::default();
        self.loading_image = false;
        true
    }

    /// Record a failed load. The current image is kept.
    pub fn fail_image_load(&mut self, ticket: LoadTicket) {
        if ticket.0 == self.load_generation {
            self.loading_image = false;
        }
    }

    pub fn set_top_text(&mut self, text: &str) {
        self.caption.top = cap_manual_text(text);
    }

    pub fn set_bottom_text(&mut self, text: &str) {
        self.caption.bottom = cap_manual_text(text);
    }

    /// Replace both lines, e.g. with a generated caption. Not capped.
    pub fn apply_caption(&mut self, caption: CaptionPair) {
        self.caption = caption;
    }

    pub(crate) fn set_generating_caption(&mut self, on: bool) {
        self.generating_caption = on;
    }

    pub(crate) fn set_saving(&mut self, on: bool) {
        self.saving = on;
    }
}

fn cap_manual_text(text: &str) -> String {
    text.chars().take(MANUAL_TEXT_MAX_CHARS).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
