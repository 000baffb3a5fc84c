use serde::{Deserialize, Serialize};

use crate::{
    assets::decode::DecodedImage,
    encode::jpeg::{from_data_url, to_data_url},
    foundation::error::MemeResult,
};

/// Metadata of a fetched source picture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub id: String,
    pub url: String,
    /// Width reported by the image service (may be 0 when unknown).
    #[serde(default)]
    pub width: u32,
    /// Height reported by the image service (may be 0 when unknown).
    #[serde(default)]
    pub height: u32,
}

/// A source picture together with its decoded pixels.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub source: SourceImage,
    pub pixels: DecodedImage,
}

/// The (top, bottom) text pair rendered on a meme. Either side may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionPair {
    pub top: String,
    pub bottom: String,
}

impl CaptionPair {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    /// `true` when both lines are empty.
    pub fn is_blank(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty()
    }

    /// Both lines upper-cased the way they are rendered.
    pub fn to_uppercase(&self) -> Self {
        Self {
            top: self.top.to_uppercase(),
            bottom: self.bottom.to_uppercase(),
        }
    }
}

/// Identity of a saved meme: a time-based id and its creation timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemeStamp {
    pub id: String,
    pub created_at_ms: i64,
}

/// Hands out [`MemeStamp`]s whose millisecond timestamps strictly increase, so ids never repeat
/// within a process even when two saves land in the same millisecond.
#[derive(Clone, Debug, Default)]
pub struct StampGenerator {
    last_ms: i64,
}

impl StampGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> MemeStamp {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn next_at(&mut self, now_ms: i64) -> MemeStamp {
        let ms = now_ms.max(self.last_ms.saturating_add(1));
        self.last_ms = ms;
        MemeStamp {
            id: ms.to_string(),
            created_at_ms: ms,
        }
    }
}

/// A finished composite: the encoded JPEG plus what it was made from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeResult {
    pub id: String,
    pub jpeg: Vec<u8>,
    pub source_url: String,
    pub caption: CaptionPair,
    pub created_at_ms: i64,
}

impl CompositeResult {
    pub fn file_name(&self) -> String {
        export_file_name(&self.id)
    }

    /// Persisted form of this composite.
    pub fn to_record(&self) -> HistoryRecord {
        HistoryRecord {
            id: self.id.clone(),
            image_url: self.source_url.clone(),
            top_text: self.caption.top.clone(),
            bottom_text: self.caption.bottom.clone(),
            data_url: to_data_url(&self.jpeg),
            created_at: self.created_at_ms,
        }
    }
}

/// One saved meme as stored in the history slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub image_url: String,
    pub top_text: String,
    pub bottom_text: String,
    /// `data:image/jpeg;base64,...` payload of the exported composite.
    pub data_url: String,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl HistoryRecord {
    pub fn caption(&self) -> CaptionPair {
        CaptionPair::new(self.top_text.clone(), self.bottom_text.clone())
    }

    /// Decode the stored JPEG bytes.
    pub fn jpeg_bytes(&self) -> MemeResult<Vec<u8>> {
        from_data_url(&self.data_url)
    }

    pub fn file_name(&self) -> String {
        export_file_name(&self.id)
    }
}

/// Export file name for a meme id: `cat-meme-<id>.jpg`.
pub fn export_file_name(id: &str) -> String {
    format!("cat-meme-{id}.jpg")
}

#[cfg(test)]
#[path = "../../tests/unit/meme/model.rs"]
mod tests;
