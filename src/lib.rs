//! catmeme fetches random cat pictures and burns classic top/bottom meme captions into them.
//!
//! The core is the compositor: a caption pair and a source image are compiled into a
//! [`MemePlan`], rasterized on the CPU and encoded as JPEG. The live preview renders the same plan
//! unencoded, so what you preview is what gets saved.
//!
//! Around it sit thin collaborators:
//!
//! - [`ImageSource`] / [`CaptionSource`] for random pictures and generated captions
//! - [`HistoryStore`] for the newest-first list of saved memes
//! - [`Studio`] binding them into the load, caption, preview, save workflow
#![forbid(unsafe_code)]

pub mod assets;
pub mod compile;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod history;
pub mod meme;
pub mod render;
pub mod session;
pub mod sources;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{MemeError, MemeResult};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::font::{FontSource, MemeFont};
pub use crate::assets::text::{TextLayoutEngine, TextMeasurer, TextMetrics};
pub use crate::compile::plan::{
    CaptionSlot, DEFAULT_TARGET_WIDTH, DrawOp, MemePlan, TextPaint, compile_meme,
};
pub use crate::config::Config;
pub use crate::encode::export::Exporter;
pub use crate::encode::jpeg::{JPEG_QUALITY, encode_jpeg, from_data_url, to_data_url, write_png};
pub use crate::history::kv::{JsonFileKv, KvStore, MemoryKv};
pub use crate::history::store::{HISTORY_SLOT, HistoryStore};
pub use crate::meme::model::{
    CaptionPair, CompositeResult, HistoryRecord, LoadedImage, MemeStamp, SourceImage,
    StampGenerator,
};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::render_plan;
pub use crate::render::pipeline::Compositor;
pub use crate::session::state::{LoadTicket, Session};
pub use crate::session::studio::{Action, Notice, NoticeLevel, SavedMeme, Studio};
pub use crate::sources::caption::{CaptionSource, LlmCaptionSource, parse_caption};
pub use crate::sources::image::{
    CatApiSource, ImageSource, LocalImageSource, load_random_image, parse_search_response,
};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;
