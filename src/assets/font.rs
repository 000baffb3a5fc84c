use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

use crate::foundation::error::{MemeError, MemeResult};

/// Families tried in order when looking up the caption face among system fonts.
///
/// The first two are the classic meme faces; the rest are common bold-capable sans families on
/// systems that ship neither.
pub const DISPLAY_FAMILIES: &[&str] = &[
    "Impact",
    "Arial Black",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];

/// Where the caption font comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Query the system font database for a bold display face.
    #[default]
    System,
    /// Load a specific font file (`.ttf`, `.otf` or `.ttc`; the first face is used).
    File(PathBuf),
}

/// Raw font data for the caption face.
#[derive(Clone)]
pub struct MemeFont {
    /// Font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes` (non-zero only for collections).
    pub index: u32,
    /// Family name as reported by the font database or the file name.
    pub family: String,
}

impl std::fmt::Debug for MemeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

impl FontSource {
    /// Resolve this source into font bytes.
    #[tracing::instrument]
    pub fn resolve(&self) -> MemeResult<MemeFont> {
        let font = match self {
            FontSource::System => {
                let mut db = fontdb::Database::new();
                db.load_system_fonts();
                query_display_face(&db).ok_or_else(|| {
                    MemeError::font(format!(
                        "no usable font among {} system faces",
                        db.len()
                    ))
                })?
            }
            FontSource::File(path) => load_font_file(path)?,
        };
        tracing::debug!(family = %font.family, index = font.index, "resolved caption font");
        Ok(font)
    }
}

/// Pick the caption face from `db`: a bold face of the first available [`DISPLAY_FAMILIES`]
/// entry, then any bold face, then any face at all.
pub fn query_display_face(db: &fontdb::Database) -> Option<MemeFont> {
    let families: Vec<fontdb::Family<'_>> = DISPLAY_FAMILIES
        .iter()
        .map(|name| fontdb::Family::Name(*name))
        .collect();

    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::BOLD,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| {
            db.faces()
                .find(|f| f.weight.0 >= fontdb::Weight::BOLD.0 && f.style == fontdb::Style::Normal)
                .map(|f| f.id)
        })
        .or_else(|| db.faces().next().map(|f| f.id))?;

    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "unknown".to_string());

    db.with_face_data(id, |data, index| MemeFont {
        bytes: Arc::new(data.to_vec()),
        index,
        family,
    })
}

fn load_font_file(path: &Path) -> MemeResult<MemeFont> {
    let bytes = std::fs::read(path)
        .map_err(|e| MemeError::font(format!("read font file '{}': {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(MemeError::font(format!(
            "font file '{}' is empty",
            path.display()
        )));
    }

    let family = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(MemeFont {
        bytes: Arc::new(bytes),
        index: 0,
        family,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
