use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{MemeError, MemeResult},
    meme::model::{CompositeResult, HistoryRecord, export_file_name},
};

/// Writes finished memes as `cat-meme-<id>.jpg` files into one directory.
#[derive(Clone, Debug)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a meme with `id` is exported to.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(export_file_name(id))
    }

    pub fn write(&self, result: &CompositeResult) -> MemeResult<PathBuf> {
        self.write_bytes(&result.id, &result.jpeg)
    }

    /// Re-export a saved history entry from its stored payload.
    pub fn write_record(&self, record: &HistoryRecord) -> MemeResult<PathBuf> {
        let jpeg = record
            .jpeg_bytes()
            .map_err(|e| MemeError::export(format!("history entry {}: {e}", record.id)))?;
        self.write_bytes(&record.id, &jpeg)
    }

    /// Write `jpeg` for `id`, creating the export directory when missing.
    #[tracing::instrument(skip(self, jpeg), fields(dir = %self.dir.display(), len = jpeg.len()))]
    pub fn write_bytes(&self, id: &str, jpeg: &[u8]) -> MemeResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            MemeError::export(format!("create export dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.path_for(id);
        std::fs::write(&path, jpeg)
            .map_err(|e| MemeError::export(format!("write '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), "meme exported");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
