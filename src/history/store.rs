use serde_json::Value;

use crate::{
    foundation::error::{MemeError, MemeResult},
    history::kv::KvStore,
    meme::model::HistoryRecord,
};

/// Slot the saved memes live in.
pub const HISTORY_SLOT: &str = "saved-memes";

/// Newest-first list of saved memes, persisted to [`HISTORY_SLOT`] after every change.
///
/// Ids are unique. A change that fails to persist is rolled back, so memory and storage agree.
#[derive(Debug)]
pub struct HistoryStore<K> {
    kv: K,
    records: Vec<HistoryRecord>,
}

impl<K: KvStore> HistoryStore<K> {
    /// Load the slot from `kv`; an absent slot is an empty history.
    pub fn open(kv: K) -> MemeResult<Self> {
        let records = match kv.get(HISTORY_SLOT)? {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                MemeError::storage(format!("slot '{HISTORY_SLOT}' is malformed: {e}"))
            })?,
        };
        tracing::debug!(count = records.len(), "history loaded");
        Ok(Self { kv, records })
    }

    /// Records, newest first.
    pub fn list(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Insert `record` at the front.
    pub fn append(&mut self, record: HistoryRecord) -> MemeResult<()> {
        if self.get(&record.id).is_some() {
            return Err(MemeError::validation(format!(
                "a saved meme with id {} already exists",
                record.id
            )));
        }
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        Ok(())
    }

    /// Remove the record with `id`. Returns `false`, without touching storage, when absent.
    pub fn remove(&mut self, id: &str) -> MemeResult<bool> {
        let Some(pos) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = self.records.remove(pos);
        if let Err(e) = self.persist() {
            self.records.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    fn persist(&mut self) -> MemeResult<()> {
        let value = serde_json::to_value(&self.records)
            .map_err(|e| MemeError::storage(format!("serialize history: {e}")))?;
        self.kv.put(HISTORY_SLOT, value)?;
        tracing::debug!(count = self.records.len(), "history written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/store.rs"]
mod tests;
