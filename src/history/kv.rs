//! Key-value slots holding JSON values.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::foundation::error::{MemeError, MemeResult};

/// A persistent map from slot names to JSON values.
pub trait KvStore {
    fn get(&self, key: &str) -> MemeResult<Option<Value>>;
    fn put(&mut self, key: &str, value: Value) -> MemeResult<()>;
}

/// In-memory store; counts writes so callers can assert when nothing was persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    slots: BTreeMap<String, Value>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make every later `put` fail with a storage error.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> MemeResult<Option<Value>> {
        Ok(self.slots.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> MemeResult<()> {
        if self.fail_writes {
            return Err(MemeError::storage(format!("write to slot '{key}' refused")));
        }
        self.slots.insert(key.to_owned(), value);
        self.writes += 1;
        Ok(())
    }
}

/// All slots in one JSON object on disk.
///
/// The whole file is rewritten on every `put`, through a sibling temp file and a rename.
#[derive(Debug)]
pub struct JsonFileKv {
    path: PathBuf,
    slots: serde_json::Map<String, Value>,
}

impl JsonFileKv {
    /// Open `path`, treating a missing file as an empty store.
    #[tracing::instrument]
    pub fn open(path: &Path) -> MemeResult<Self> {
        let slots = match std::fs::read(path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => serde_json::Map::new(),
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(MemeError::storage(format!(
                        "store '{}' is not a json object",
                        path.display()
                    )));
                }
                Err(e) => {
                    return Err(MemeError::storage(format!(
                        "parse store '{}': {e}",
                        path.display()
                    )));
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => serde_json::Map::new(),
            Err(e) => {
                return Err(MemeError::storage(format!(
                    "read store '{}': {e}",
                    path.display()
                )));
            }
        };
        Ok(Self {
            path: path.to_owned(),
            slots,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, slots: &serde_json::Map<String, Value>) -> MemeResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemeError::storage(format!("create store dir '{}': {e}", parent.display()))
            })?;
        }
        let bytes = serde_json::to_vec_pretty(slots)
            .map_err(|e| MemeError::storage(format!("serialize store: {e}")))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, bytes)
            .map_err(|e| MemeError::storage(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            MemeError::storage(format!("replace '{}': {e}", self.path.display()))
        })
    }
}

impl KvStore for JsonFileKv {
    fn get(&self, key: &str) -> MemeResult<Option<Value>> {
        Ok(self.slots.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> MemeResult<()> {
        let mut next = self.slots.clone();
        next.insert(key.to_owned(), value);
        self.persist(&next)?;
        self.slots = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/kv.rs"]
mod tests;
