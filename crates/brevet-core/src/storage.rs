//! Key-value persistence.
//!
//! The answer store and exam session never touch a global store: they are
//! handed an `Arc<dyn KeyValueStore>`. Values are JSON. Writes are
//! synchronous and fire-and-forget from the caller's perspective; failures are
//! logged and the in-memory state carries on.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StorageError;
use crate::model::Subject;

/// Countdown seconds remaining in the current exam.
pub const EXAM_TIMER_KEY: &str = "exam:timer";
/// The current exam paper.
pub const EXAM_PAPER_KEY: &str = "exam:paper";
/// Answers submitted during the current exam.
pub const EXAM_ANSWERS_KEY: &str = "exam:answers";
/// State of the current exam (`idle`, `running`, `done`).
pub const EXAM_STATE_KEY: &str = "exam:state";

/// Storage key of a subject's practice answers.
pub fn answers_key(subject: Subject) -> String {
    format!("answers:{}", subject.key())
}

/// A local key-value store holding JSON values.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Read and decode `key`, substituting `fallback` when it is absent or does
/// not have the expected shape.
pub fn load_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    match store.get(key) {
        None | Some(Value::Null) => fallback,
        Some(value) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(key, "discarding malformed stored value: {e}");
                fallback
            }
        },
    }
}

/// Encode and write `value` under `key`, logging instead of failing.
pub fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_value(value)
        .map_err(StorageError::from)
        .and_then(|v| store.set(key, v));
    if let Err(e) = result {
        tracing::warn!(key, "failed to persist: {e}");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.values).is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        lock(&self.values).insert(key.to_string(), value);
        Ok(())
    }
}

/// A store backed by one JSON object file, rewritten on every write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// or corrupt one is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("discarding corrupt state file {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("cannot read state file {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn flush(&self, values: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value);
        self.flush(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::model::AnswerRecord;

    #[test]
    fn memory_store_get_set() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", json!({"a": 1})).unwrap();
        assert_eq!(store.get("k"), Some(json!({"a": 1})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_or_falls_back_on_bad_shape() {
        let store = MemoryStore::new();
        store.set(EXAM_TIMER_KEY, json!("soon")).unwrap();
        store.set("answers:maths", json!([1, 2, 3])).unwrap();

        assert_eq!(load_or(&store, EXAM_TIMER_KEY, 1500u32), 1500);
        assert_eq!(load_or(&store, "missing", 7u32), 7);
        let record: AnswerRecord = load_or(&store, "answers:maths", AnswerRecord::new());
        assert!(record.is_empty());
    }

    #[test]
    fn load_or_rejects_negative_timer() {
        let store = MemoryStore::new();
        store.set(EXAM_TIMER_KEY, json!(-5)).unwrap();
        assert_eq!(load_or(&store, EXAM_TIMER_KEY, 1500u32), 1500);
    }

    #[test]
    fn answers_key_uses_subject_key() {
        assert_eq!(answers_key(Subject::HistoryGeoCivics), "answers:hgeo");
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileStore::open(&path);
        persist(&store, EXAM_TIMER_KEY, &42u32);
        assert!(path.exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(EXAM_TIMER_KEY), Some(json!(42)));
    }

    #[test]
    fn file_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get(EXAM_TIMER_KEY).is_none());
        store.set(EXAM_TIMER_KEY, json!(10)).unwrap();
        assert_eq!(FileStore::open(&path).get(EXAM_TIMER_KEY), Some(json!(10)));
    }
}
