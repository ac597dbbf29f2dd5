//! CV record store.
//!
//! Every CV lives in one JSON blob under a single namespaced key. The blob is
//! an object mapping record id to record, so lookups and upserts are keyed and
//! storage order carries no meaning.
//!
//! # Backends
//!
//! [`KeyValueStore`] is the seam between the collection logic and where bytes
//! end up. [`FileStore`] keeps each key as `<dir>/<key>.json` and replaces it
//! atomically (temp file, then rename). [`MemoryStore`] keeps everything in a
//! map and exists for tests and dry runs.
//!
//! # Resilience
//!
//! Reading never fails the caller. A missing, unreadable or corrupt blob is
//! treated as an empty collection and logged; the next save overwrites it.
//! Older builds stored the collection as a JSON array of records; that shape
//! is still accepted and re-keyed by id.
//!
//! # Concurrency
//!
//! Each save is a whole-collection read-modify-write with no locking. Two
//! processes saving at once race, and the last write wins.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::model::Cv;

/// Default key of the collection blob.
pub const DEFAULT_KEY: &str = "cvpress_cvs";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CV not found: {0}")]
    NotFound(String),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.path_for(key))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store. Mutex rather than RefCell so it can be shared.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// The CV collection on top of a [`KeyValueStore`].
pub struct CvStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> CvStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// A fresh, empty record. Not persisted until [`save`](Self::save).
    pub fn create(&self, name: &str) -> Cv {
        Cv::new(name, Utc::now())
    }

    /// Upsert `cv`, stamping its modification time.
    pub fn save(&self, cv: &mut Cv) -> Result<(), StoreError> {
        self.save_at(cv, Utc::now())
    }

    /// Upsert with an explicit clock reading. `updatedAt` never moves backward.
    pub fn save_at(&self, cv: &mut Cv, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut all = self.read_map();
        if let Some(previous) = all.get(&cv.id) {
            cv.created_at = previous.created_at;
            cv.updated_at = cv.updated_at.max(previous.updated_at);
        }
        cv.updated_at = now.max(cv.updated_at);
        all.insert(cv.id.clone(), cv.clone());
        self.write_map(&all)?;
        tracing::debug!(id = %cv.id, "saved CV");
        Ok(())
    }

    pub fn load(&self, id: &str) -> Option<Cv> {
        self.read_map().remove(id)
    }

    /// Like [`load`](Self::load) but a missing record is an error.
    pub fn require(&self, id: &str) -> Result<Cv, StoreError> {
        self.load(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Every record, most recently modified first.
    pub fn load_all(&self) -> Vec<Cv> {
        let mut all: Vec<Cv> = self.read_map().into_values().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut all = self.read_map();
        if all.remove(id).is_none() {
            return Ok(false);
        }
        if all.is_empty() {
            self.backend.delete(&self.key)?;
        } else {
            self.write_map(&all)?;
        }
        tracing::debug!(id, "deleted CV");
        Ok(true)
    }

    fn read_map(&self) -> BTreeMap<String, Cv> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "CV store unreadable, treating as empty");
                return BTreeMap::new();
            }
        };
        match parse_collection(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "CV store corrupt, treating as empty");
                BTreeMap::new()
            }
        }
    }

    fn write_map(&self, all: &BTreeMap<String, Cv>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(all)?;
        self.backend.set(&self.key, &json)
    }
}

/// Parse a collection blob: an id-keyed object, or a legacy array.
fn parse_collection(raw: &str) -> Result<BTreeMap<String, Cv>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if value.is_array() {
        let records: Vec<Cv> = serde_json::from_value(value)?;
        return Ok(records.into_iter().map(|cv| (cv.id.clone(), cv)).collect());
    }
    serde_json::from_value(value)
}

/// Parse records for import: a single CV object, an array of them, or a whole
/// store blob. Records without an id are given a fresh one, and records
/// without a creation time are stamped now.
pub fn parse_import(raw: &str) -> Result<Vec<Cv>, StoreError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let mut records: Vec<Cv> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(ref fields)
            if fields.contains_key("id") || fields.contains_key("name") =>
        {
            vec![serde_json::from_value(value)?]
        }
        _ => {
            let map: BTreeMap<String, Cv> = serde_json::from_value(value)?;
            map.into_values().collect()
        }
    };
    let now = Utc::now();
    for cv in &mut records {
        if cv.id.trim().is_empty() {
            cv.id = crate::model::new_id("cv");
        }
        if cv.created_at == DateTime::<Utc>::default() {
            cv.created_at = now;
        }
    }
    Ok(records)
}
