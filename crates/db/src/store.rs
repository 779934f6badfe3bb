//! Flat-file record store.
//!
//! Each [`RecordStore`] owns one homogeneous collection that is loaded in full
//! when the store opens and rewritten in full after every mutation. The file
//! is a JSON array at `<data_dir>/<collection>.json`.
//!
//! Load never fails: a missing or unparsable file yields an empty collection.
//! A failed write is logged and reported by [`RecordStore::save`]; the
//! in-memory collection stays authoritative for the rest of the process.
//! Concurrent writers are last-writer-wins at whole-record granularity.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// A row in a [`RecordStore`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// File stem of the backing JSON file.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    /// Overwrite identity and both timestamps.
    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

/// Implements [`Record`] for a struct with `id`, `created_at` and `updated_at`
/// fields.
#[macro_export]
macro_rules! impl_record {
    ($ty:ty, $collection:literal) => {
        impl $crate::store::Record for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn stamp(
                &mut self,
                id: ::uuid::Uuid,
                created_at: ::chrono::DateTime<::chrono::Utc>,
                updated_at: ::chrono::DateTime<::chrono::Utc>,
            ) {
                self.id = id;
                self.created_at = created_at;
                self.updated_at = updated_at;
            }
        }
    };
}

pub struct RecordStore<T> {
    path: Option<PathBuf>,
    records: RwLock<Vec<T>>,
}

impl<T: Record> RecordStore<T> {
    /// Open the collection file inside `data_dir`, loading whatever it holds.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(format!("{}.json", T::COLLECTION));
        let records = Self::load(&path);
        Self {
            path: Some(path),
            records: RwLock::new(records),
        }
    }

    /// A store with no backing file. Every save trivially succeeds.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load(path: &Path) -> Vec<T> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No record file yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read record file, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&content) {
            Ok(records) => {
                debug!(
                    collection = T::COLLECTION,
                    count = records.len(),
                    "Loaded records"
                );
                records
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse record file, starting empty");
                Vec::new()
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the whole collection in insertion order.
    pub fn all(&self) -> Vec<T> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<T> {
        self.read().iter().find(|record| record.id() == id).cloned()
    }

    pub fn find_one(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.read().iter().find(|record| predicate(record)).cloned()
    }

    pub fn query(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.read()
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Append `item` under a fresh id with `created_at == updated_at == now`.
    pub fn insert(&self, mut item: T) -> T {
        let now = Utc::now();
        item.stamp(Uuid::new_v4(), now, now);

        let mut records = self.write();
        records.push(item.clone());
        self.persist(&records);
        item
    }

    /// Apply `patch` to the record with `id`. Returns `None` without touching
    /// the collection when no such record exists.
    ///
    /// The record keeps its id and `created_at` whatever the patch does, and
    /// `updated_at` never moves backwards.
    pub fn update(&self, id: Uuid, patch: impl FnOnce(&mut T)) -> Option<T> {
        let mut records = self.write();
        let record = records.iter_mut().find(|record| record.id() == id)?;

        let created_at = record.created_at();
        let previous = record.updated_at();
        patch(record);
        record.stamp(id, created_at, Utc::now().max(previous));

        let updated = record.clone();
        self.persist(&records);
        Some(updated)
    }

    /// Apply `patch` to every record matching `predicate` under one write
    /// lock, saving once. Returns how many records changed.
    pub fn update_where(
        &self,
        predicate: impl Fn(&T) -> bool,
        patch: impl Fn(&mut T),
    ) -> usize {
        let mut records = self.write();
        let now = Utc::now();
        let mut changed = 0;
        for record in records.iter_mut().filter(|record| predicate(record)) {
            let (id, created_at, previous) =
                (record.id(), record.created_at(), record.updated_at());
            patch(record);
            record.stamp(id, created_at, now.max(previous));
            changed += 1;
        }
        if changed > 0 {
            self.persist(&records);
        }
        changed
    }

    /// Hard delete. Returns whether a record was removed.
    pub fn delete(&self, id: Uuid) -> bool {
        self.delete_where(|record| record.id() == id) > 0
    }

    /// Remove every record matching `predicate`, returning how many went.
    pub fn delete_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let mut records = self.write();
        let before = records.len();
        records.retain(|record| !predicate(record));
        let removed = before - records.len();
        if removed > 0 {
            self.persist(&records);
        }
        removed
    }

    /// Rewrite the backing file from the in-memory collection.
    pub fn save(&self) -> bool {
        let records = self.read();
        self.persist(&records)
    }

    fn persist(&self, records: &[T]) -> bool {
        let Some(path) = self.path.as_deref() else {
            return true;
        };

        match write_collection(path, records) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    collection = T::COLLECTION,
                    path = %path.display(),
                    error = %e,
                    "Failed to persist records; keeping in-memory state"
                );
                false
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Write via a `.tmp` sibling and rename so readers never see a torn file.
fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(records)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes())?;
    fs::rename(&tmp, path)?;
    Ok(())
}
