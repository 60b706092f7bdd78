//! # Item Store
//!
//! Durable storage for the two lost & found collections. The store owns id
//! assignment, creation stamps (`reportedAt`, `status`) and predicate-based
//! retrieval; everything above it only ever sees plain [`ItemRecord`] values.
//!
//! ## Persistence model
//!
//! Each collection is one ordered sequence of records, encoded as a JSON array
//! and handed to a [`StoreBackend`] as a single blob. Writes replace the whole
//! blob atomically, so readers see either the previous or the next collection
//! and never a partial one. Reads take no lock.
//!
//! Writers are serialized per collection: [`ItemStore::create`] holds the
//! collection mutex across "read max id, then write", which is what keeps two
//! concurrent reporters from ever receiving the same id.
//!
//! Ids are derived from the stored records (`max + 1`) rather than from an
//! in-memory counter, so a restarted process continues where the data left off.
//!
//! ## Example
//!
//! ```
//! use store::{BackendConfig, ItemFilter, ItemKind, ItemStore, NewItem, StoreConfig};
//!
//! let store = ItemStore::new(StoreConfig::new().with_backend(BackendConfig::in_memory())).unwrap();
//!
//! let created = store
//!     .create(
//!         ItemKind::Found,
//!         NewItem {
//!             item_name: "Black backpack".into(),
//!             category: "Bags".into(),
//!             color: "Black".into(),
//!             location: "Main Building".into(),
//!             date: "2024-09-12".into(),
//!             contact_info: "security@campus.edu".into(),
//!             ..Default::default()
//!         },
//!     )
//!     .unwrap();
//! assert_eq!(created.id, 1);
//!
//! let bags = store
//!     .filter(ItemKind::Found, &ItemFilter::new().with_category("Bags"))
//!     .unwrap();
//! assert_eq!(bags.len(), 1);
//! ```

mod backend;
mod query;
mod types;

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use crate::backend::{BackendConfig, InMemoryBackend, JsonFileBackend, StoreBackend};
#[cfg(feature = "backend-redb")]
pub use crate::backend::RedbBackend;
pub use crate::query::ItemFilter;
pub use crate::types::{
    AiAnalysis, DetectedObject, ItemKind, ItemRecord, ItemStatus, NewItem,
};

/// Errors surfaced by store operations.
///
/// Only [`StoreError::StorageUnavailable`] means the operation itself failed;
/// an empty collection is never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("{kind} item {id} not found")]
    NotFound { kind: ItemKind, id: u64 },
    #[error("invalid item type: {0}")]
    InvalidItemType(String),
    #[error("{kind} item {id} already exists")]
    DuplicateId { kind: ItemKind, id: u64 },
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    pub fn unavailable<E: std::fmt::Display>(err: E) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// Config for opening a store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Where the collections live.
    pub backend: BackendConfig,
    /// Pretty-print collection JSON (matches the hand-inspectable layout of
    /// the data directory).
    pub pretty: bool,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            backend: BackendConfig::default(),
            pretty: true,
        }
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Repository over the lost and found collections.
pub struct ItemStore {
    backend: Box<dyn StoreBackend>,
    cfg: StoreConfig,
    /// One writer lock per collection, indexed by [`ItemStore::slot`].
    write_locks: [Mutex<()>; 2],
}

impl ItemStore {
    /// Open a store using the configured backend.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        let backend = cfg.backend.build()?;
        Ok(Self::with_backend(cfg, backend))
    }

    /// Build a store around an existing backend (tests, custom storage).
    pub fn with_backend(cfg: StoreConfig, backend: Box<dyn StoreBackend>) -> Self {
        Self {
            backend,
            cfg,
            write_locks: [Mutex::new(()), Mutex::new(())],
        }
    }

    /// All records of a collection in insertion order.
    pub fn load_all(&self, kind: ItemKind) -> Result<Vec<ItemRecord>, StoreError> {
        match self.backend.load(kind)? {
            Some(bytes) => self.decode_collection(kind, &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Next id for `kind`: 1 for an empty collection, otherwise max + 1.
    ///
    /// Callers that go on to [`append`](Self::append) race with other writers;
    /// use [`create`](Self::create) to assign and persist atomically.
    pub fn next_id(&self, kind: ItemKind) -> Result<u64, StoreError> {
        let records = self.load_all(kind)?;
        next_id_in(kind, &records)
    }

    /// Append a record whose id was already assigned by the caller.
    pub fn append(&self, kind: ItemKind, record: ItemRecord) -> Result<(), StoreError> {
        let _guard = self.lock(kind);
        let mut records = self.load_all(kind)?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::DuplicateId {
                kind,
                id: record.id,
            });
        }
        records.push(record);
        self.persist(kind, &records)
    }

    /// Validate, stamp and persist a new report, returning the stored record.
    pub fn create(&self, kind: ItemKind, item: NewItem) -> Result<ItemRecord, StoreError> {
        if item.item_name.trim().is_empty() {
            return Err(StoreError::MissingField("itemName".into()));
        }

        let start = Instant::now();
        let _guard = self.lock(kind);
        let mut records = self.load_all(kind)?;
        let id = next_id_in(kind, &records)?;
        let record = ItemRecord::from_new(kind, id, Utc::now(), item);
        records.push(record.clone());

        match self.persist(kind, &records) {
            Ok(()) => {
                info!(
                    kind = %kind,
                    id,
                    collection_len = records.len(),
                    elapsed_micros = start.elapsed().as_micros(),
                    "item_created"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(kind = %kind, id, error = %err, "item_create_failed");
                Err(err)
            }
        }
    }

    /// Look up a record by id. `Ok(None)` when the id is unknown.
    pub fn find_by_id(&self, kind: ItemKind, id: u64) -> Result<Option<ItemRecord>, StoreError> {
        Ok(self
            .load_all(kind)?
            .into_iter()
            .find(|record| record.id == id))
    }

    /// Like [`find_by_id`](Self::find_by_id) but reports an unknown id as
    /// [`StoreError::NotFound`].
    pub fn fetch(&self, kind: ItemKind, id: u64) -> Result<ItemRecord, StoreError> {
        self.find_by_id(kind, id)?
            .ok_or(StoreError::NotFound { kind, id })
    }

    pub fn count(&self, kind: ItemKind) -> Result<usize, StoreError> {
        Ok(self.load_all(kind)?.len())
    }

    /// Flush backend buffers if supported.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.backend.flush()
    }

    fn lock(&self, kind: ItemKind) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_locks[Self::slot(kind)]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slot(kind: ItemKind) -> usize {
        match kind {
            ItemKind::Lost => 0,
            ItemKind::Found => 1,
        }
    }

    fn persist(&self, kind: ItemKind, records: &[ItemRecord]) -> Result<(), StoreError> {
        let payload = self.encode_collection(records)?;
        self.backend.replace(kind, &payload)?;
        debug!(kind = %kind, bytes = payload.len(), "collection_replaced");
        Ok(())
    }

    fn encode_collection(&self, records: &[ItemRecord]) -> Result<Vec<u8>, StoreError> {
        let encoded = if self.cfg.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        };
        encoded.map_err(StoreError::unavailable)
    }

    fn decode_collection(&self, kind: ItemKind, data: &[u8]) -> Result<Vec<ItemRecord>, StoreError> {
        serde_json::from_slice(data).map_err(|err| {
            warn!(kind = %kind, error = %err, "collection_decode_failed");
            StoreError::StorageUnavailable(format!("{kind} collection is corrupt: {err}"))
        })
    }
}

fn next_id_in(kind: ItemKind, records: &[ItemRecord]) -> Result<u64, StoreError> {
    match records.iter().map(|record| record.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| StoreError::StorageUnavailable(format!("{kind} id space exhausted"))),
    }
}
