use crate::{ItemKind, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;

/// Durable home of the encoded collections.
///
/// A backend stores one opaque blob per collection. `replace` must be atomic:
/// a concurrent or later `load` returns either the old blob or the new one,
/// never a mix, and a failed `replace` leaves the old blob in place.
pub trait StoreBackend: Send + Sync {
    /// Current blob for `kind`, or `None` if the collection was never written.
    fn load(&self, kind: ItemKind) -> Result<Option<Vec<u8>>, StoreError>;
    /// Atomically swap the blob for `kind`.
    fn replace(&self, kind: ItemKind, payload: &[u8]) -> Result<(), StoreError>;
    /// Flush any buffered writes to the backend.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Configuration for selecting and building a backend.
///
/// # Example
/// ```
/// use store::BackendConfig;
///
/// // In-memory (for testing)
/// let config = BackendConfig::in_memory();
///
/// // One JSON file per collection
/// let config = BackendConfig::json_dir("data");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// `lost_items.json` / `found_items.json` under `dir`.
    JsonFile { dir: String },
    /// Single redb database file. Requires the `backend-redb` feature.
    Redb { path: String },
    /// Process-local storage, lost on exit.
    InMemory,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::JsonFile {
            dir: "data".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn json_dir<P: Into<String>>(dir: P) -> Self {
        BackendConfig::JsonFile { dir: dir.into() }
    }

    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Build the backend based on the configuration.
    ///
    /// Fails with [`StoreError::StorageUnavailable`] if the location cannot be
    /// opened or the backend was disabled at compile time.
    pub fn build(&self) -> Result<Box<dyn StoreBackend>, StoreError> {
        match self {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::JsonFile { dir } => Ok(Box::new(JsonFileBackend::open(dir)?)),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbBackend::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::unavailable("redb backend disabled at compile time"))
                }
            }
        }
    }
}

/// An in-memory backend using a `RwLock` around a `HashMap`.
pub struct InMemoryBackend {
    collections: RwLock<HashMap<ItemKind, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for InMemoryBackend {
    fn load(&self, kind: ItemKind) -> Result<Option<Vec<u8>>, StoreError> {
        let guard = self
            .collections
            .read()
            .map_err(|_| StoreError::unavailable("poisoned lock"))?;
        Ok(guard.get(&kind).cloned())
    }

    fn replace(&self, kind: ItemKind, payload: &[u8]) -> Result<(), StoreError> {
        self.collections
            .write()
            .map_err(|_| StoreError::unavailable("poisoned lock"))?
            .insert(kind, payload.to_vec());
        Ok(())
    }
}

mod file;
pub use file::JsonFileBackend;

/// The Redb backend implementation.
#[cfg(feature = "backend-redb")]
pub mod redb;

#[cfg(feature = "backend-redb")]
pub use self::redb::RedbBackend;
