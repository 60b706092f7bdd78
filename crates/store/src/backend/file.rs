//! One JSON file per collection, replaced atomically.
//!
//! Layout matches the data directory the service has always used:
//!
//! ```text
//! data/
//!   lost_items.json
//!   found_items.json
//! ```
//!
//! A write goes to a temporary file inside the same directory, is synced,
//! and is then renamed over the target. Rename within one filesystem is
//! atomic, so readers never observe a truncated collection.

use crate::{ItemKind, StoreBackend, StoreError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Open (creating if needed) the data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::StorageUnavailable(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn collection_path(&self, kind: ItemKind) -> PathBuf {
        self.dir.join(format!("{}_items.json", kind.as_str()))
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self, kind: ItemKind) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.collection_path(kind);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::StorageUnavailable(format!(
                "cannot read {}: {err}",
                path.display()
            ))),
        }
    }

    fn replace(&self, kind: ItemKind, payload: &[u8]) -> Result<(), StoreError> {
        let target = self.collection_path(kind);
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(StoreError::unavailable)?;
        temp.write_all(payload).map_err(StoreError::unavailable)?;
        temp.as_file().sync_all().map_err(StoreError::unavailable)?;
        // Dropping an unpersisted temp file removes it, so a failure above
        // leaves only the old collection behind.
        temp.persist(&target).map_err(|e| {
            StoreError::StorageUnavailable(format!("cannot replace {}: {}", target.display(), e.error))
        })?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        // Every replace already synced its file.
        Ok(())
    }
}
