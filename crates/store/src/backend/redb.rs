//! Redb (Rust embedded database) backend for item storage.
//!
//! Both collections live in one table keyed by collection name. A replace is
//! a single write transaction, so redb's MVCC gives readers the old blob until
//! the commit lands.
//!
//! # Configuration Example
//! ```yaml
//! store:
//!   backend: "redb"
//!   path: "/data/lostfound.redb"
//! ```

use crate::{ItemKind, StoreBackend, StoreError};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;

const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// Redb backend for persistent collection storage.
///
/// The `Arc<Database>` wrapper allows safe sharing across threads; redb
/// handles its own internal locking.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a Redb database at the given path.
    ///
    /// ```no_run
    /// use store::RedbBackend;
    ///
    /// let backend = RedbBackend::open("/tmp/lostfound.redb").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(StoreError::unavailable)?;

        // Create the table up front so read transactions never miss it.
        let write_txn = db.begin_write().map_err(StoreError::unavailable)?;
        {
            let _table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(StoreError::unavailable)?;
        }
        write_txn.commit().map_err(StoreError::unavailable)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StoreBackend for RedbBackend {
    fn load(&self, kind: ItemKind) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::unavailable)?;
        let table = read_txn
            .open_table(COLLECTIONS_TABLE)
            .map_err(StoreError::unavailable)?;

        match table.get(kind.as_str()).map_err(StoreError::unavailable)? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn replace(&self, kind: ItemKind, payload: &[u8]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(StoreError::unavailable)?;
        {
            let mut table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(StoreError::unavailable)?;
            table
                .insert(kind.as_str(), payload)
                .map_err(StoreError::unavailable)?;
        }
        write_txn.commit().map_err(StoreError::unavailable)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        // Commits are durable on return.
        Ok(())
    }
}
