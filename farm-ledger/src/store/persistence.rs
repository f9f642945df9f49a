//! redb-backed snapshot persistence
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `snapshots` | `"farm"` | JSON-serialized [`Farm`] | Whole-aggregate snapshot |
//!
//! The entire farm aggregate is one JSON document, replaced wholesale on
//! every committed command. redb's copy-on-write commit keeps the file
//! consistent across power loss: a reload sees either the previous or the
//! new snapshot, never a torn one.

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::Farm;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Snapshot table: key = aggregate name, value = JSON-serialized Farm
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

const SNAPSHOT_KEY: &str = "farm";

/// Persistence errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Snapshot backend seam
///
/// The in-memory gateway only needs load-on-start and save-on-commit;
/// anything that can do those two (or deliberately fail them, in tests)
/// can stand behind it.
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted snapshot; `None` on first run
    fn load(&self) -> PersistenceResult<Option<Farm>>;

    /// Replace the persisted snapshot
    fn save(&self, farm: &Farm) -> PersistenceResult<()>;
}

/// Farm snapshot storage backed by redb
#[derive(Clone)]
pub struct FarmStorage {
    db: Arc<Database>,
}

impl FarmStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate`: once `save` returns,
    /// the snapshot survives power loss.
    pub fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing and ephemeral runs)
    pub fn open_in_memory() -> PersistenceResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl SnapshotStore for FarmStorage {
    fn load(&self) -> PersistenceResult<Option<Farm>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;

        match table.get(SNAPSHOT_KEY)? {
            Some(value) => {
                let farm: Farm = serde_json::from_slice(value.value())?;
                Ok(Some(farm))
            }
            None => Ok(None),
        }
    }

    fn save(&self, farm: &Farm) -> PersistenceResult<()> {
        let value = serde_json::to_vec(farm)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SNAPSHOTS_TABLE)?;
            table.insert(SNAPSHOT_KEY, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
