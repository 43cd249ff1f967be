//! Snapshot persistence for in-progress customizations
//!
//! The session is serialized to a single durable key-value entry on
//! every mutation, best-effort. Binary payloads never enter the
//! snapshot (excluded at the model level); previews and all
//! selection/dimension data survive the round-trip.
//!
//! The snapshot key shares its quota with unrelated session and
//! authentication data, so two guards protect that data:
//!
//! - a pre-write byte budget ([`SNAPSHOT_BYTE_BUDGET`]): an oversized
//!   snapshot is skipped entirely, never partially written
//! - quota self-eviction: if the backend still reports a quota error,
//!   the layer deletes its own key and nothing else
//!
//! Worst case is "lose the draft customization", never "corrupt
//! unrelated state".

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::session::CustomizationSession;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Single key-value table: key = snapshot key, value = JSON snapshot
const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// Fixed storage key for the customization snapshot
pub const SESSION_KEY: &str = "stitch:customization";

/// Snapshots larger than this are not written at all (2 MiB)
pub const SNAPSHOT_BYTE_BUDGET: usize = 2 * 1024 * 1024;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend refused the write for lack of space
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// KvStore
// ============================================================================

/// Durable key-value store, the engine's only stateful external
/// dependency. `set` must either write the full value or fail; a
/// quota failure is reported as [`StoreError::QuotaExceeded`].
pub trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// redb-backed key-value store
///
/// redb commits are atomic and durable as soon as `commit()` returns
/// (copy-on-write with atomic pointer swap), so a snapshot is never
/// half-written even across power loss.
pub struct RedbKvStore {
    db: Database,
}

impl RedbKvStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }
}

impl KvStore for RedbKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// In-memory key-value store with an optional byte capacity.
///
/// The capacity models a shared-quota backend (browser local storage):
/// a `set` that would push the total stored bytes over capacity fails
/// with [`StoreError::QuotaExceeded`] and leaves the store unchanged.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    map: HashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            map: HashMap::new(),
            capacity: Some(capacity_bytes),
        }
    }

    fn used_bytes(&self) -> usize {
        self.map.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(capacity) = self.capacity {
            let existing = self.map.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let after = self.used_bytes() - existing + key.len() + value.len();
            if after > capacity {
                return Err(StoreError::QuotaExceeded);
            }
        }
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.map.remove(key);
        Ok(())
    }
}

// ============================================================================
// SessionStore
// ============================================================================

/// Outcome of a snapshot save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Snapshot written
    Saved,
    /// Snapshot exceeded the byte budget; nothing was written
    SkippedOverBudget,
    /// Backend reported a quota error; our own key was deleted
    Evicted,
}

/// Session snapshot store over any [`KvStore`] backend
pub struct SessionStore {
    kv: Box<dyn KvStore>,
}

impl SessionStore {
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Serialize and persist the session under [`SESSION_KEY`].
    ///
    /// Over-budget snapshots are skipped entirely; a backend quota
    /// error triggers self-eviction of our key only. Neither condition
    /// is an error to the caller.
    pub fn save(&mut self, session: &CustomizationSession) -> StoreResult<SaveOutcome> {
        let snapshot = serde_json::to_string(session)?;

        if snapshot.len() > SNAPSHOT_BYTE_BUDGET {
            warn!(
                bytes = snapshot.len(),
                budget = SNAPSHOT_BYTE_BUDGET,
                "customization snapshot over byte budget, skipping write"
            );
            return Ok(SaveOutcome::SkippedOverBudget);
        }

        match self.kv.set(SESSION_KEY, &snapshot) {
            Ok(()) => {
                debug!(bytes = snapshot.len(), "customization snapshot saved");
                Ok(SaveOutcome::Saved)
            }
            Err(StoreError::QuotaExceeded) => {
                // Free our own key rather than risk the backend evicting
                // unrelated auth/session entries. Never touch other keys.
                warn!("storage quota exceeded, evicting customization snapshot");
                if let Err(err) = self.kv.remove(SESSION_KEY) {
                    warn!(error = %err, "failed to evict customization snapshot");
                }
                Ok(SaveOutcome::Evicted)
            }
            Err(err) => Err(err),
        }
    }

    /// Load the persisted session, if any.
    ///
    /// A missing key yields `None`; a malformed snapshot is logged and
    /// treated as missing (the draft is lost, nothing else).
    pub fn load(&self) -> Option<CustomizationSession> {
        let raw = match self.kv.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read customization snapshot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "malformed customization snapshot, discarding");
                None
            }
        }
    }

    /// Remove the persisted snapshot
    pub fn clear(&mut self) -> StoreResult<()> {
        self.kv.remove(SESSION_KEY)
    }
}
