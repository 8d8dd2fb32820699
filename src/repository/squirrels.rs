//! Squirrel Repository
//!
//! CRUD over squirrel records persisted through a [`RecordStore`].

use std::path::Path;

use parking_lot::Mutex;

use crate::error::{Result, SquirrelError};
use crate::store::RecordStore;
use super::{SquirrelFields, SquirrelRecord, StoredLine};

/// First id handed out by a fresh repository
const FIRST_ID: u64 = 1;

/// Repository of squirrel records
///
/// ## Concurrency Model
///
/// - **Writes** (create/replace/delete): serialized by `write_lock`, held
///   across the whole load → modify → save cycle so no update is lost
/// - **Reads** (list/get): lock-free; saves replace the file by rename, so a
///   read sees either the old or the new content, never a mix
///
/// Nothing is cached: the backing file is the source of truth and is
/// reloaded on every call.
pub struct SquirrelRepository {
    /// Line-oriented backing store
    store: RecordStore,

    /// Serializes write operations
    write_lock: Mutex<()>,
}

/// Decoded file content
#[derive(Debug, Default)]
struct Snapshot {
    next_id: u64,
    records: Vec<SquirrelRecord>,
}

impl Snapshot {
    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

impl SquirrelRepository {
    /// Open or create a repository backed by the file at `path`
    ///
    /// The existing content is decoded once up front so a corrupt file is
    /// reported at startup rather than on the first request.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_store(RecordStore::open(path)?)
    }

    /// Wrap an already opened store
    pub fn with_store(store: RecordStore) -> Result<Self> {
        let repo = Self {
            store,
            write_lock: Mutex::new(()),
        };

        let snapshot = repo.load()?;
        tracing::debug!(
            "Repository loaded {} squirrels, next_id={}",
            snapshot.records.len(),
            snapshot.next_id
        );

        Ok(repo)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All records in creation order
    pub fn list(&self) -> Result<Vec<SquirrelRecord>> {
        Ok(self.load()?.records)
    }

    /// A single record by id
    pub fn get(&self, id: u64) -> Result<SquirrelRecord> {
        self.load()?
            .records
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(SquirrelError::NotFound(id))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a record with a fresh id
    pub fn create(&self, fields: SquirrelFields) -> Result<SquirrelRecord> {
        let (name, size) = fields.validate()?;

        let _write_guard = self.write_lock.lock();
        let mut snapshot = self.load()?;

        let id = snapshot.next_id;
        snapshot.next_id = id.checked_add(1).ok_or_else(|| {
            SquirrelError::Storage(format!("Id space exhausted at {}", id))
        })?;

        let record = SquirrelRecord { id, name, size };
        snapshot.records.push(record.clone());

        self.save(&snapshot)?;

        tracing::info!("Created squirrel {} ({:?}, {:?})", record.id, record.name, record.size);

        Ok(record)
    }

    /// Replace both fields of an existing record
    ///
    /// Fields are validated before the lookup, so a bad request against a
    /// missing id reports the validation failure.
    pub fn replace(&self, id: u64, fields: SquirrelFields) -> Result<SquirrelRecord> {
        let (name, size) = fields.validate()?;

        let _write_guard = self.write_lock.lock();
        let mut snapshot = self.load()?;

        let index = snapshot.position(id).ok_or(SquirrelError::NotFound(id))?;
        let record = &mut snapshot.records[index];
        record.name = name;
        record.size = size;
        let updated = record.clone();

        self.save(&snapshot)?;

        tracing::info!("Replaced squirrel {}", id);

        Ok(updated)
    }

    /// Remove a record
    pub fn delete(&self, id: u64) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        let mut snapshot = self.load()?;

        let index = snapshot.position(id).ok_or(SquirrelError::NotFound(id))?;
        snapshot.records.remove(index);

        self.save(&snapshot)?;

        tracing::info!("Deleted squirrel {}", id);

        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Id the next create will receive
    pub fn next_id(&self) -> Result<u64> {
        Ok(self.load()?.next_id)
    }

    /// Get the underlying record store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Decode the backing file
    ///
    /// The counter is the larger of the stored meta value and `max(id) + 1`,
    /// which covers files written without a meta line. It saturates at
    /// `u64::MAX`, an id `create` never hands out.
    fn load(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot {
            next_id: FIRST_ID,
            records: Vec::new(),
        };

        for (index, line) in self.store.load_strings()?.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match StoredLine::decode(line)? {
                StoredLine::Meta { next_id } => {
                    snapshot.next_id = snapshot.next_id.max(next_id);
                }
                StoredLine::Squirrel(record) => {
                    if snapshot.position(record.id).is_some() {
                        return Err(SquirrelError::Storage(format!(
                            "Duplicate squirrel id {} on line {}",
                            record.id, index
                        )));
                    }
                    snapshot.next_id = snapshot.next_id.max(record.id.saturating_add(1));
                    snapshot.records.push(record);
                }
            }
        }

        Ok(snapshot)
    }

    /// Encode and persist a snapshot, meta line first
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut lines = Vec::with_capacity(snapshot.records.len() + 1);
        lines.push(
            StoredLine::Meta {
                next_id: snapshot.next_id,
            }
            .encode()?,
        );
        for record in &snapshot.records {
            lines.push(StoredLine::Squirrel(record.clone()).encode()?);
        }

        self.store.save_strings(&lines)
    }
}
