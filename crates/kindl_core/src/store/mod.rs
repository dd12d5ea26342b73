//! Behavior snapshot persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the `load`/`save` pair the session uses for durability.
//! - Keep storage details (SQLite, JSON files) out of tracker logic.
//!
//! # Invariants
//! - `save` replaces the whole persisted snapshot atomically.
//! - `load` returns `None` when nothing was ever saved.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod json_file;
pub mod sqlite;

use crate::db::DbError;
use crate::model::behavior::{BehaviorSnapshot, InvalidSnapshot};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use json_file::JsonFileBehaviorStore;
pub use sqlite::SqliteBehaviorStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for behavior snapshots.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "behavior store I/O failed: {err}"),
            Self::Serialization(err) => write!(f, "behavior snapshot encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted behavior data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<InvalidSnapshot> for StoreError {
    fn from(value: InvalidSnapshot) -> Self {
        Self::InvalidData(value.0)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Durable home for tracker counters across process restarts.
pub trait BehaviorStore {
    /// Short label used in log events.
    fn kind(&self) -> &'static str;
    fn load(&self) -> StoreResult<Option<BehaviorSnapshot>>;
    fn save(&mut self, snapshot: &BehaviorSnapshot) -> StoreResult<()>;
}

/// Process-lifetime store; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryBehaviorStore {
    snapshot: Option<BehaviorSnapshot>,
}

impl MemoryBehaviorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BehaviorStore for MemoryBehaviorStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> StoreResult<Option<BehaviorSnapshot>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &BehaviorSnapshot) -> StoreResult<()> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}

impl<S: BehaviorStore + ?Sized> BehaviorStore for Box<S> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn load(&self) -> StoreResult<Option<BehaviorSnapshot>> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &BehaviorSnapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::{BehaviorStore, MemoryBehaviorStore};
    use crate::model::behavior::BehaviorSnapshot;

    #[test]
    fn memory_store_starts_empty_and_keeps_last_save() {
        let mut store = MemoryBehaviorStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&BehaviorSnapshot::default()).unwrap();
        assert_eq!(store.load().unwrap(), Some(BehaviorSnapshot::default()));
    }
}
