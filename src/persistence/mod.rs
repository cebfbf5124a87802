//! Record persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic replace (write tmp, then rename over the record file)
//! - Corrupt files degrade to empty records instead of failing the session

pub mod file;

pub use file::JsonFileStore;

use crate::error::StoreError;
use crate::highscores::Records;

/// Where player records live between sessions
pub trait RecordStore {
    fn load(&self) -> Result<Records, StoreError>;

    fn save(&mut self, records: &Records) -> Result<(), StoreError>;

    /// Load, falling back to empty records if storage is unreadable
    fn load_or_default(&self) -> Records {
        match self.load() {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Could not read records, starting fresh: {}", err);
                Records::default()
            }
        }
    }
}

/// Store kept in memory, for tests and sessions that should not touch disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Records,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new(records: Records) -> Self {
        Self { records, saves: 0 }
    }

    pub fn records(&self) -> &Records {
        &self.records
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Records, StoreError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &Records) -> Result<(), StoreError> {
        self.records = records.clone();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GameMode;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        let mut records = store.load_or_default();
        records.record_score(GameMode::Normal, 12);
        store.save(&records).unwrap();

        assert_eq!(store.load().unwrap().best_for(GameMode::Normal), 12);
        assert_eq!(store.saves, 1);
    }
}
