//! JSON file record store

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::RecordStore;
use crate::error::StoreError;
use crate::highscores::Records;

/// Current envelope version
pub const RECORDS_VERSION: u32 = 1;

/// File name inside the data directory
pub const RECORDS_FILE: &str = "records.json";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    records: Records,
}

/// Records stored as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default file name inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(RECORDS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    /// A missing file is an empty record set
    fn load(&self) -> Result<Records, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No records at {}, starting fresh", self.path.display());
                return Ok(Records::default());
            }
            Err(err) => return Err(err.into()),
        };

        let envelope: Envelope = serde_json::from_str(&data)?;
        if envelope.version != RECORDS_VERSION {
            log::warn!(
                "Records file version {} (expected {}), reading anyway",
                envelope.version,
                RECORDS_VERSION
            );
        }
        log::info!(
            "Loaded records: {} modes, {} coins",
            envelope.records.best.len(),
            envelope.records.coins
        );
        Ok(envelope.records)
    }

    fn save(&mut self, records: &Records) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let envelope = Envelope {
            version: RECORDS_VERSION,
            records: records.clone(),
        };
        let data = serde_json::to_vec_pretty(&envelope)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;

        log::info!("Records saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GameMode;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert_eq!(store.load().unwrap(), Records::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path().join("nested"));

        let mut records = Records::new();
        records.record_score(GameMode::Lava, 640);
        records.add_coins(9);
        store.save(&records).unwrap();

        assert_eq!(store.load().unwrap(), records);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_degrades_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Json(_))));
        assert_eq!(store.load_or_default(), Records::default());
    }
}
