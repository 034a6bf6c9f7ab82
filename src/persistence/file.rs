//! JSON file store
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a
//! crash mid-write leaves the previous file intact. A missing file reads as
//! defaults; a corrupt one is an error. Saving over an unreadable file keeps
//! the last values this store read or wrote, not the defaults.

use std::cell::Cell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ScalarStore, StoredValues};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Last values successfully read or written
    known: Cell<StoredValues>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            known: Cell::new(StoredValues::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredValues, StoreError> {
        let values = match fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoredValues::default(),
            Err(e) => return Err(e.into()),
        };
        self.known.set(values);
        Ok(values)
    }

    fn write(&self, values: &StoredValues) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        self.known.set(*values);
        log::debug!("saved {}", self.path.display());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut StoredValues)) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the save
        let mut values = self.read().unwrap_or_else(|e| {
            log::warn!("Overwriting unreadable store {}: {}", self.path.display(), e);
            self.known.get()
        });
        apply(&mut values);
        self.write(&values)
    }
}

impl ScalarStore for JsonFileStore {
    fn load_best_score(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.best_score)
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.update(|v| v.best_score = score)
    }

    fn load_sound_pref(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.sound_enabled)
    }

    fn save_sound_pref(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.update(|v| v.sound_enabled = enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        assert_eq!(store.load_best_score().unwrap(), 0);
        assert!(store.load_sound_pref().unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = JsonFileStore::new(&path);
        store.save_best_score(77).unwrap();
        store.save_sound_pref(false).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_best_score().unwrap(), 77);
        assert!(!reopened.load_sound_pref().unwrap());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_error_then_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load_best_score(), Err(StoreError::Json(_))));

        store.save_best_score(5).unwrap();
        assert_eq!(store.load_best_score().unwrap(), 5);
    }

    #[test]
    fn test_sound_save_over_corrupt_file_keeps_best() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = JsonFileStore::new(&path);
        store.save_best_score(77).unwrap();

        fs::write(&path, "garbage").unwrap();
        store.save_sound_pref(false).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_best_score().unwrap(), 77);
        assert!(!reopened.load_sound_pref().unwrap());
    }
}
