//! Persistent scalar storage
//!
//! Only two values outlive a session: the best score and the sound
//! preference. Stores report failures as [`StoreError`]; the game driver logs
//! them and carries on with in-memory values.

pub mod file;

pub use file::JsonFileStore;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Everything that is persisted, as one JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredValues {
    pub best_score: u64,
    pub sound_enabled: bool,
}

impl Default for StoredValues {
    fn default() -> Self {
        Self {
            best_score: 0,
            sound_enabled: true,
        }
    }
}

/// Backing store for the best score and sound preference
pub trait ScalarStore {
    fn load_best_score(&self) -> Result<u64, StoreError>;
    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError>;
    fn load_sound_pref(&self) -> Result<bool, StoreError>;
    fn save_sound_pref(&mut self, enabled: bool) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: StoredValues,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: StoredValues) -> Self {
        Self { values }
    }

    pub fn values(&self) -> StoredValues {
        self.values
    }
}

impl ScalarStore for MemoryStore {
    fn load_best_score(&self) -> Result<u64, StoreError> {
        Ok(self.values.best_score)
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.values.best_score = score;
        Ok(())
    }

    fn load_sound_pref(&self) -> Result<bool, StoreError> {
        Ok(self.values.sound_enabled)
    }

    fn save_sound_pref(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.values.sound_enabled = enabled;
        Ok(())
    }
}
