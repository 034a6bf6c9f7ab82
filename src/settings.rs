//! Player preferences
//!
//! Persisted through the [`ScalarStore`], separately from the best score.

use serde::{Deserialize, Serialize};

use crate::persistence::ScalarStore;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Audio and haptic cues on/off
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults if the store fails
    pub fn load(store: &dyn ScalarStore) -> Self {
        match store.load_sound_pref() {
            Ok(sound_enabled) => {
                log::info!("Loaded settings (sound {})", on_off(sound_enabled));
                Self { sound_enabled }
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn ScalarStore) {
        match store.save_sound_pref(self.sound_enabled) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
