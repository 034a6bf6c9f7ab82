//! Data-driven game balance
//!
//! [`Tuning`] carries every geometry and timing constant the simulation
//! reads. Defaults mirror [`crate::consts`]; a TOML file may override any
//! subset of keys, e.g.
//!
//! ```toml
//! field_height = 800.0
//! row_length = 9
//! ```
//!
//! The level curves themselves (fall speed, spawn and shift cadence) are not
//! tunable; they live in [`crate::sim::difficulty`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Runtime-tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field geometry (FreeFall) ===
    pub field_width: f32,
    /// Distance from spawn line to the danger boundary
    pub field_height: f32,
    /// Horizontal inset as a fraction of the width
    pub spawn_margin: f32,
    /// Starting travel position (negative = above the field)
    pub start_offset: f32,
    /// How far past the boundary a token may travel before it counts as escaped
    pub escape_margin: f32,

    // === Ledger / progression ===
    pub starting_lives: u32,
    pub hits_per_level: u32,
    pub max_level: u32,

    // === Row mode ===
    pub row_length: usize,

    // === Timing (ticks) ===
    pub countdown_step_ticks: u32,
    pub go_hold_ticks: u32,
    pub shift_commit_ticks: u32,
    pub banner_ticks: u32,

    // === Scoring ===
    pub max_multiplier: f32,

    // === Cosmetics ===
    pub push_back_base: f32,
    pub push_back_per_level: f32,
    pub push_back_spacing: f32,
    /// Push-back recoil duration (seconds)
    pub push_back_secs: f64,
    /// Row slide duration (seconds)
    pub slide_secs: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            spawn_margin: SPAWN_MARGIN,
            start_offset: START_OFFSET,
            escape_margin: ESCAPE_MARGIN,

            starting_lives: STARTING_LIVES,
            hits_per_level: crate::sim::difficulty::HITS_PER_LEVEL,
            max_level: crate::sim::difficulty::MAX_LEVEL,

            row_length: ROW_LENGTH,

            countdown_step_ticks: COUNTDOWN_STEP_TICKS,
            go_hold_ticks: GO_HOLD_TICKS,
            shift_commit_ticks: SHIFT_COMMIT_TICKS,
            banner_ticks: BANNER_TICKS,

            max_multiplier: MAX_MULTIPLIER,

            push_back_base: 0.07,
            push_back_per_level: 0.01,
            push_back_spacing: 40.0,
            push_back_secs: 0.18,
            slide_secs: 0.18,
        }
    }
}

impl Tuning {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = toml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_toml_str(&text)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load from a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning ({})", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.field_width > 0.0) {
            return Err(invalid("field_width", "must be positive"));
        }
        if !(self.field_height > 0.0) {
            return Err(invalid("field_height", "must be positive"));
        }
        if !(0.0..0.5).contains(&self.spawn_margin) {
            return Err(invalid("spawn_margin", "must be in [0, 0.5)"));
        }
        if self.row_length == 0 {
            return Err(invalid("row_length", "must be at least 1"));
        }
        if !(1..=crate::sim::difficulty::MAX_LEVEL).contains(&self.max_level) {
            return Err(invalid("max_level", "must be in 1..=10"));
        }
        if self.hits_per_level == 0 {
            return Err(invalid("hits_per_level", "must be at least 1"));
        }
        if self.max_multiplier < 1.0 {
            return Err(invalid("max_multiplier", "must be at least 1"));
        }
        Ok(())
    }

    /// Exclusive range of spawn x positions
    pub fn spawn_x_range(&self) -> (f32, f32) {
        let pad = self.field_width * self.spawn_margin;
        (pad, self.field_width - pad)
    }

    /// Push-back distance at `level`
    pub fn push_back_distance(&self, level: u32) -> f32 {
        let fraction = self.push_back_base + self.push_back_per_level * level.saturating_sub(1) as f32;
        self.field_height * fraction
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}
