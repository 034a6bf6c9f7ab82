//! Number Shooter - a reflex arcade game
//!
//! Numbered tokens move toward an exit; the player arms a digit and fires
//! before they get there.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, difficulty, session state machine)
//! - `game`: Per-frame driver wiring the simulation to storage and audio cues
//! - `persistence`: Best score and preferences storage
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{StoreError, TuningError};
pub use game::{Game, Renderer};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per rendered frame)
    pub const SIM_HZ: u32 = 60;
    /// Seconds per tick
    pub const SIM_DT: f64 = 1.0 / SIM_HZ as f64;

    /// Field dimensions (abstract units, independent of display scale)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Horizontal spawn inset as a fraction of the width
    pub const SPAWN_MARGIN: f32 = 0.1;
    /// Tokens start just above the field
    pub const START_OFFSET: f32 = -40.0;
    /// Travel allowed past the bottom before a token has escaped
    pub const ESCAPE_MARGIN: f32 = 40.0;

    pub const STARTING_LIVES: u32 = 3;
    pub const ROW_LENGTH: usize = 7;

    /// Countdown holds each of 3, 2, 1 for one second
    pub const COUNTDOWN_STEP_TICKS: u32 = 60;
    /// "GO!" stays up ~0.7s
    pub const GO_HOLD_TICKS: u32 = 42;
    /// Row shift lands ~180ms after its slide starts
    pub const SHIFT_COMMIT_TICKS: u32 = 11;
    /// Level banner shows for ~2s of play
    pub const BANNER_TICKS: u32 = 120;

    /// Hit multiplier at the boundary
    pub const MAX_MULTIPLIER: f32 = 4.0;
}
