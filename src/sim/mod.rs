//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (spawn order / slot order)
//! - No rendering, audio or storage dependencies

pub mod difficulty;
pub mod fall;
pub mod playfield;
pub mod rng;
pub mod row;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod token;
pub mod tween;

pub use difficulty::{Difficulty, HITS_PER_LEVEL, MAX_LEVEL, fall_speed, shift_interval, spawn_interval};
pub use fall::{FallField, points_for_position};
pub use playfield::{FireHit, Mode, Playfield, SpawnOutcome};
pub use rng::DigitSource;
pub use row::RowField;
pub use scheduler::{Deferred, Scheduler};
pub use state::{
    Banner, COUNTDOWN_GO, COUNTDOWN_START, Cursor, GameEvent, GamePhase, Ledger, Session, Snapshot,
    TokenView,
};
pub use tick::{TickInput, tick};
pub use token::{Token, TokenId};
pub use tween::{Tween, Tweens};
