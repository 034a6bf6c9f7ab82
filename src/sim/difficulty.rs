//! Level progression and the speed/cadence curves derived from it
//!
//! Speeds are in field units per tick, intervals in ticks. A token's velocity
//! is sampled from [`fall_speed`] once at spawn and never refreshed, so a
//! level-up only affects tokens spawned after it.

use serde::{Deserialize, Serialize};

/// Highest reachable level
pub const MAX_LEVEL: u32 = 10;
/// Hits needed at one level before advancing
pub const HITS_PER_LEVEL: u32 = 5;

/// Fall speed for tokens spawned at `level`
#[inline]
pub fn fall_speed(level: u32) -> f32 {
    0.2 + 0.1 * level as f32
}

/// Ticks between FreeFall spawns
#[inline]
pub fn spawn_interval(level: u32) -> u32 {
    300u32.saturating_sub(25 * level.saturating_sub(1)).max(100)
}

/// Ticks between Row shifts
#[inline]
pub fn shift_interval(level: u32) -> u32 {
    120u32.saturating_sub(8 * level.saturating_sub(1)).max(30)
}

/// Tracks the current level and hits toward the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: u32,
    pub hits_this_level: u32,
    max_level: u32,
    hits_per_level: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(MAX_LEVEL, HITS_PER_LEVEL)
    }
}

impl Difficulty {
    pub fn new(max_level: u32, hits_per_level: u32) -> Self {
        Self {
            level: 1,
            hits_this_level: 0,
            max_level: max_level.clamp(1, MAX_LEVEL),
            hits_per_level: hits_per_level.max(1),
        }
    }

    /// Back to level 1 with no hits
    pub fn reset(&mut self) {
        self.level = 1;
        self.hits_this_level = 0;
    }

    /// Count a hit; returns the new level when this hit levelled up
    pub fn register_hit(&mut self) -> Option<u32> {
        self.hits_this_level += 1;
        if self.hits_this_level < self.hits_per_level {
            return None;
        }
        // At the cap the counter rolls over without a level change
        self.hits_this_level = 0;
        if self.level < self.max_level {
            self.level += 1;
            return Some(self.level);
        }
        None
    }

    pub fn fall_speed(&self) -> f32 {
        fall_speed(self.level)
    }

    pub fn spawn_interval(&self) -> u32 {
        spawn_interval(self.level)
    }

    pub fn shift_interval(&self) -> u32 {
        shift_interval(self.level)
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level
    }
}
