//! Cosmetic tweens, kept out of the logical token state
//!
//! A tween describes a display offset added to a token's logical position.
//! Nothing in the simulation reads these back; a headless run can ignore the
//! table entirely and produce the same outcomes.

use std::collections::HashMap;

use super::token::TokenId;

/// A time-based interpolation between two offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Wall-clock start (seconds)
    pub start: f64,
    /// Duration (seconds)
    pub duration: f64,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Eased (quadratic out) value at `now`
    pub fn value_at(&self, now: f64) -> f32 {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_done(&self, now: f64) -> bool {
        now - self.start >= self.duration
    }
}

/// Side table of active tweens keyed by token identity
#[derive(Debug, Clone, Default)]
pub struct Tweens {
    active: HashMap<TokenId, Tween>,
}

impl Tweens {
    /// Start (or replace) the tween for `id`
    pub fn start(&mut self, id: TokenId, tween: Tween) {
        self.active.insert(id, tween);
    }

    /// Display offset for `id` at `now`, 0 when idle
    pub fn offset(&self, id: TokenId, now: f64) -> f32 {
        self.active.get(&id).map_or(0.0, |t| t.value_at(now))
    }

    pub fn remove(&mut self, id: TokenId) {
        self.active.remove(&id);
    }

    /// Drop finished tweens
    pub fn prune(&mut self, now: f64) {
        self.active.retain(|_, t| !t.is_done(now));
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
