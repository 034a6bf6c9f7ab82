//! Numbered tokens
//!
//! Only logical state lives here. Cosmetic motion (push-back recoil, row
//! slides) is tracked separately in [`super::tween::Tweens`], keyed by
//! [`TokenId`].

use serde::{Deserialize, Serialize};

/// Stable identity of a token for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

/// One number in play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// Digit 1..=9
    pub value: u8,
    /// Horizontal placement (FreeFall only, field units)
    pub x: f32,
    /// Progress along the travel axis: vertical offset in FreeFall, slot index in Row
    pub position: f32,
    /// Travel per tick, fixed at spawn
    pub velocity: f32,
}

impl Token {
    pub fn new(id: TokenId, value: u8, x: f32, position: f32, velocity: f32) -> Self {
        Self {
            id,
            value,
            x,
            position,
            velocity,
        }
    }

    /// Advance by one tick
    #[inline]
    pub fn step(&mut self) {
        self.position += self.velocity;
    }
}

/// Hands out increasing token ids
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> TokenId {
        let id = TokenId(self.next);
        self.next += 1;
        id
    }
}
