//! FreeFall entity store
//!
//! Tokens live in spawn order. Each tick every token advances by the
//! velocity it was spawned with; the first one past the boundary plus the
//! escape margin ends the round.

use serde::{Deserialize, Serialize};

use super::rng::DigitSource;
use super::token::{IdAllocator, Token, TokenId};
use crate::tuning::Tuning;

/// Points for a hit at `position`, scaled linearly from 1 at the spawn line
/// to `max_multiplier` at the boundary and rounded to the nearest integer
pub fn points_for_position(position: f32, limit: f32, max_multiplier: f32) -> u32 {
    let clamped = position.clamp(0.0, limit);
    let multiplier = (1.0 + (clamped / limit) * (max_multiplier - 1.0)).clamp(1.0, max_multiplier);
    multiplier.round() as u32
}

/// Open field of falling tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallField {
    /// Live tokens, oldest first
    pub tokens: Vec<Token>,
    spawn_timer: u32,
}

impl FallField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a token with a random digit and placement at `speed`
    pub fn spawn(
        &mut self,
        ids: &mut IdAllocator,
        rng: &mut DigitSource,
        tuning: &Tuning,
        speed: f32,
    ) -> Token {
        let value = rng.digit();
        let (lo, hi) = tuning.spawn_x_range();
        let x = rng.span(lo, hi);
        let token = Token::new(ids.next_id(), value, x, tuning.start_offset, speed);
        log::debug!("spawn {:?} value={} x={:.1} v={:.2}", token.id, value, x, speed);
        self.tokens.push(token);
        token
    }

    /// Insert an already-built token at the back of the spawn order
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Count one tick toward the next spawn; true when a spawn is due
    pub fn tick_spawn_timer(&mut self, interval: u32) -> bool {
        self.spawn_timer += 1;
        if self.spawn_timer >= interval {
            self.spawn_timer = 0;
            return true;
        }
        false
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    /// Move every token by its own velocity
    pub fn advance(&mut self) {
        for token in &mut self.tokens {
            token.step();
        }
    }

    /// First token (in spawn order) past `limit + margin`
    pub fn escaped(&self, limit: f32, margin: f32) -> Option<&Token> {
        self.tokens.iter().find(|t| t.position > limit + margin)
    }

    /// Remove the oldest token carrying `digit`
    pub fn take_first(&mut self, digit: u8) -> Option<Token> {
        let index = self.tokens.iter().position(|t| t.value == digit)?;
        Some(self.tokens.remove(index))
    }

    /// Recoil targets for the remaining tokens after a hit.
    ///
    /// Tokens are visited top to bottom; each target is at least `spacing`
    /// below the previous one so recoiled tokens never overlap.
    pub fn push_back_targets(&self, distance: f32, spacing: f32) -> Vec<(TokenId, f32)> {
        let mut order: Vec<&Token> = self.tokens.iter().collect();
        order.sort_by(|a, b| a.position.total_cmp(&b.position));

        let mut targets = Vec::with_capacity(order.len());
        let mut previous: Option<f32> = None;
        for token in order {
            let desired = token.position - distance;
            let target = match previous {
                Some(prev) => desired.max(prev + spacing),
                None => desired,
            };
            targets.push((token.id, target));
            previous = Some(target);
        }
        targets
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
