//! Seeded value source
//!
//! Every random decision in a session (token digits, horizontal placement)
//! is drawn from one `Pcg32` stream so a seed plus an input sequence replays
//! exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Smallest digit a token can carry
pub const MIN_DIGIT: u8 = 1;
/// Largest digit a token can carry
pub const MAX_DIGIT: u8 = 9;

/// Deterministic source of token digits and placements
#[derive(Debug, Clone)]
pub struct DigitSource {
    seed: u64,
    rng: Pcg32,
}

impl DigitSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform digit in `1..=9`
    pub fn digit(&mut self) -> u8 {
        self.rng.random_range(MIN_DIGIT..=MAX_DIGIT)
    }

    /// Uniform value in `[lo, hi)`; returns `lo` when the range is empty
    pub fn span(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }
}
