//! The two play modes behind one interface
//!
//! A session picks its [`Mode`] once; everything mode-specific (how tokens
//! enter, move, get hit and cause failure) dispatches through [`Playfield`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::fall::{FallField, points_for_position};
use super::rng::DigitSource;
use super::row::RowField;
use super::token::{IdAllocator, Token};
use crate::tuning::Tuning;

/// Which rule set a session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Tokens fall across an open field; escaping the bottom costs a life
    #[default]
    FreeFall,
    /// Tokens shift along a fixed row; overflowing the exit ends the game
    Row,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::FreeFall => "FreeFall",
            Mode::Row => "Row",
        }
    }

    /// Whether this mode keeps a lives ledger
    pub fn has_lives(&self) -> bool {
        matches!(self, Mode::FreeFall)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" | "freefall" | "fall" => Ok(Mode::FreeFall),
            "row" => Ok(Mode::Row),
            _ => Err(format!("unknown mode `{}` (expected free or row)", s)),
        }
    }
}

/// A successful fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireHit {
    pub token: Token,
    pub points: u32,
    /// Slot the token was cleared from (Row only)
    pub slot: Option<usize>,
}

/// What the per-tick spawn/shift step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOutcome {
    Idle,
    /// FreeFall: a new token entered the field
    Spawned(Token),
    /// Row: a shift started, staging this token for the entry slot
    ShiftStarted(Token),
    /// Row: the exit slot was occupied when a shift came due
    Overflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Playfield {
    FreeFall(FallField),
    Row(RowField),
}

impl Playfield {
    pub fn new(mode: Mode, tuning: &Tuning) -> Self {
        match mode {
            Mode::FreeFall => Playfield::FreeFall(FallField::new()),
            Mode::Row => Playfield::Row(RowField::new(tuning.row_length)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Playfield::FreeFall(_) => Mode::FreeFall,
            Playfield::Row(_) => Mode::Row,
        }
    }

    /// Put the round's opening token into play
    pub fn open_round(
        &mut self,
        ids: &mut IdAllocator,
        rng: &mut DigitSource,
        tuning: &Tuning,
        difficulty: &Difficulty,
    ) -> Token {
        match self {
            Playfield::FreeFall(field) => field.spawn(ids, rng, tuning, difficulty.fall_speed()),
            Playfield::Row(row) => {
                let token = row_token(ids, rng, difficulty);
                row.place_entry(token);
                token
            }
        }
    }

    /// Per-tick motion (FreeFall only; the row moves by shifts)
    pub fn advance(&mut self) {
        if let Playfield::FreeFall(field) = self {
            field.advance();
        }
    }

    /// Per-tick cadence: spawn a falling token or start a row shift when due
    pub fn spawn_tick(
        &mut self,
        ids: &mut IdAllocator,
        rng: &mut DigitSource,
        tuning: &Tuning,
        difficulty: &Difficulty,
    ) -> SpawnOutcome {
        match self {
            Playfield::FreeFall(field) => {
                if field.tick_spawn_timer(difficulty.spawn_interval()) {
                    let token = field.spawn(ids, rng, tuning, difficulty.fall_speed());
                    return SpawnOutcome::Spawned(token);
                }
                SpawnOutcome::Idle
            }
            Playfield::Row(row) => {
                if !row.tick_shift_timer(difficulty.shift_interval()) {
                    return SpawnOutcome::Idle;
                }
                if row.pending().is_some() {
                    row.commit_shift();
                }
                if row.is_exit_occupied() {
                    return SpawnOutcome::Overflow;
                }
                let token = row_token(ids, rng, difficulty);
                log::debug!("shift staged {:?} value={}", token.id, token.value);
                row.begin_shift(token);
                SpawnOutcome::ShiftStarted(token)
            }
        }
    }

    /// Hit the first token matching `digit` under this mode's tie-break rule
    pub fn resolve_fire(&mut self, digit: u8, tuning: &Tuning) -> Option<FireHit> {
        match self {
            Playfield::FreeFall(field) => {
                let token = field.take_first(digit)?;
                let points =
                    points_for_position(token.position, tuning.field_height, tuning.max_multiplier);
                Some(FireHit {
                    token,
                    points,
                    slot: None,
                })
            }
            Playfield::Row(row) => {
                let (slot, token) = row.take_first(digit)?;
                Some(FireHit {
                    token,
                    points: 1,
                    slot: Some(slot),
                })
            }
        }
    }

    /// FreeFall: a token has escaped. Row: the exit slot is occupied.
    pub fn check_failure(&self, tuning: &Tuning) -> bool {
        match self {
            Playfield::FreeFall(field) => field
                .escaped(tuning.field_height, tuning.escape_margin)
                .is_some(),
            Playfield::Row(row) => row.is_exit_occupied(),
        }
    }

    /// Apply a staged row shift; no-op in FreeFall
    pub fn commit_shift(&mut self) -> bool {
        match self {
            Playfield::FreeFall(_) => false,
            Playfield::Row(row) => row.commit_shift(),
        }
    }

    /// Remove every live token (and any staged shift)
    pub fn clear(&mut self) {
        match self {
            Playfield::FreeFall(field) => field.clear(),
            Playfield::Row(row) => row.clear(),
        }
    }

    /// Live tokens in store order
    pub fn tokens(&self) -> Vec<Token> {
        match self {
            Playfield::FreeFall(field) => field.tokens.clone(),
            Playfield::Row(row) => row.slots().iter().flatten().copied().collect(),
        }
    }

    pub fn token_count(&self) -> usize {
        match self {
            Playfield::FreeFall(field) => field.len(),
            Playfield::Row(row) => row.occupied(),
        }
    }

    /// The token most at risk: lowest falling token, or the one nearest the row exit
    pub fn most_urgent(&self) -> Option<Token> {
        match self {
            Playfield::FreeFall(field) => field
                .tokens
                .iter()
                .max_by(|a, b| a.position.total_cmp(&b.position))
                .copied(),
            Playfield::Row(row) => row.slots().iter().rev().flatten().next().copied(),
        }
    }

    pub fn as_fall(&self) -> Option<&FallField> {
        match self {
            Playfield::FreeFall(field) => Some(field),
            Playfield::Row(_) => None,
        }
    }

    pub fn as_fall_mut(&mut self) -> Option<&mut FallField> {
        match self {
            Playfield::FreeFall(field) => Some(field),
            Playfield::Row(_) => None,
        }
    }

    pub fn as_row(&self) -> Option<&RowField> {
        match self {
            Playfield::Row(row) => Some(row),
            Playfield::FreeFall(_) => None,
        }
    }

    pub fn as_row_mut(&mut self) -> Option<&mut RowField> {
        match self {
            Playfield::Row(row) => Some(row),
            Playfield::FreeFall(_) => None,
        }
    }
}

/// Row tokens advance one slot per shift; velocity records that rate at spawn
fn row_token(ids: &mut IdAllocator, rng: &mut DigitSource, difficulty: &Difficulty) -> Token {
    let velocity = 1.0 / difficulty.shift_interval() as f32;
    Token::new(ids.next_id(), rng.digit(), 0.0, -1.0, velocity)
}
