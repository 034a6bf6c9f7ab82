//! Session state and the phase machine
//!
//! Everything a running game owns lives in [`Session`]: ledger, difficulty,
//! cursor, the active [`Playfield`], the RNG and the deferred-action queue.
//! Input handlers and [`super::tick::tick`] are the only ways to mutate it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::playfield::{FireHit, Mode, Playfield, SpawnOutcome};
use super::rng::{DigitSource, MAX_DIGIT, MIN_DIGIT};
use super::scheduler::{Deferred, Scheduler};
use super::token::{IdAllocator, Token, TokenId};
use super::tween::{Tween, Tweens};
use crate::tuning::Tuning;

/// Countdown value shown as "GO!"
pub const COUNTDOWN_GO: u8 = 0;
/// First countdown value
pub const COUNTDOWN_START: u8 = 3;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Counting down to a round: 3, 2, 1, then [`COUNTDOWN_GO`]
    Countdown(u8),
    /// Tokens moving, fire input live
    Playing,
    /// A token escaped; waiting for the player to continue
    MissPause,
    /// Run ended; waiting for restart
    GameOver,
}

impl GamePhase {
    /// Text for the countdown overlay
    pub fn countdown_label(&self) -> Option<String> {
        match self {
            GamePhase::Countdown(COUNTDOWN_GO) => Some("GO!".to_string()),
            GamePhase::Countdown(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Notifications for renderer/audio/storage collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Countdown finished; play is live
    RoundStarted,
    /// A token entered play
    Spawned { id: TokenId, value: u8 },
    /// Fire removed a token
    Hit { value: u8, points: u32 },
    /// Fire found no matching token
    FireMissed { digit: u8 },
    /// A token escaped (FreeFall) or the row overflowed (Row)
    Miss { lives: Option<u32> },
    LevelUp { level: u32 },
    GameOver { score: u64, new_best: bool },
    NewBest { score: u64 },
}

/// Score, lives and misses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub score: u64,
    /// `None` in modes without lives
    pub lives: Option<u32>,
    pub misses: u32,
    pub best_score: u64,
}

impl Ledger {
    fn fresh(mode: Mode, starting_lives: u32, best_score: u64) -> Self {
        Self {
            score: 0,
            lives: mode.has_lives().then_some(starting_lives),
            misses: 0,
            best_score,
        }
    }
}

/// The player's armed digit, wrapping 1..=9 both ways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor(u8);

impl Default for Cursor {
    fn default() -> Self {
        Cursor(MIN_DIGIT)
    }
}

impl Cursor {
    pub fn digit(&self) -> u8 {
        self.0
    }

    pub fn adjust(&mut self, delta: i32) {
        let span = (MAX_DIGIT - MIN_DIGIT + 1) as i32;
        let offset = (self.0 - MIN_DIGIT) as i32 + delta.rem_euclid(span);
        self.0 = offset.rem_euclid(span) as u8 + MIN_DIGIT;
    }
}

/// Transient message such as "LEVEL 2 START!"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub ticks_left: u32,
}

/// A token as the renderer should draw it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenView {
    pub id: TokenId,
    pub value: u8,
    /// FreeFall: (x, y) in field units. Row: (slot, 0) with slide offset applied.
    pub pos: Vec2,
}

/// Read-only view of the session, rebuilt once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub mode: Mode,
    pub score: u64,
    pub lives: Option<u32>,
    pub misses: u32,
    pub level: u32,
    pub hits_this_level: u32,
    pub selected_digit: u8,
    pub best_score: u64,
    pub new_best: bool,
    pub banner: Option<String>,
    pub tokens: Vec<TokenView>,
    /// Row mode slot digits, entry first; empty in FreeFall
    pub slots: Vec<Option<u8>>,
}

/// The single owned game state
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: GamePhase,
    pub ledger: Ledger,
    pub difficulty: Difficulty,
    pub cursor: Cursor,
    pub field: Playfield,
    pub tuning: Tuning,
    pub banner: Option<Banner>,
    /// Whether the final score tied or beat the best, fixed at game over
    pub new_best: bool,
    /// Lives ran out; the next continue ends the run
    pending_game_over: bool,
    rng: DigitSource,
    ids: IdAllocator,
    pub(crate) scheduler: Scheduler,
    pub(crate) tweens: Tweens,
    events: Vec<GameEvent>,
    /// Wall clock of the latest tick (seconds), used only for tweens
    pub(crate) now: f64,
}

impl Session {
    /// Start a session in `mode`; the first countdown begins immediately
    pub fn new(mode: Mode, seed: u64, tuning: Tuning, best_score: u64) -> Self {
        let mut session = Self {
            phase: GamePhase::Countdown(COUNTDOWN_START),
            ledger: Ledger::fresh(mode, tuning.starting_lives, best_score),
            difficulty: Difficulty::new(tuning.max_level, tuning.hits_per_level),
            cursor: Cursor::default(),
            field: Playfield::new(mode, &tuning),
            tuning,
            banner: None,
            new_best: false,
            pending_game_over: false,
            rng: DigitSource::new(seed),
            ids: IdAllocator::default(),
            scheduler: Scheduler::new(),
            tweens: Tweens::default(),
            events: Vec::new(),
            now: 0.0,
        };
        session.restart();
        session
    }

    pub fn mode(&self) -> Mode {
        self.field.mode()
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Reset ledger and difficulty (keeping the best score) and count down again.
    /// Anything still scheduled from the previous round is discarded.
    pub fn restart(&mut self) {
        self.scheduler.invalidate();
        self.tweens.clear();
        self.field.clear();

        let mode = self.mode();
        self.ledger = Ledger::fresh(mode, self.tuning.starting_lives, self.ledger.best_score);
        self.difficulty.reset();
        self.cursor = Cursor::default();
        self.new_best = false;
        self.pending_game_over = false;
        self.show_level_banner();

        let opening = self
            .field
            .open_round(&mut self.ids, &mut self.rng, &self.tuning, &self.difficulty);
        self.events.push(GameEvent::Spawned {
            id: opening.id,
            value: opening.value,
        });

        log::info!("New {} session (best {})", mode.as_str(), self.ledger.best_score);
        self.begin_countdown(false);
    }

    /// Switch rule set and restart
    pub fn reset_with_mode(&mut self, mode: Mode) {
        self.field = Playfield::new(mode, &self.tuning);
        self.restart();
    }

    /// Move the cursor by `delta`, wrapping
    pub fn adjust_selection(&mut self, delta: i32) {
        self.cursor.adjust(delta);
    }

    /// Fire at the selected digit. While a miss is being acknowledged this
    /// acts as continue. Returns true on a hit.
    pub fn fire(&mut self) -> bool {
        match self.phase {
            GamePhase::MissPause => {
                self.continue_play();
                false
            }
            GamePhase::Playing => self.resolve_fire(),
            GamePhase::Countdown(_) | GamePhase::GameOver => false,
        }
    }

    /// Acknowledge a miss: either count down into a new round or end the run
    pub fn continue_play(&mut self) -> bool {
        if self.phase != GamePhase::MissPause {
            return false;
        }
        if self.pending_game_over {
            self.pending_game_over = false;
            self.enter_game_over();
        } else {
            self.field.clear();
            self.tweens.clear();
            self.begin_countdown(true);
        }
        true
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            mode: self.mode(),
            score: self.ledger.score,
            lives: self.ledger.lives,
            misses: self.ledger.misses,
            level: self.difficulty.level,
            hits_this_level: self.difficulty.hits_this_level,
            selected_digit: self.cursor.digit(),
            best_score: self.ledger.best_score,
            new_best: self.new_best,
            banner: self.banner.as_ref().map(|b| b.text.clone()),
            tokens: self.token_views(),
            slots: self.field.as_row().map(|r| r.values()).unwrap_or_default(),
        }
    }

    /// Run one deferred action that came due
    pub(crate) fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::CountdownStep { spawn } => {
                let GamePhase::Countdown(n) = self.phase else {
                    return;
                };
                let next = n.saturating_sub(1);
                self.phase = GamePhase::Countdown(next);
                if next == COUNTDOWN_GO {
                    self.scheduler
                        .schedule(self.tuning.go_hold_ticks, Deferred::BeginRound { spawn });
                } else {
                    self.scheduler
                        .schedule(self.tuning.countdown_step_ticks, Deferred::CountdownStep { spawn });
                }
            }
            Deferred::BeginRound { spawn } => {
                if !matches!(self.phase, GamePhase::Countdown(_)) {
                    return;
                }
                self.phase = GamePhase::Playing;
                if spawn {
                    let token = self.field.open_round(
                        &mut self.ids,
                        &mut self.rng,
                        &self.tuning,
                        &self.difficulty,
                    );
                    self.events.push(GameEvent::Spawned {
                        id: token.id,
                        value: token.value,
                    });
                }
                self.events.push(GameEvent::RoundStarted);
                log::info!("Round started at level {}", self.difficulty.level);
            }
            Deferred::CommitShift => {
                if self.field.commit_shift() {
                    for token in self.field.tokens() {
                        self.tweens.remove(token.id);
                    }
                }
            }
        }
    }

    /// One tick of active play
    pub(crate) fn step_playing(&mut self) {
        self.field.advance();
        if self.mode() == Mode::FreeFall && self.field.check_failure(&self.tuning) {
            self.handle_escape();
            return;
        }

        let outcome =
            self.field
                .spawn_tick(&mut self.ids, &mut self.rng, &self.tuning, &self.difficulty);
        match outcome {
            SpawnOutcome::Idle => {}
            SpawnOutcome::Spawned(token) => self.events.push(GameEvent::Spawned {
                id: token.id,
                value: token.value,
            }),
            SpawnOutcome::ShiftStarted(token) => {
                self.start_shift_slide(token);
                self.scheduler
                    .schedule(self.tuning.shift_commit_ticks, Deferred::CommitShift);
                self.events.push(GameEvent::Spawned {
                    id: token.id,
                    value: token.value,
                });
            }
            SpawnOutcome::Overflow => {
                self.ledger.misses += 1;
                self.events.push(GameEvent::Miss { lives: None });
                log::info!("Row overflow");
                self.enter_game_over();
            }
        }
    }

    /// Count the banner down while playing
    pub(crate) fn tick_banner(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(banner) = &mut self.banner {
            banner.ticks_left = banner.ticks_left.saturating_sub(1);
            if banner.ticks_left == 0 {
                self.banner = None;
            }
        }
    }

    fn begin_countdown(&mut self, spawn: bool) {
        self.phase = GamePhase::Countdown(COUNTDOWN_START);
        self.scheduler
            .schedule(self.tuning.countdown_step_ticks, Deferred::CountdownStep { spawn });
    }

    fn resolve_fire(&mut self) -> bool {
        let digit = self.cursor.digit();
        let level_at_fire = self.difficulty.level;
        let Some(hit) = self.field.resolve_fire(digit, &self.tuning) else {
            self.events.push(GameEvent::FireMissed { digit });
            return false;
        };

        self.ledger.score += hit.points as u64;
        self.tweens.remove(hit.token.id);
        self.events.push(GameEvent::Hit {
            value: hit.token.value,
            points: hit.points,
        });
        log::debug!("hit {:?} value={} +{}", hit.token.id, hit.token.value, hit.points);

        self.start_hit_feedback(&hit, level_at_fire);

        if let Some(level) = self.difficulty.register_hit() {
            self.events.push(GameEvent::LevelUp { level });
            self.show_level_banner();
            log::info!("Level up: {}", level);
        }
        true
    }

    fn handle_escape(&mut self) {
        self.ledger.misses += 1;
        let lives = self.ledger.lives.map(|l| l.saturating_sub(1));
        self.ledger.lives = lives;
        self.field.clear();
        self.tweens.clear();
        self.pending_game_over = lives == Some(0);
        self.phase = GamePhase::MissPause;
        self.events.push(GameEvent::Miss { lives });
        log::info!("Miss! lives left: {:?}", lives);
    }

    fn enter_game_over(&mut self) {
        self.scheduler.invalidate();
        self.phase = GamePhase::GameOver;

        let score = self.ledger.score;
        self.new_best = score >= self.ledger.best_score && score > 0;
        if score > self.ledger.best_score {
            self.ledger.best_score = score;
        }
        self.events.push(GameEvent::GameOver {
            score,
            new_best: self.new_best,
        });
        if self.new_best {
            self.events.push(GameEvent::NewBest { score });
        }
        log::info!("Game over: score {} (best {})", score, self.ledger.best_score);
    }

    fn show_level_banner(&mut self) {
        self.banner = Some(Banner {
            text: format!("LEVEL {} START!", self.difficulty.level),
            ticks_left: self.tuning.banner_ticks,
        });
    }

    /// Cosmetic follow-up to a hit: recoil in FreeFall, slide-in in Row
    fn start_hit_feedback(&mut self, hit: &FireHit, level: u32) {
        let now = self.now;
        match &self.field {
            Playfield::FreeFall(field) => {
                let distance = self.tuning.push_back_distance(level);
                let targets = field.push_back_targets(distance, self.tuning.push_back_spacing);
                for (id, target) in targets {
                    let Some(token) = field.tokens.iter().find(|t| t.id == id) else {
                        continue;
                    };
                    let kick = target - token.position;
                    self.tweens
                        .start(id, Tween::new(kick, 0.0, now, self.tuning.push_back_secs));
                }
            }
            Playfield::Row(row) => {
                let Some(slot) = hit.slot else { return };
                for token in row.slots()[..=slot].iter().flatten() {
                    self.tweens
                        .start(token.id, Tween::new(-1.0, 0.0, now, self.tuning.slide_secs));
                }
            }
        }
    }

    /// Slide every row token (and the staged one) one slot toward the exit
    fn start_shift_slide(&mut self, incoming: Token) {
        let now = self.now;
        let duration = self.tuning.slide_secs;
        for token in self.field.tokens() {
            self.tweens.start(token.id, Tween::new(0.0, 1.0, now, duration));
        }
        self.tweens.start(incoming.id, Tween::new(0.0, 1.0, now, duration));
    }

    fn token_views(&self) -> Vec<TokenView> {
        let now = self.now;
        match &self.field {
            Playfield::FreeFall(field) => field
                .tokens
                .iter()
                .map(|t| TokenView {
                    id: t.id,
                    value: t.value,
                    pos: Vec2::new(t.x, t.position + self.tweens.offset(t.id, now)),
                })
                .collect(),
            Playfield::Row(row) => {
                let mut views: Vec<TokenView> = row
                    .slots()
                    .iter()
                    .flatten()
                    .map(|t| TokenView {
                        id: t.id,
                        value: t.value,
                        pos: Vec2::new(t.position + self.tweens.offset(t.id, now), 0.0),
                    })
                    .collect();
                if let Some(t) = row.pending() {
                    views.push(TokenView {
                        id: t.id,
                        value: t.value,
                        pos: Vec2::new(t.position + self.tweens.offset(t.id, now), 0.0),
                    });
                }
                views
            }
        }
    }
}
