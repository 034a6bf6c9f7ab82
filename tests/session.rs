//! End-to-end sessions through the public API

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use number_shooter::audio::{Cue, RecordingSink};
use number_shooter::consts::SIM_DT;
use number_shooter::game::Game;
use number_shooter::persistence::{MemoryStore, ScalarStore, StoredValues};
use number_shooter::sim::{GameEvent, GamePhase, Mode, Session, TickInput, Token, TokenId, tick};
use number_shooter::{StoreError, Tuning};

/// Store handle the test keeps a second reference to
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SharedStore {
    fn with_values(values: StoredValues) -> Self {
        Self(Rc::new(RefCell::new(MemoryStore::with_values(values))))
    }

    fn values(&self) -> StoredValues {
        self.0.borrow().values()
    }
}

impl ScalarStore for SharedStore {
    fn load_best_score(&self) -> Result<u64, StoreError> {
        self.0.borrow().load_best_score()
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.0.borrow_mut().save_best_score(score)
    }

    fn load_sound_pref(&self) -> Result<bool, StoreError> {
        self.0.borrow().load_sound_pref()
    }

    fn save_sound_pref(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.0.borrow_mut().save_sound_pref(enabled)
    }
}

/// Store whose every operation fails
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Io(io::Error::other("storage unavailable"))
}

impl ScalarStore for BrokenStore {
    fn load_best_score(&self) -> Result<u64, StoreError> {
        Err(broken())
    }

    fn save_best_score(&mut self, _score: u64) -> Result<(), StoreError> {
        Err(broken())
    }

    fn load_sound_pref(&self) -> Result<bool, StoreError> {
        Err(broken())
    }

    fn save_sound_pref(&mut self, _enabled: bool) -> Result<(), StoreError> {
        Err(broken())
    }
}

struct Driver {
    game: Game,
    ticks: u64,
    events: Vec<GameEvent>,
}

impl Driver {
    fn new(game: Game) -> Self {
        Self {
            game,
            ticks: 0,
            events: Vec::new(),
        }
    }

    fn step(&mut self, input: &TickInput) {
        let now = self.ticks as f64 * SIM_DT;
        let events = self.game.frame(input, now).to_vec();
        self.events.extend(events);
        self.ticks += 1;
    }

    fn run_until(&mut self, phase: GamePhase, limit: u32) {
        for _ in 0..limit {
            if self.game.snapshot().phase == phase {
                return;
            }
            self.step(&TickInput::default());
        }
        panic!("never reached {:?}", phase);
    }

    /// Arm `digit` and fire in a single tick
    fn shoot(&mut self, digit: u8) {
        let from = self.game.snapshot().selected_digit as i32;
        self.step(&TickInput {
            adjust: digit as i32 - from,
            fire: true,
            ..Default::default()
        });
    }
}

fn short_row() -> Tuning {
    Tuning {
        row_length: 2,
        ..Tuning::default()
    }
}

/// Score one point in Row mode, then let the row overflow
fn play_short_row(driver: &mut Driver) {
    driver.run_until(GamePhase::Playing, 500);
    let opening = driver.game.snapshot().slots[0].expect("row opens with a token");
    driver.shoot(opening);
    assert_eq!(driver.game.snapshot().score, 1);
    driver.run_until(GamePhase::GameOver, 2000);
}

#[test]
fn test_row_game_saves_new_best() {
    let store = SharedStore::default();
    let recorder = RecordingSink::new();
    let game = Game::new(
        Mode::Row,
        7,
        short_row(),
        Box::new(store.clone()),
        Box::new(recorder.clone()),
    );
    let mut driver = Driver::new(game);
    play_short_row(&mut driver);

    let snapshot = driver.game.snapshot();
    assert!(snapshot.new_best);
    assert_eq!(snapshot.best_score, 1);
    assert_eq!(snapshot.lives, None);
    assert_eq!(snapshot.misses, 1);
    assert_eq!(store.values().best_score, 1);
    assert!(driver.events.contains(&GameEvent::NewBest { score: 1 }));
    assert_eq!(recorder.played(), vec![Cue::Hit, Cue::Miss]);

    // Restart keeps the best score
    driver.step(&TickInput {
        restart: true,
        ..Default::default()
    });
    let snapshot = driver.game.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Countdown(3));
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.best_score, 1);
    assert!(!snapshot.new_best);
    assert_eq!(snapshot.misses, 0);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.hits_this_level, 0);
}

#[test]
fn test_best_score_survives_new_game() {
    let store = SharedStore::with_values(StoredValues {
        best_score: 40,
        sound_enabled: true,
    });
    let game = Game::new(
        Mode::Row,
        7,
        short_row(),
        Box::new(store.clone()),
        Box::new(RecordingSink::new()),
    );
    let mut driver = Driver::new(game);
    assert_eq!(driver.game.snapshot().best_score, 40);
    play_short_row(&mut driver);

    assert!(!driver.game.snapshot().new_best);
    assert_eq!(store.values().best_score, 40);
    assert!(
        !driver
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::NewBest { .. }))
    );
}

#[test]
fn test_sound_off_silences_cues() {
    let store = SharedStore::with_values(StoredValues {
        best_score: 0,
        sound_enabled: false,
    });
    let recorder = RecordingSink::new();
    let game = Game::new(
        Mode::Row,
        7,
        short_row(),
        Box::new(store.clone()),
        Box::new(recorder.clone()),
    );
    let mut driver = Driver::new(game);
    play_short_row(&mut driver);
    assert!(recorder.played().is_empty());

    assert!(driver.game.toggle_sound());
    assert!(store.values().sound_enabled);
}

#[test]
fn test_broken_store_degrades_to_defaults() {
    let recorder = RecordingSink::new();
    let game = Game::new(
        Mode::Row,
        7,
        short_row(),
        Box::new(BrokenStore),
        Box::new(recorder.clone()),
    );
    assert!(game.settings().sound_enabled);
    let mut driver = Driver::new(game);
    assert_eq!(driver.game.snapshot().best_score, 0);

    play_short_row(&mut driver);
    // The run still records the best in memory
    assert_eq!(driver.game.snapshot().best_score, 1);
    assert_eq!(recorder.played(), vec![Cue::Hit, Cue::Miss]);
}

#[test]
fn test_fire_without_target_plays_haptic() {
    let recorder = RecordingSink::new();
    let game = Game::new(
        Mode::Row,
        7,
        Tuning::default(),
        Box::new(MemoryStore::new()),
        Box::new(recorder.clone()),
    );
    let mut driver = Driver::new(game);
    driver.run_until(GamePhase::Playing, 500);
    let opening = driver.game.snapshot().slots[0].expect("row opens with a token");
    let other = if opening == 9 { 1 } else { opening + 1 };
    driver.shoot(other);

    assert_eq!(recorder.played(), vec![Cue::Haptic]);
    assert_eq!(driver.game.snapshot().score, 0);
    assert_eq!(driver.game.snapshot().phase, GamePhase::Playing);
}

fn run_session(session: &mut Session, input: &TickInput, ticks: u32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        tick(session, input, 0.0);
        events.extend(session.drain_events());
    }
    events
}

fn play_until(session: &mut Session) {
    for _ in 0..500 {
        if session.phase == GamePhase::Playing {
            return;
        }
        tick(session, &TickInput::default(), 0.0);
    }
    panic!("countdown never finished");
}

/// Plant a token about to fall out of the field
fn plant_escapee(session: &mut Session, id: u32) {
    let fall = session.field.as_fall_mut().expect("FreeFall session");
    fall.push(Token::new(TokenId(id), 5, 100.0, 639.9, 0.5));
}

#[test]
fn test_freefall_three_misses_end_the_run() {
    let mut session = Session::new(Mode::FreeFall, 21, Tuning::default(), 0);
    let proceed = TickInput {
        proceed: true,
        ..Default::default()
    };

    for (round, lives_left) in [2u32, 1, 0].into_iter().enumerate() {
        play_until(&mut session);
        plant_escapee(&mut session, 10_000 + round as u32);
        let events = run_session(&mut session, &TickInput::default(), 1);
        assert!(events.contains(&GameEvent::Miss {
            lives: Some(lives_left)
        }));
        assert_eq!(session.phase, GamePhase::MissPause);
        assert_eq!(session.field.token_count(), 0);

        // Nothing moves until the player acknowledges
        run_session(&mut session, &TickInput::default(), 120);
        assert_eq!(session.phase, GamePhase::MissPause);
        run_session(&mut session, &proceed, 1);
    }

    assert_eq!(session.phase, GamePhase::GameOver);
    assert_eq!(session.ledger.misses, 3);
    assert_eq!(session.ledger.lives, Some(0));

    // Game over ignores everything but restart
    let fire = TickInput {
        fire: true,
        proceed: true,
        ..Default::default()
    };
    run_session(&mut session, &fire, 300);
    assert_eq!(session.phase, GamePhase::GameOver);
}

#[test]
fn test_same_seed_same_game() {
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };
    let mut a = Session::new(Mode::FreeFall, 99, Tuning::default(), 0);
    let mut b = Session::new(Mode::FreeFall, 99, Tuning::default(), 0);
    let events_a = run_session(&mut a, &input, 2400);
    let events_b = run_session(&mut b, &input, 2400);
    assert_eq!(events_a, events_b);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_row_autoplay_keeps_up_at_level_one() {
    let mut session = Session::new(Mode::Row, 4, Tuning::default(), 0);
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };
    let events = run_session(&mut session, &input, 1200);
    assert!(events.iter().any(|e| matches!(e, GameEvent::Hit { points: 1, .. })));
    assert_ne!(session.phase, GamePhase::GameOver);
}
