//! Game loop driver
//!
//! [`Game`] owns the session plus its external collaborators (store, audio
//! cues) and is the only place simulation events fan out to them. The
//! simulation never sees a store or sink.

use crate::audio::{AudioCues, Cue, CueSink};
use crate::persistence::ScalarStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, Mode, Session, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Draws a snapshot; must not mutate game state
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// One-line text HUD for a snapshot
pub fn hud_line(snapshot: &Snapshot) -> String {
    let phase = match snapshot.phase {
        GamePhase::Countdown(_) => snapshot.phase.countdown_label().unwrap_or_default(),
        GamePhase::Playing => "PLAY".to_string(),
        GamePhase::MissPause => "MISS!".to_string(),
        GamePhase::GameOver if snapshot.new_best => "GAME OVER - NEW HIGH SCORE!".to_string(),
        GamePhase::GameOver => "GAME OVER".to_string(),
    };
    let lives = snapshot
        .lives
        .map(|l| format!(" lives {}", l))
        .unwrap_or_default();
    let field = match snapshot.mode {
        Mode::FreeFall => snapshot
            .tokens
            .iter()
            .map(|t| format!("{}@{:.0}", t.value, t.pos.y))
            .collect::<Vec<_>>()
            .join(" "),
        Mode::Row => snapshot
            .slots
            .iter()
            .map(|s| s.map_or("_".to_string(), |v| v.to_string()))
            .collect::<Vec<_>>()
            .join(""),
    };
    format!(
        "[{}] L{} hits {} score {}{} best {} sel {} | {}",
        phase,
        snapshot.level,
        snapshot.hits_this_level,
        snapshot.score,
        lives,
        snapshot.best_score,
        snapshot.selected_digit,
        field
    )
}

/// Renderer that writes the HUD line to the log
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        log::info!("{}", hud_line(snapshot));
    }
}

/// A running game with its collaborators
pub struct Game {
    session: Session,
    store: Box<dyn ScalarStore>,
    cues: AudioCues,
    settings: Settings,
    events: Vec<GameEvent>,
}

impl Game {
    /// Load persisted values (degrading to defaults) and start a session
    pub fn new(
        mode: Mode,
        seed: u64,
        tuning: Tuning,
        store: Box<dyn ScalarStore>,
        sink: Box<dyn CueSink>,
    ) -> Self {
        let best_score = store.load_best_score().unwrap_or_else(|e| {
            log::warn!("Best score unavailable, starting from 0 ({})", e);
            0
        });
        let settings = Settings::load(store.as_ref());
        let mut cues = AudioCues::new(sink);
        cues.set_muted(!settings.sound_enabled);

        log::info!("Number Shooter: {} mode, seed {}", mode.as_str(), seed);
        Self {
            session: Session::new(mode, seed, tuning, best_score),
            store,
            cues,
            settings,
            events: Vec::new(),
        }
    }

    /// Advance one frame and dispatch the resulting events
    pub fn frame(&mut self, input: &TickInput, now: f64) -> &[GameEvent] {
        tick(&mut self.session, input, now);
        let events = self.session.drain_events();
        for event in &events {
            self.dispatch(event);
        }
        self.events = events;
        &self.events
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.session.snapshot());
    }

    /// Flip the sound preference and persist it
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        self.cues.set_muted(!enabled);
        self.settings.save(self.store.as_mut());
        enabled
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Hit { .. } => self.cues.play(Cue::Hit),
            GameEvent::Miss { .. } => self.cues.play(Cue::Miss),
            GameEvent::FireMissed { .. } => self.cues.play(Cue::Haptic),
            GameEvent::NewBest { score } => {
                if let Err(e) = self.store.save_best_score(*score) {
                    log::warn!("Could not save best score {}: {}", score, e);
                }
            }
            GameEvent::RoundStarted
            | GameEvent::Spawned { .. }
            | GameEvent::LevelUp { .. }
            | GameEvent::GameOver { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::persistence::{MemoryStore, StoredValues};

    #[test]
    fn test_loads_persisted_values() {
        let store = MemoryStore::with_values(StoredValues {
            best_score: 31,
            sound_enabled: false,
        });
        let game = Game::new(
            Mode::Row,
            1,
            Tuning::default(),
            Box::new(store),
            Box::new(RecordingSink::new()),
        );
        assert_eq!(game.snapshot().best_score, 31);
        assert!(!game.settings().sound_enabled);
    }

    #[test]
    fn test_toggle_sound_gates_cues() {
        let recorder = RecordingSink::new();
        let mut game = Game::new(
            Mode::FreeFall,
            1,
            Tuning::default(),
            Box::new(MemoryStore::new()),
            Box::new(recorder.clone()),
        );
        assert!(!game.toggle_sound());
        game.dispatch(&GameEvent::Miss { lives: Some(2) });
        assert!(recorder.played().is_empty());

        assert!(game.toggle_sound());
        game.dispatch(&GameEvent::FireMissed { digit: 4 });
        assert_eq!(recorder.played(), vec![Cue::Haptic]);
    }

    #[test]
    fn test_hud_line() {
        let game = Game::new(
            Mode::FreeFall,
            1,
            Tuning::default(),
            Box::new(MemoryStore::new()),
            Box::new(RecordingSink::new()),
        );
        let line = hud_line(&game.snapshot());
        assert!(line.starts_with("[3] L1 hits 0 score 0 lives 3 best 0 sel 1 |"));
    }
}
