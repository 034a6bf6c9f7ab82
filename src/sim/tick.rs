//! Per-frame simulation tick
//!
//! One call advances the session by exactly one frame: discrete inputs are
//! applied first, then due deferred actions, then active play.

use super::state::{GamePhase, Session};

/// Ticks between autoplay actions, so the demo moves at a human pace
pub const AUTOPLAY_STRIDE: u64 = 6;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Cursor steps (+1 / -1 per key press, may accumulate)
    pub adjust: i32,
    /// Fire at the selected digit (acts as continue during a miss pause)
    pub fire: bool,
    /// Acknowledge a miss
    pub proceed: bool,
    /// Start over from level 1
    pub restart: bool,
    /// Idle/demo mode - the cursor chases the most urgent token
    pub autoplay: bool,
}

/// Advance the session by one frame. `now` is wall-clock seconds and only
/// drives cosmetic tweens.
pub fn tick(session: &mut Session, input: &TickInput, now: f64) {
    session.now = now;

    let mut input = input.clone();
    if input.autoplay {
        autoplay(session, &mut input);
    }

    if input.restart {
        session.restart();
    }
    if input.adjust != 0 {
        session.adjust_selection(input.adjust);
    }
    if input.proceed {
        session.continue_play();
    } else if input.fire {
        session.fire();
    }

    for action in session.scheduler.advance() {
        session.run_deferred(action);
    }

    if session.phase == GamePhase::Playing {
        session.step_playing();
    }

    session.tick_banner();
    session.tweens.prune(now);
}

/// Fill in inputs for the idle/demo driver
fn autoplay(session: &Session, input: &mut TickInput) {
    if session.scheduler.now() % AUTOPLAY_STRIDE != 0 {
        return;
    }
    match session.phase {
        GamePhase::MissPause => input.proceed = true,
        GamePhase::Playing => {
            let Some(target) = session.field.most_urgent() else {
                return;
            };
            let current = session.cursor.digit() as i32;
            let wanted = target.value as i32;
            if current == wanted {
                input.fire = true;
                return;
            }
            // Shortest way around the 1..=9 wheel
            let forward = (wanted - current).rem_euclid(9);
            input.adjust = if forward <= 4 { 1 } else { -1 };
        }
        GamePhase::Countdown(_) | GamePhase::GameOver => {}
    }
}
