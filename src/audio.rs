//! Audio cue dispatch
//!
//! The simulation never touches audio. The game driver turns hit/miss events
//! into [`Cue`]s and hands them to a [`CueSink`]; sinks are fire-and-forget
//! and cannot reach back into game state.

use std::cell::RefCell;
use std::rc::Rc;

/// Cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Token hit
    Hit,
    /// Token escaped / row overflowed
    Miss,
    /// Fire with nothing to hit (short vibration where supported)
    Haptic,
}

/// Oscillator shape for synthesized cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
    Triangle,
}

/// One beep of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub duration_ms: u32,
    pub wave: Waveform,
    pub volume: f32,
    /// Offset from the start of the cue
    pub delay_ms: u32,
}

const HIT_TONES: &[Tone] = &[Tone {
    freq: 880.0,
    duration_ms: 80,
    wave: Waveform::Square,
    volume: 0.15,
    delay_ms: 0,
}];

// Arcade-style miss: three descending notes
const MISS_TONES: &[Tone] = &[
    Tone {
        freq: 440.0,
        duration_ms: 80,
        wave: Waveform::Sawtooth,
        volume: 0.15,
        delay_ms: 0,
    },
    Tone {
        freq: 330.0,
        duration_ms: 80,
        wave: Waveform::Sawtooth,
        volume: 0.13,
        delay_ms: 90,
    },
    Tone {
        freq: 220.0,
        duration_ms: 120,
        wave: Waveform::Triangle,
        volume: 0.11,
        delay_ms: 180,
    },
];

/// Vibration length for [`Cue::Haptic`]
pub const HAPTIC_MS: u32 = 30;

impl Cue {
    /// Tones a synthesizer should play for this cue (empty for haptics)
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            Cue::Hit => HIT_TONES,
            Cue::Miss => MISS_TONES,
            Cue::Haptic => &[],
        }
    }
}

/// Where cues end up (synth, vibration motor, log, test recorder)
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: Cue) {
        log::debug!("cue {:?} ({} tones)", cue, cue.tones().len());
    }
}

/// Sink that remembers what it was asked to play
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    played: Rc<RefCell<Vec<Cue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far (shared with clones of this sink)
    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        self.played.borrow_mut().push(cue);
    }
}

/// Gate in front of a sink, honoring the sound preference
pub struct AudioCues {
    sink: Box<dyn CueSink>,
    muted: bool,
}

impl AudioCues {
    pub fn new(sink: Box<dyn CueSink>) -> Self {
        Self { sink, muted: false }
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        self.sink.play(cue);
    }
}
