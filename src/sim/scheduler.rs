//! Tick-based timer queue for deferred transitions
//!
//! Each entry carries the epoch it was scheduled in. [`Scheduler::invalidate`]
//! bumps the epoch and drops the queue, so nothing scheduled before a reset
//! can fire into the state that follows it.

use serde::{Deserialize, Serialize};

/// A transition deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Move the countdown on by one step (3 -> 2 -> 1 -> GO)
    CountdownStep { spawn: bool },
    /// Leave the countdown and start playing; optionally open with a fresh token
    BeginRound { spawn: bool },
    /// Apply the staged row shift
    CommitShift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    due: u64,
    epoch: u32,
    action: Deferred,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: u64,
    epoch: u32,
    queue: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `action` once `delay` more ticks have elapsed
    pub fn schedule(&mut self, delay: u32, action: Deferred) {
        self.queue.push(Entry {
            due: self.now + delay as u64,
            epoch: self.epoch,
            action,
        });
    }

    /// Advance one tick and return the actions now due, in scheduling order
    pub fn advance(&mut self) -> Vec<Deferred> {
        self.now += 1;
        let (now, epoch) = (self.now, self.epoch);
        let mut due = Vec::new();
        self.queue.retain(|entry| {
            if entry.epoch != epoch {
                return false;
            }
            if entry.due <= now {
                due.push(entry.action);
                return false;
            }
            true
        });
        due
    }

    /// Forget everything scheduled so far
    pub fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.queue.clear();
    }

    /// Whether an action of this kind is queued in the current epoch
    pub fn is_pending(&self, action: Deferred) -> bool {
        self.queue
            .iter()
            .any(|e| e.epoch == self.epoch && e.action == action)
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }
}
