//! Frame tick source and fixed-interval timers.
//!
//! The clock never reads the wall clock. The host reports how much time
//! passed per frame and the clock tells the engine which timers came due.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Callbacks that run once per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameHook {
    /// Horizontal cloud drift.
    CloudDrift,
}

/// Fixed-interval timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerId {
    RainSpawn,
    WindSpawn,
}

#[derive(Debug, Clone)]
struct IntervalTimer {
    period: Duration,
    accumulated: Duration,
    running: bool,
}

/// Frame counter, frame hook registry and interval timers.
#[derive(Debug, Default)]
pub struct Clock {
    elapsed: Duration,
    frames: u64,
    hooks: BTreeSet<FrameHook>,
    timers: BTreeMap<TimerId, IntervalTimer>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame hook. Returns `false` if it was already registered.
    pub fn register_frame(&mut self, hook: FrameHook) -> bool {
        self.hooks.insert(hook)
    }

    /// Unregister a frame hook. Returns `false` if it was not registered.
    pub fn unregister_frame(&mut self, hook: FrameHook) -> bool {
        self.hooks.remove(&hook)
    }

    pub fn is_frame_registered(&self, hook: FrameHook) -> bool {
        self.hooks.contains(&hook)
    }

    /// Create a stopped timer unless one with this id already exists.
    /// Returns `true` when a timer was created.
    pub fn ensure_timer(&mut self, id: TimerId, period: Duration) -> bool {
        if self.timers.contains_key(&id) {
            return false;
        }
        self.timers.insert(
            id,
            IntervalTimer {
                period,
                accumulated: Duration::ZERO,
                running: false,
            },
        );
        true
    }

    pub fn has_timer(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Start a timer. Starting a running or unknown timer does nothing.
    pub fn start(&mut self, id: TimerId) -> bool {
        match self.timers.get_mut(&id) {
            Some(timer) if !timer.running => {
                timer.running = true;
                true
            }
            _ => false,
        }
    }

    /// Stop a timer and drop its partial period.
    pub fn stop(&mut self, id: TimerId) -> bool {
        match self.timers.get_mut(&id) {
            Some(timer) if timer.running => {
                timer.running = false;
                timer.accumulated = Duration::ZERO;
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.timers.get(&id).is_some_and(|t| t.running)
    }

    /// Advance time by one frame and return every timer firing that came
    /// due, in order. A timer whose period elapsed several times fires
    /// several times.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        self.elapsed += dt;
        self.frames += 1;

        let mut fired = Vec::new();
        for (id, timer) in self.timers.iter_mut().filter(|(_, t)| t.running) {
            if timer.period.is_zero() {
                continue;
            }
            timer.accumulated += dt;
            while timer.accumulated >= timer.period {
                timer.accumulated -= timer.period;
                fired.push(*id);
            }
        }
        fired
    }

    /// Unregister every frame hook and stop every timer.
    pub fn shutdown(&mut self) {
        self.hooks.clear();
        for timer in self.timers.values_mut() {
            timer.running = false;
            timer.accumulated = Duration::ZERO;
        }
    }

    /// True when no hook is registered and no timer is running.
    pub fn is_idle(&self) -> bool {
        self.hooks.is_empty() && self.timers.values().all(|t| !t.running)
    }

    /// Total time advanced so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
