//! Easing curves and time-driven interpolation.
//!
//! Everything here is advanced by explicit `Duration` steps; nothing reads
//! the wall clock, so animations are reproducible in tests.

use std::f32::consts::PI;
use std::time::Duration;

/// Easing curve applied to a normalized progress value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Decelerating quadratic.
    QuadOut,
    /// Sinusoidal acceleration and deceleration.
    SineInOut,
}

impl Easing {
    /// Map progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// A single finite interpolation from one value to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Step the tween forward and return the new value.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    pub fn from_value(&self) -> f32 {
        self.from
    }

    pub fn to_value(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Infinite auto-reversing motion: `0 -> amplitude -> 0 -> ...`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    amplitude: f32,
    half_period: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Oscillation {
    pub fn new(amplitude: f32, half_period: Duration, easing: Easing) -> Self {
        Self {
            amplitude,
            half_period,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed += dt;
        // Keep the counter bounded; only the phase within one cycle matters.
        let cycle = self.half_period * 2;
        if !cycle.is_zero() && self.elapsed >= cycle {
            let rem = self.elapsed.as_nanos() % cycle.as_nanos();
            self.elapsed = Duration::from_nanos(rem as u64);
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.half_period.is_zero() {
            return 0.0;
        }
        let half = self.half_period.as_secs_f32();
        let phase = self.elapsed.as_secs_f32() / half;
        let t = if phase <= 1.0 { phase } else { 2.0 - phase };
        self.amplitude * self.easing.apply(t)
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn half_period(&self) -> Duration {
        self.half_period
    }
}
