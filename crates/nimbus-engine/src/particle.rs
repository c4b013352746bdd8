//! Transient visual entities owned by the particle pools.

use std::time::Duration;

use nimbus_core::{Point, Size, Tween};

/// Effect a particle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Cloud,
    Rain,
    Wind,
}

/// Lifecycle of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, not yet advanced.
    Spawned,
    /// Advanced at least once and still running.
    Animating,
    /// Progress finished; the pool reaps it on the same tick.
    Completed,
}

/// Opacity fade-in / hold / fade-out envelope over normalized progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub fade_in: f32,
    pub fade_out: f32,
    pub peak: f32,
}

impl Envelope {
    pub fn opacity_at(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        let factor = if self.fade_in > 0.0 && p < self.fade_in {
            p / self.fade_in
        } else if self.fade_out > 0.0 && p > 1.0 - self.fade_out {
            (1.0 - p) / self.fade_out
        } else {
            1.0
        };
        self.peak * factor
    }
}

/// Per-kind progress model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Motion {
    /// Moved by the cloud pool each frame; never completes.
    Drift,
    /// Vertical fall.
    Fall(Tween),
    /// Horizontal travel with an opacity envelope.
    Travel { x: Tween, envelope: Envelope },
}

/// A transient, independently animated entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    kind: ParticleKind,
    pub(crate) position: Point,
    size: Size,
    opacity: f32,
    motion: Motion,
    lifecycle: Lifecycle,
}

impl Particle {
    pub(crate) fn cloud(position: Point, size: Size, opacity: f32) -> Self {
        Self {
            kind: ParticleKind::Cloud,
            position,
            size,
            opacity,
            motion: Motion::Drift,
            lifecycle: Lifecycle::Spawned,
        }
    }

    pub(crate) fn rain(x: f32, fall: Tween, size: Size, opacity: f32) -> Self {
        Self {
            kind: ParticleKind::Rain,
            position: Point::new(x, fall.value()),
            size,
            opacity,
            motion: Motion::Fall(fall),
            lifecycle: Lifecycle::Spawned,
        }
    }

    pub(crate) fn wind(y: f32, travel: Tween, envelope: Envelope, size: Size) -> Self {
        Self {
            kind: ParticleKind::Wind,
            position: Point::new(travel.value(), y),
            size,
            opacity: envelope.opacity_at(0.0),
            motion: Motion::Travel {
                x: travel,
                envelope,
            },
            lifecycle: Lifecycle::Spawned,
        }
    }

    /// Move a drifting particle left by `step`.
    pub(crate) fn drift(&mut self, step: f32) {
        self.position.x -= step;
        self.lifecycle = Lifecycle::Animating;
    }

    /// Step the progress model. Drifting particles only change state.
    pub(crate) fn advance(&mut self, dt: Duration) -> Lifecycle {
        match &mut self.motion {
            Motion::Drift => {
                self.lifecycle = Lifecycle::Animating;
            }
            Motion::Fall(fall) => {
                self.position.y = fall.advance(dt);
                self.lifecycle = if fall.is_finished() {
                    Lifecycle::Completed
                } else {
                    Lifecycle::Animating
                };
            }
            Motion::Travel { x, envelope } => {
                self.position.x = x.advance(dt);
                self.opacity = envelope.opacity_at(x.progress());
                self.lifecycle = if x.is_finished() {
                    Lifecycle::Completed
                } else {
                    Lifecycle::Animating
                };
            }
        }
        self.lifecycle
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Time left before completion; `None` for particles that never finish.
    pub fn remaining(&self) -> Option<Duration> {
        match &self.motion {
            Motion::Drift => None,
            Motion::Fall(fall) => Some(fall.remaining()),
            Motion::Travel { x, .. } => Some(x.remaining()),
        }
    }

    /// Total lifetime; `None` for particles that never finish.
    pub fn duration(&self) -> Option<Duration> {
        match &self.motion {
            Motion::Drift => None,
            Motion::Fall(fall) => Some(fall.duration()),
            Motion::Travel { x, .. } => Some(x.duration()),
        }
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            kind: self.kind,
            position: self.position,
            size: self.size,
            opacity: self.opacity,
        }
    }
}

/// What a rendering surface needs to paint one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub kind: ParticleKind,
    pub position: Point,
    pub size: Size,
    pub opacity: f32,
}
