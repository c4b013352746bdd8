//! Particle pools, one per effect kind.
//!
//! Each pool exclusively owns its particles. Stopping a pool destroys every
//! live particle immediately, whatever its progress.

mod cloud;
mod rain;
mod wind;

pub use cloud::CloudPool;
pub use rain::RainPool;
pub use wind::WindPool;

use std::time::Duration;

use nimbus_core::{EngineConfig, Scene, Size};
use rand::Rng;
use rand::rngs::StdRng;

use crate::clock::Clock;
use crate::particle::{Lifecycle, Particle, ParticleKind, ParticleView};

/// Engine resources lent to a pool for the duration of one call.
pub(crate) struct PoolContext<'a> {
    pub clock: &'a mut Clock,
    pub rng: &'a mut StdRng,
    pub bounds: Size,
}

/// Uniform sample in `[lo, hi)`; a degenerate or non-finite range yields `lo`.
pub(crate) fn random_between(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Advance every particle and drop the ones that completed this tick.
/// Returns the number reaped.
pub(crate) fn advance_and_reap(particles: &mut Vec<Particle>, dt: Duration) -> usize {
    let before = particles.len();
    particles.retain_mut(|p| p.advance(dt) != Lifecycle::Completed);
    before - particles.len()
}

/// The three pools owned by the engine.
#[derive(Debug)]
pub struct Pools {
    pub cloud: CloudPool,
    pub rain: RainPool,
    pub wind: WindPool,
}

impl Pools {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cloud: CloudPool::new(config.cloud.clone()),
            rain: RainPool::new(config.rain.clone()),
            wind: WindPool::new(config.wind.clone()),
        }
    }

    /// Stop every pool, flushing all particles.
    pub fn stop_all(&mut self, clock: &mut Clock) {
        self.cloud.stop(clock);
        self.rain.stop(clock);
        self.wind.stop(clock);
    }

    /// Start the pool that belongs to `scene`.
    pub(crate) fn start_for(&mut self, scene: Scene, ctx: &mut PoolContext<'_>) {
        match scene {
            Scene::Cloud => self.cloud.start(ctx),
            Scene::Rain => self.rain.start(ctx),
            Scene::Wind => self.wind.start(ctx),
        }
    }

    pub fn len(&self, kind: ParticleKind) -> usize {
        self.particles(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty() && self.rain.is_empty() && self.wind.is_empty()
    }

    pub fn total(&self) -> usize {
        self.cloud.len() + self.rain.len() + self.wind.len()
    }

    pub fn particles(&self, kind: ParticleKind) -> &[Particle] {
        match kind {
            ParticleKind::Cloud => self.cloud.particles(),
            ParticleKind::Rain => self.rain.particles(),
            ParticleKind::Wind => self.wind.particles(),
        }
    }

    /// Renderable state of every live particle, clouds first.
    pub fn views(&self) -> impl Iterator<Item = ParticleView> + '_ {
        self.cloud
            .particles()
            .iter()
            .chain(self.rain.particles())
            .chain(self.wind.particles())
            .map(Particle::view)
    }
}
