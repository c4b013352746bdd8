//! Rain: short-lived drops spawned on a fixed interval.

use std::time::Duration;

use log::trace;
use nimbus_core::{Easing, RainConfig, Size, Tween};

use super::{PoolContext, advance_and_reap, random_between};
use crate::clock::{Clock, TimerId};
use crate::particle::Particle;

#[derive(Debug)]
pub struct RainPool {
    config: RainConfig,
    drops: Vec<Particle>,
    running: bool,
}

impl RainPool {
    pub fn new(config: RainConfig) -> Self {
        Self {
            config,
            drops: Vec::new(),
            running: false,
        }
    }

    /// Create the spawn timer if needed and start it.
    pub(crate) fn start(&mut self, ctx: &mut PoolContext<'_>) {
        ctx.clock.ensure_timer(TimerId::RainSpawn, self.config.interval());
        ctx.clock.start(TimerId::RainSpawn);
        self.running = true;
    }

    pub fn stop(&mut self, clock: &mut Clock) {
        clock.stop(TimerId::RainSpawn);
        self.drops.clear();
        self.running = false;
    }

    /// Timer callback: drop one streak from above the container.
    pub(crate) fn spawn(&mut self, ctx: &mut PoolContext<'_>) -> bool {
        if !self.running {
            return false;
        }
        let Some(bounds) = ctx.bounds.valid() else {
            trace!("rain spawn skipped: container not measured");
            return false;
        };

        let cfg = &self.config;
        let x = random_between(ctx.rng, 0.0, bounds.width);
        let fall = Tween::new(
            -cfg.margin,
            bounds.height + cfg.margin,
            cfg.duration(),
            Easing::Linear,
        );
        self.drops.push(Particle::rain(
            x,
            fall,
            Size::new(cfg.slant, cfg.length),
            cfg.opacity,
        ));
        true
    }

    /// Advance every drop; drops that reached the bottom are removed.
    pub(crate) fn update(&mut self, dt: Duration) -> usize {
        advance_and_reap(&mut self.drops, dt)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
