//! Ambient cloud drift.
//!
//! Clouds are the one kind that never completes: they drift left one step
//! per frame and wrap back past the right edge, so the population stays
//! fixed for the whole scene.

use nimbus_core::{CloudConfig, Point, Size};

use super::{PoolContext, random_between};
use crate::clock::{Clock, FrameHook};
use crate::particle::Particle;

#[derive(Debug)]
pub struct CloudPool {
    config: CloudConfig,
    clouds: Vec<Particle>,
    running: bool,
    wraps: u64,
}

impl CloudPool {
    pub fn new(config: CloudConfig) -> Self {
        Self {
            config,
            clouds: Vec::new(),
            running: false,
            wraps: 0,
        }
    }

    /// Populate the initial set and hook into the frame callback.
    pub(crate) fn start(&mut self, ctx: &mut PoolContext<'_>) {
        if self.running {
            return;
        }

        // Spread across the container even when it is not measured yet.
        let span = if ctx.bounds.width.is_finite() {
            ctx.bounds.width.max(1.0)
        } else {
            1.0
        };

        let cfg = &self.config;
        self.clouds = (0..cfg.count)
            .map(|_| {
                let size = Size::new(
                    random_between(ctx.rng, cfg.min_width, cfg.max_width),
                    random_between(ctx.rng, cfg.min_height, cfg.max_height),
                );
                let position = Point::new(
                    random_between(ctx.rng, 0.0, span),
                    random_between(ctx.rng, cfg.min_top, cfg.max_top),
                );
                Particle::cloud(position, size, cfg.opacity)
            })
            .collect();

        ctx.clock.register_frame(FrameHook::CloudDrift);
        self.running = true;
    }

    pub fn stop(&mut self, clock: &mut Clock) {
        clock.unregister_frame(FrameHook::CloudDrift);
        self.clouds.clear();
        self.running = false;
    }

    /// Frame callback: drift left and wrap at the left margin.
    pub(crate) fn on_frame(&mut self, ctx: &mut PoolContext<'_>) {
        if !self.running {
            return;
        }
        let Some(bounds) = ctx.bounds.valid() else {
            return;
        };

        for cloud in &mut self.clouds {
            cloud.drift(self.config.drift_step);
            if cloud.position.x + cloud.size().width < -self.config.wrap_margin {
                cloud.position.x =
                    bounds.width + random_between(ctx.rng, 0.0, self.config.wrap_jitter);
                self.wraps += 1;
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.clouds
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of wrap-arounds since creation.
    pub fn wraps(&self) -> u64 {
        self.wraps
    }
}
