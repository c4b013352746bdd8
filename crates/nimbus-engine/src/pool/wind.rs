//! Wind: travelling strokes with a fade envelope and a population cap.

use std::time::Duration;

use log::trace;
use nimbus_core::{Easing, Size, Tween, WindConfig};

use super::{PoolContext, advance_and_reap, random_between};
use crate::clock::{Clock, TimerId};
use crate::particle::{Envelope, Particle};

#[derive(Debug)]
pub struct WindPool {
    config: WindConfig,
    strokes: Vec<Particle>,
    running: bool,
    skipped: u64,
}

impl WindPool {
    pub fn new(config: WindConfig) -> Self {
        Self {
            config,
            strokes: Vec::new(),
            running: false,
            skipped: 0,
        }
    }

    pub(crate) fn start(&mut self, ctx: &mut PoolContext<'_>) {
        ctx.clock.ensure_timer(TimerId::WindSpawn, self.config.interval());
        ctx.clock.start(TimerId::WindSpawn);
        self.running = true;
    }

    pub fn stop(&mut self, clock: &mut Clock) {
        clock.stop(TimerId::WindSpawn);
        self.strokes.clear();
        self.running = false;
    }

    /// Timer callback. At or above the cap the spawn is dropped, not queued.
    pub(crate) fn spawn(&mut self, ctx: &mut PoolContext<'_>) -> bool {
        if !self.running {
            return false;
        }
        if self.strokes.len() >= self.config.cap {
            self.skipped += 1;
            trace!("wind spawn skipped: {} strokes live", self.strokes.len());
            return false;
        }
        let Some(bounds) = ctx.bounds.valid() else {
            trace!("wind spawn skipped: container not measured");
            return false;
        };

        let cfg = &self.config;
        let stretch = random_between(ctx.rng, 1.0 - cfg.jitter, 1.0 + cfg.jitter);
        let millis = (cfg.duration_ms as f64 * stretch as f64).round() as u64;
        let travel = Tween::new(
            -cfg.stroke_width,
            bounds.width + cfg.stroke_width,
            Duration::from_millis(millis),
            Easing::Linear,
        );
        let envelope = Envelope {
            fade_in: cfg.fade_in,
            fade_out: cfg.fade_out,
            peak: cfg.opacity,
        };
        let y = random_between(ctx.rng, 0.0, bounds.height);
        self.strokes.push(Particle::wind(
            y,
            travel,
            envelope,
            Size::new(cfg.stroke_width, cfg.stroke_height),
        ));
        true
    }

    pub(crate) fn update(&mut self, dt: Duration) -> usize {
        advance_and_reap(&mut self.strokes, dt)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Spawns rejected by the population cap.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn cap(&self) -> usize {
        self.config.cap
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const BOUNDS: Size = Size::new(800.0, 600.0);

    #[test]
    fn test_cap_applies_back_pressure() {
        let mut clock = Clock::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = WindPool::new(WindConfig {
            cap: 5,
            ..WindConfig::default()
        });
        let mut ctx = PoolContext {
            clock: &mut clock,
            rng: &mut rng,
            bounds: BOUNDS,
        };
        pool.start(&mut ctx);

        for _ in 0..5 {
            assert!(pool.spawn(&mut ctx));
        }
        assert!(!pool.spawn(&mut ctx));
        assert!(!pool.spawn(&mut ctx));
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.skipped(), 2);
    }

    #[test]
    fn test_stroke_travels_with_envelope() {
        let mut clock = Clock::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = WindPool::new(WindConfig {
            jitter: 0.0,
            ..WindConfig::default()
        });
        let mut ctx = PoolContext {
            clock: &mut clock,
            rng: &mut rng,
            bounds: BOUNDS,
        };
        pool.start(&mut ctx);
        assert!(pool.spawn(&mut ctx));

        let stroke = &pool.particles()[0];
        assert_eq!(stroke.position().x, -60.0);
        assert!((0.0..600.0).contains(&stroke.position().y));
        assert_eq!(stroke.opacity(), 0.0);
        assert_eq!(stroke.duration(), Some(Duration::from_millis(2400)));

        // Halfway: holding at peak opacity in the middle of the container.
        pool.update(Duration::from_millis(1200));
        let stroke = &pool.particles()[0];
        assert!((stroke.opacity() - 0.4).abs() < 1e-4);
        assert!((stroke.position().x - 400.0).abs() < 1e-2);

        assert_eq!(pool.update(Duration::from_millis(1200)), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_duration_jitter_is_bounded() {
        let mut clock = Clock::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = WindPool::new(WindConfig::default());
        let mut ctx = PoolContext {
            clock: &mut clock,
            rng: &mut rng,
            bounds: BOUNDS,
        };
        pool.start(&mut ctx);
        for _ in 0..50 {
            pool.spawn(&mut ctx);
        }
        for stroke in pool.particles() {
            let d = stroke.duration().unwrap_or_default();
            assert!(d >= Duration::from_millis(2040) && d <= Duration::from_millis(2760));
        }
    }

    #[test]
    fn test_stop_flushes_strokes() {
        let mut clock = Clock::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = WindPool::new(WindConfig::default());
        let mut ctx = PoolContext {
            clock: &mut clock,
            rng: &mut rng,
            bounds: BOUNDS,
        };
        pool.start(&mut ctx);
        pool.spawn(&mut ctx);
        pool.stop(&mut clock);
        assert!(pool.is_empty());
        assert!(!clock.is_running(TimerId::WindSpawn));
        assert!(!pool.is_running());
    }
}
