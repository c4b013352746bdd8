//! The top-level engine that owns every component.

use std::time::Duration;

use log::{debug, info};
use nimbus_core::{EngineConfig, Gradient, Scene, Size};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::{Clock, FrameHook, TimerId};
use crate::error::{EngineError, HandleKind};
use crate::layout::{LayoutGate, LayoutOutcome};
use crate::machine::{SceneMachine, Trigger};
use crate::particle::{ParticleKind, ParticleView};
use crate::pool::{PoolContext, Pools};
use crate::sprite::{SpriteAnimator, SpriteView};

/// The variable-size area everything is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerHandle {
    size: Size,
}

impl ContainerHandle {
    /// `size` may still be unmeasured.
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

/// The foreground sprite element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpriteHandle {
    measured: Option<Size>,
}

impl SpriteHandle {
    /// A sprite whose size becomes known later (e.g. after image decode).
    pub fn unmeasured() -> Self {
        Self { measured: None }
    }

    pub fn measured(size: Size) -> Self {
        Self {
            measured: Some(size),
        }
    }
}

/// The caption label element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptionHandle {
    visible: bool,
}

impl CaptionHandle {
    /// A label that stays collapsed until the first scene is shown.
    pub fn hidden() -> Self {
        Self { visible: false }
    }
}

/// Caption state for the host to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caption {
    pub scene: Scene,
    /// Scene name, e.g. "Rain".
    pub name: &'static str,
    /// Caption line, e.g. "Rainy Day".
    pub text: &'static str,
    pub visible: bool,
}

impl Caption {
    fn for_scene(scene: Scene, visible: bool) -> Self {
        Self {
            scene,
            name: scene.name(),
            text: scene.caption(),
            visible,
        }
    }
}

/// Builder that checks for the required handles before an engine exists.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    seed: Option<u64>,
    container: Option<ContainerHandle>,
    sprite: Option<SpriteHandle>,
    caption: Option<CaptionHandle>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Overrides the seed from the configuration.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn container(mut self, container: ContainerHandle) -> Self {
        self.container = Some(container);
        self
    }

    pub fn sprite(mut self, sprite: SpriteHandle) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn caption(mut self, caption: CaptionHandle) -> Self {
        self.caption = Some(caption);
        self
    }

    pub fn build(self) -> Result<Engine, EngineError> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        let container = self
            .container
            .ok_or(EngineError::MissingHandle(HandleKind::Container))?;
        let sprite = self
            .sprite
            .ok_or(EngineError::MissingHandle(HandleKind::Sprite))?;
        let caption = self
            .caption
            .ok_or(EngineError::MissingHandle(HandleKind::Caption))?;

        let rng = match self.seed.or(self.config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Engine {
            clock: Clock::new(),
            rng,
            pools: Pools::new(&self.config),
            sprite: SpriteAnimator::new(self.config.sprite.clone(), sprite.measured),
            machine: SceneMachine::new(),
            layout: LayoutGate::new(),
            container: container.size,
            background: Scene::Cloud.profile().background,
            caption: Caption::for_scene(Scene::Cloud, caption.visible),
            max_frame_delta: self.config.clock.max_frame_delta(),
            ready: false,
            torn_down: false,
        })
    }
}

/// Ambient scene engine.
///
/// All mutation goes through `&mut self`, one call at a time; a scene
/// transition therefore finishes tearing down the outgoing scene before
/// anything of the incoming scene starts.
#[derive(Debug)]
pub struct Engine {
    clock: Clock,
    rng: StdRng,
    pools: Pools,
    sprite: SpriteAnimator,
    machine: SceneMachine,
    layout: LayoutGate,
    container: Size,
    background: Gradient,
    caption: Caption,
    max_frame_delta: Duration,
    ready: bool,
    torn_down: bool,
}

impl Engine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Window-ready: center the sprite and play the intro of the first scene.
    pub fn on_ready(&mut self) {
        if self.torn_down || self.ready {
            debug!("ready notification ignored");
            return;
        }
        self.ready = true;
        info!("engine ready, container {:?}", self.container);
        self.center_sprite();
        self.enter_scene(Scene::Cloud, true);
    }

    /// Route an external trigger into the state machine.
    pub fn handle(&mut self, trigger: Trigger) -> bool {
        if !self.ready || self.torn_down {
            debug!("trigger {trigger:?} ignored: engine not running");
            return false;
        }
        let target = self.machine.target_for(trigger);
        self.enter_scene(target, false)
    }

    pub fn select(&mut self, scene: Scene) -> bool {
        self.handle(Trigger::select(scene))
    }

    pub fn advance_cycle(&mut self) -> bool {
        self.handle(Trigger::AdvanceCycle)
    }

    /// Transition to `target`. Returns `false` when nothing changed,
    /// including before window-ready and after teardown.
    pub fn enter_scene(&mut self, target: Scene, intro: bool) -> bool {
        if !self.ready || self.torn_down {
            debug!("enter {target} ignored: engine not running");
            return false;
        }
        if !self.machine.should_enter(target, intro) {
            debug!("already in {target}, transition skipped");
            return false;
        }
        let outgoing = self.machine.current();

        self.sprite.stop_transitions();
        self.pools.stop_all(&mut self.clock);
        debug_assert!(self.pools.is_empty());

        let profile = target.profile();
        self.background = profile.background;

        let mut ctx = PoolContext {
            clock: &mut self.clock,
            rng: &mut self.rng,
            bounds: self.container,
        };
        self.pools.start_for(target, &mut ctx);

        self.sprite.enter(target, intro);
        self.sprite.start_idle(profile);
        self.caption = Caption::for_scene(target, true);
        self.machine.commit(target);

        if intro {
            info!("entered {target} (intro)");
        } else {
            info!("scene {outgoing} -> {target}");
        }
        true
    }

    /// Container resized.
    pub fn resize(&mut self, size: Size) {
        if self.torn_down {
            return;
        }
        self.container = size;
        self.center_sprite();
    }

    /// The sprite's own size became known.
    pub fn sprite_measured(&mut self, size: Size) {
        if self.torn_down {
            return;
        }
        self.sprite.set_size(size);
        self.center_sprite();
    }

    /// Center the sprite now. Returns `None` after teardown.
    pub fn center_sprite(&mut self) -> Option<LayoutOutcome> {
        if self.torn_down {
            return None;
        }
        let outcome = self.layout.center(self.container, &mut self.sprite);
        if outcome == LayoutOutcome::Deferred {
            debug!(
                "sprite centering deferred: container {:?}, sprite {:?}",
                self.container,
                self.sprite.size()
            );
        }
        Some(outcome)
    }

    /// Run the pending deferred centering, if any. The host calls this once
    /// per loop turn after layout has had a chance to settle.
    pub fn retry_layout(&mut self) -> Option<LayoutOutcome> {
        if self.torn_down {
            return None;
        }
        self.layout.retry(self.container, &mut self.sprite)
    }

    pub fn layout_retry_pending(&self) -> bool {
        self.layout.is_pending()
    }

    /// Step one rendered frame.
    pub fn advance(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }
        let dt = dt.min(self.max_frame_delta);
        let fired = self.clock.advance(dt);

        let mut ctx = PoolContext {
            clock: &mut self.clock,
            rng: &mut self.rng,
            bounds: self.container,
        };
        if ctx.clock.is_frame_registered(FrameHook::CloudDrift) {
            self.pools.cloud.on_frame(&mut ctx);
        }
        self.pools.rain.update(dt);
        self.pools.wind.update(dt);
        for timer in fired {
            match timer {
                TimerId::RainSpawn => self.pools.rain.spawn(&mut ctx),
                TimerId::WindSpawn => self.pools.wind.spawn(&mut ctx),
            };
        }

        self.sprite.update(dt);
    }

    /// Stop every callback and timer and clear every pool. Nothing fires
    /// afterwards; calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.clock.shutdown();
        self.pools.stop_all(&mut self.clock);
        self.sprite.stop_transitions();
        self.sprite.stop_idle();
        self.layout.cancel();
        self.torn_down = true;
        info!(
            "engine torn down after {} transitions, {} frames",
            self.machine.transitions(),
            self.clock.frame_count()
        );
    }

    pub fn scene(&self) -> Scene {
        self.machine.current()
    }

    pub fn caption(&self) -> Caption {
        self.caption
    }

    pub fn background(&self) -> Gradient {
        self.background
    }

    pub fn particles(&self) -> impl Iterator<Item = ParticleView> + '_ {
        self.pools.views()
    }

    pub fn particle_count(&self, kind: ParticleKind) -> usize {
        self.pools.len(kind)
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn sprite(&self) -> SpriteView {
        self.sprite.view()
    }

    pub fn sprite_animator(&self) -> &SpriteAnimator {
        &self.sprite
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn transitions(&self) -> u64 {
        self.machine.transitions()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn engine_with(config: EngineConfig) -> Engine {
        Engine::builder(config)
            .seed(42)
            .container(ContainerHandle::new(Size::new(800.0, 600.0)))
            .sprite(SpriteHandle::measured(Size::new(120.0, 200.0)))
            .caption(CaptionHandle::hidden())
            .build()
            .expect("engine builds")
    }

    fn engine() -> Engine {
        engine_with(EngineConfig::default())
    }

    fn run(engine: &mut Engine, total: Duration, step: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            engine.advance(step);
            elapsed += step;
        }
    }

    #[test]
    fn test_missing_handles_are_fatal() {
        let err = Engine::builder(EngineConfig::default())
            .sprite(SpriteHandle::unmeasured())
            .caption(CaptionHandle::hidden())
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::MissingHandle(HandleKind::Container));

        let err = Engine::builder(EngineConfig::default())
            .container(ContainerHandle::new(Size::ZERO))
            .caption(CaptionHandle::hidden())
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::MissingHandle(HandleKind::Sprite));

        let err = Engine::builder(EngineConfig::default())
            .container(ContainerHandle::new(Size::ZERO))
            .sprite(SpriteHandle::unmeasured())
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::MissingHandle(HandleKind::Caption));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.wind.interval_ms = 0;
        let err = Engine::builder(config)
            .container(ContainerHandle::new(Size::ZERO))
            .sprite(SpriteHandle::unmeasured())
            .caption(CaptionHandle::hidden())
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_finite_wrap_margin_is_rejected() {
        let mut config = EngineConfig::default();
        config.cloud.wrap_margin = f32::NAN;
        config.cloud.drift_step = 50.0;
        let err = Engine::builder(config)
            .container(ContainerHandle::new(Size::new(800.0, 600.0)))
            .sprite(SpriteHandle::unmeasured())
            .caption(CaptionHandle::hidden())
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_triggers_before_ready_are_ignored() {
        let mut engine = engine();
        assert!(!engine.select(Scene::Rain));
        assert!(!engine.caption().visible);
        assert_eq!(engine.transitions(), 0);
    }

    #[test]
    fn test_enter_scene_waits_for_ready() {
        let mut engine = engine();
        assert!(!engine.enter_scene(Scene::Rain, false));
        assert!(!engine.enter_scene(Scene::Wind, true));
        assert_eq!(engine.transitions(), 0);
        assert!(engine.pools().is_empty());
        assert!(!engine.clock().has_timer(TimerId::RainSpawn));

        engine.on_ready();
        assert_eq!(engine.scene(), Scene::Cloud);
        assert_eq!(engine.transitions(), 1);
        assert_eq!(engine.particle_count(ParticleKind::Cloud), 6);
        assert!(approx(engine.sprite().scale, 1.2));
    }

    #[test]
    fn test_ready_plays_intro_once() {
        let mut engine = engine();
        engine.on_ready();
        engine.on_ready();
        assert_eq!(engine.transitions(), 1);
        assert_eq!(engine.scene(), Scene::Cloud);
        assert_eq!(engine.sprite().position.x, 340.0);
        assert_eq!(engine.sprite().position.y, 200.0);
    }

    #[test]
    fn test_reentering_current_scene_is_noop() {
        for scene in Scene::ALL {
            let mut engine = engine();
            engine.on_ready();
            engine.select(scene);
            run(&mut engine, Duration::from_millis(300), FRAME);

            let particles: Vec<_> = engine.particles().collect();
            let sprite = engine.sprite();
            let transitions = engine.transitions();

            assert!(!engine.enter_scene(scene, false));
            assert_eq!(engine.particles().collect::<Vec<_>>(), particles);
            assert_eq!(engine.sprite(), sprite);
            assert_eq!(engine.transitions(), transitions);
        }
    }

    #[test]
    fn test_wind_population_never_exceeds_cap() {
        let mut config = EngineConfig::default();
        config.wind.duration_ms = 60_000;
        let mut engine = engine_with(config);
        engine.on_ready();
        engine.select(Scene::Wind);

        for _ in 0..400 {
            engine.advance(Duration::from_millis(50));
            assert!(engine.particle_count(ParticleKind::Wind) <= 120);
        }
        assert_eq!(engine.particle_count(ParticleKind::Wind), 120);
        assert!(engine.pools().wind.skipped() > 0);
    }

    #[test]
    fn test_outgoing_pools_empty_synchronously() {
        let mut engine = engine();
        engine.on_ready();
        assert_eq!(engine.particle_count(ParticleKind::Cloud), 6);

        engine.select(Scene::Rain);
        assert_eq!(engine.particle_count(ParticleKind::Cloud), 0);
        assert_eq!(engine.particle_count(ParticleKind::Rain), 0);
        assert!(!engine.clock().is_frame_registered(FrameHook::CloudDrift));
        assert!(engine.clock().is_running(TimerId::RainSpawn));

        engine.advance(Duration::from_millis(120));
        assert_eq!(engine.particle_count(ParticleKind::Rain), 2);

        engine.advance_cycle();
        assert_eq!(engine.particle_count(ParticleKind::Rain), 0);
        assert!(!engine.clock().is_running(TimerId::RainSpawn));
        assert!(engine.clock().is_running(TimerId::WindSpawn));
    }

    #[test]
    fn test_rain_reaches_steady_state() {
        let mut engine = engine();
        engine.on_ready();
        engine.select(Scene::Rain);
        run(&mut engine, Duration::from_secs(3), Duration::from_millis(10));
        // 500 ms fall at one drop per 50 ms.
        let live = engine.particle_count(ParticleKind::Rain);
        assert!((9..=11).contains(&live), "{live} drops live");
        assert!(engine.particles().all(|p| p.kind == ParticleKind::Rain));
    }

    #[test]
    fn test_large_frame_delta_is_clamped() {
        let mut engine = engine();
        engine.on_ready();
        engine.select(Scene::Rain);
        engine.advance(Duration::from_secs(10));
        // 250 ms at 50 ms per drop.
        assert_eq!(engine.particle_count(ParticleKind::Rain), 5);
    }

    #[test]
    fn test_scenario_cloud_rain_wind() {
        let mut engine = engine();
        engine.on_ready();

        // Intro into Cloud.
        assert_eq!(engine.caption().name, "Cloud");
        assert_eq!(engine.caption().text, "Cloudy Day");
        assert!(engine.caption().visible);
        let sprite = engine.sprite();
        assert!(approx(sprite.opacity, 0.0));
        assert!(approx(sprite.scale, 1.2));
        let opacity = engine.sprite_animator().opacity_transition().copied();
        assert_eq!(opacity.map(|t| t.duration()), Some(Duration::from_millis(1500)));
        run(&mut engine, Duration::from_millis(1500), Duration::from_millis(50));
        assert!(approx(engine.sprite().opacity, 1.0));
        assert!(approx(engine.sprite().scale, 1.0));

        // Select rain.
        assert!(engine.select(Scene::Rain));
        assert_eq!(engine.particle_count(ParticleKind::Cloud), 0);
        assert!(engine.pools().rain.is_running());
        assert_eq!(engine.caption().name, "Rain");
        assert_eq!(engine.background(), Scene::Rain.profile().background);
        let opacity = engine.sprite_animator().opacity_transition().copied();
        assert_eq!(opacity.map(|t| t.duration()), Some(Duration::from_millis(800)));
        run(&mut engine, Duration::from_millis(800), Duration::from_millis(50));
        assert!(approx(engine.sprite().opacity, 0.9));
        assert!(approx(engine.sprite().scale, 0.92));

        // Cycle from rain goes to wind.
        assert!(engine.advance_cycle());
        assert_eq!(engine.scene(), Scene::Wind);
        assert_eq!(engine.caption().name, "Wind");
        run(&mut engine, Duration::from_millis(500), Duration::from_millis(50));

        // Selecting wind again changes nothing.
        let transitions = engine.transitions();
        let wind: Vec<_> = engine.particles().collect();
        let opacity = engine.sprite_animator().opacity_transition().copied();
        assert!(!engine.select(Scene::Wind));
        assert_eq!(engine.transitions(), transitions);
        assert_eq!(engine.particles().collect::<Vec<_>>(), wind);
        assert_eq!(engine.sprite_animator().opacity_transition().copied(), opacity);
    }

    #[test]
    fn test_layout_gate_through_engine() {
        let mut engine = Engine::builder(EngineConfig::default())
            .seed(1)
            .container(ContainerHandle::new(Size::ZERO))
            .sprite(SpriteHandle::unmeasured())
            .caption(CaptionHandle::hidden())
            .build()
            .expect("engine builds");

        engine.on_ready();
        assert!(engine.layout_retry_pending());
        engine.resize(Size::new(f32::NAN, 100.0));
        assert!(engine.layout_retry_pending());

        engine.resize(Size::new(800.0, 600.0));
        engine.sprite_measured(Size::new(100.0, 100.0));
        assert_eq!(engine.sprite().position.x, 350.0);
        assert_eq!(engine.sprite().position.y, 250.0);

        let outcome = engine.retry_layout();
        assert!(matches!(outcome, Some(LayoutOutcome::Centered(_))));
        assert!(!engine.layout_retry_pending());
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut engine = engine();
        engine.on_ready();
        engine.select(Scene::Wind);
        run(&mut engine, Duration::from_millis(600), FRAME);
        assert!(engine.particle_count(ParticleKind::Wind) > 0);

        engine.teardown();
        assert!(engine.clock().is_idle());
        assert!(engine.pools().is_empty());

        let position = engine.sprite().position;
        engine.resize(Size::ZERO);
        assert_eq!(engine.center_sprite(), None);
        assert!(!engine.layout_retry_pending());
        assert_eq!(engine.sprite().position, position);

        let frames = engine.clock().frame_count();
        engine.advance(Duration::from_secs(1));
        assert_eq!(engine.clock().frame_count(), frames);
        assert!(!engine.select(Scene::Rain));
        assert!(engine.pools().is_empty());
        assert_eq!(engine.scene(), Scene::Wind);
    }
}
