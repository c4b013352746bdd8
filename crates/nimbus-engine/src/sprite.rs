//! The persistent foreground sprite and its animations.
//!
//! The sprite carries two kinds of motion: an endless vertical bob that is
//! restarted (never layered) on each scene entry, and short eased
//! transitions of opacity and scale. At most one transition per property is
//! in flight; a new one replaces the old from wherever the value currently is.

use std::time::Duration;

use nimbus_core::{Easing, Oscillation, Point, Scene, SceneProfile, Size, SpriteConfig, Tween};

/// Renderable sprite state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteView {
    /// Top-left corner from the last successful centering.
    pub position: Point,
    /// Measured size, if known.
    pub size: Option<Size>,
    pub opacity: f32,
    pub scale: f32,
    /// Current vertical bob offset; negative is up.
    pub bob_offset: f32,
    pub glow: f32,
}

#[derive(Debug)]
pub struct SpriteAnimator {
    config: SpriteConfig,
    position: Point,
    size: Option<Size>,
    opacity: f32,
    scale: f32,
    bob_offset: f32,
    glow: f32,
    idle: Option<Oscillation>,
    opacity_tween: Option<Tween>,
    scale_tween: Option<Tween>,
}

impl SpriteAnimator {
    /// The sprite starts hidden until the first scene is entered.
    pub fn new(config: SpriteConfig, size: Option<Size>) -> Self {
        Self {
            config,
            position: Point::default(),
            size,
            opacity: 0.0,
            scale: 1.0,
            bob_offset: 0.0,
            glow: 0.0,
            idle: None,
            opacity_tween: None,
            scale_tween: None,
        }
    }

    /// (Re)start the idle bob with the scene's amplitude and period.
    pub fn start_idle(&mut self, profile: &SceneProfile) {
        self.idle = Some(Oscillation::new(
            profile.bob_amplitude,
            profile.bob_half_period,
            Easing::SineInOut,
        ));
        self.bob_offset = 0.0;
    }

    pub fn stop_idle(&mut self) {
        self.idle = None;
        self.bob_offset = 0.0;
    }

    /// Apply the scene's static treatment and start the eased transition
    /// towards its steady-state opacity and scale.
    pub fn enter(&mut self, scene: Scene, intro: bool) {
        let profile = scene.profile();
        self.glow = profile.sprite_glow;

        let (duration, easing) = if intro {
            self.opacity = self.config.intro_opacity;
            self.scale = self.config.intro_scale;
            (self.config.intro_duration(), Easing::QuadOut)
        } else {
            (self.config.transition_duration(), Easing::SineInOut)
        };

        self.opacity_tween = Some(Tween::new(
            self.opacity,
            profile.sprite_opacity,
            duration,
            easing,
        ));
        self.scale_tween = Some(Tween::new(
            self.scale,
            profile.sprite_scale,
            duration,
            easing,
        ));
    }

    /// Drop in-flight opacity/scale transitions, freezing current values.
    /// The idle bob keeps running.
    pub fn stop_transitions(&mut self) {
        self.opacity_tween = None;
        self.scale_tween = None;
    }

    pub fn update(&mut self, dt: Duration) {
        if let Some(idle) = &mut self.idle {
            self.bob_offset = idle.advance(dt);
        }
        if let Some(tween) = &mut self.opacity_tween {
            self.opacity = tween.advance(dt);
            if tween.is_finished() {
                self.opacity_tween = None;
            }
        }
        if let Some(tween) = &mut self.scale_tween {
            self.scale = tween.advance(dt);
            if tween.is_finished() {
                self.scale_tween = None;
            }
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.opacity_tween.is_some() || self.scale_tween.is_some()
    }

    pub fn opacity_transition(&self) -> Option<&Tween> {
        self.opacity_tween.as_ref()
    }

    pub fn scale_transition(&self) -> Option<&Tween> {
        self.scale_tween.as_ref()
    }

    pub fn idle(&self) -> Option<&Oscillation> {
        self.idle.as_ref()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = Some(size);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn view(&self) -> SpriteView {
        SpriteView {
            position: self.position,
            size: self.size,
            opacity: self.opacity,
            scale: self.scale,
            bob_offset: self.bob_offset,
            glow: self.glow,
        }
    }
}
