//! Engine tuning constants.
//!
//! Durations are stored in milliseconds so the TOML file stays readable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// All numeric knobs of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the shared random source; entropy is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub clock: ClockConfig,
    pub cloud: CloudConfig,
    pub rain: RainConfig,
    pub wind: WindConfig,
    pub sprite: SpriteConfig,
}

impl EngineConfig {
    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), String> {
        self.clock.validate()?;
        self.cloud.validate()?;
        self.rain.validate()?;
        self.wind.validate()?;
        self.sprite.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Longest frame step applied at once; longer stalls are clamped.
    pub max_frame_delta_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: 250,
        }
    }
}

impl ClockConfig {
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }

    fn validate(&self) -> Result<(), String> {
        require_nonzero("clock.max_frame_delta_ms", self.max_frame_delta_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Population kept alive while the cloud scene runs.
    pub count: usize,
    /// Leftward movement per frame.
    pub drift_step: f32,
    /// How far past the left edge a cloud travels before wrapping.
    pub wrap_margin: f32,
    /// Upper bound of the random offset added beyond the right edge on wrap.
    pub wrap_jitter: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub min_top: f32,
    pub max_top: f32,
    pub opacity: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            count: 6,
            drift_step: 0.2,
            wrap_margin: 100.0,
            wrap_jitter: 40.0,
            min_width: 60.0,
            max_width: 120.0,
            min_height: 30.0,
            max_height: 60.0,
            min_top: 20.0,
            max_top: 100.0,
            opacity: 0.8,
        }
    }
}

impl CloudConfig {
    fn validate(&self) -> Result<(), String> {
        require_range("cloud.width", self.min_width, self.max_width)?;
        require_range("cloud.height", self.min_height, self.max_height)?;
        require_range("cloud.top", self.min_top, self.max_top)?;
        require_fraction("cloud.opacity", self.opacity)?;
        require_non_negative("cloud.drift_step", self.drift_step)?;
        require_non_negative("cloud.wrap_margin", self.wrap_margin)?;
        require_non_negative("cloud.wrap_jitter", self.wrap_jitter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub interval_ms: u64,
    /// Time for one drop to fall through the container.
    pub duration_ms: u64,
    pub length: f32,
    /// Horizontal lean of the streak.
    pub slant: f32,
    /// Distance above and below the container where drops start and end.
    pub margin: f32,
    pub opacity: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            duration_ms: 500,
            length: 10.0,
            slant: 3.0,
            margin: 10.0,
            opacity: 0.4,
        }
    }
}

impl RainConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    fn validate(&self) -> Result<(), String> {
        require_nonzero("rain.interval_ms", self.interval_ms)?;
        require_nonzero("rain.duration_ms", self.duration_ms)?;
        require_non_negative("rain.margin", self.margin)?;
        require_non_negative("rain.length", self.length)?;
        require_non_negative("rain.slant", self.slant)?;
        require_fraction("rain.opacity", self.opacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub interval_ms: u64,
    /// Base travel time across the container.
    pub duration_ms: u64,
    /// Per-stroke duration jitter as a fraction of `duration_ms`.
    pub jitter: f32,
    /// Maximum number of live strokes.
    pub cap: usize,
    /// Fraction of the travel spent fading in.
    pub fade_in: f32,
    /// Fraction of the travel spent fading out.
    pub fade_out: f32,
    /// Opacity while holding between the fades.
    pub opacity: f32,
    pub stroke_width: f32,
    pub stroke_height: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            interval_ms: 60,
            duration_ms: 2400,
            jitter: 0.15,
            cap: 120,
            fade_in: 0.17,
            fade_out: 0.25,
            opacity: 0.4,
            stroke_width: 60.0,
            stroke_height: 10.0,
        }
    }
}

impl WindConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    fn validate(&self) -> Result<(), String> {
        require_nonzero("wind.interval_ms", self.interval_ms)?;
        require_nonzero("wind.duration_ms", self.duration_ms)?;
        require_fraction("wind.jitter", self.jitter)?;
        require_fraction("wind.fade_in", self.fade_in)?;
        require_fraction("wind.fade_out", self.fade_out)?;
        require_fraction("wind.opacity", self.opacity)?;
        require_non_negative("wind.stroke_width", self.stroke_width)?;
        require_non_negative("wind.stroke_height", self.stroke_height)?;
        if self.fade_in + self.fade_out > 1.0 {
            return Err(format!(
                "wind.fade_in + wind.fade_out must not exceed 1 (got {})",
                self.fade_in + self.fade_out
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Easing time of the first activation.
    pub intro_duration_ms: u64,
    /// Easing time of every later scene change.
    pub transition_duration_ms: u64,
    pub intro_opacity: f32,
    pub intro_scale: f32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            intro_duration_ms: 1500,
            transition_duration_ms: 800,
            intro_opacity: 0.0,
            intro_scale: 1.2,
        }
    }
}

impl SpriteConfig {
    pub fn intro_duration(&self) -> Duration {
        Duration::from_millis(self.intro_duration_ms)
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    fn validate(&self) -> Result<(), String> {
        require_fraction("sprite.intro_opacity", self.intro_opacity)?;
        if !(self.intro_scale.is_finite() && self.intro_scale > 0.0) {
            return Err(format!("sprite.intro_scale {} must be > 0", self.intro_scale));
        }
        Ok(())
    }
}

fn require_nonzero(name: &str, v: u64) -> Result<(), String> {
    if v == 0 {
        return Err(format!("{name} must be greater than 0"));
    }
    Ok(())
}

fn require_fraction(name: &str, v: f32) -> Result<(), String> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(format!("{name} {v} must be within 0..=1"));
    }
    Ok(())
}

fn require_non_negative(name: &str, v: f32) -> Result<(), String> {
    if !v.is_finite() || v < 0.0 {
        return Err(format!("{name} {v} must be a finite value >= 0"));
    }
    Ok(())
}

fn require_range(name: &str, min: f32, max: f32) -> Result<(), String> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(format!("{name} range {min}..{max} is empty"));
    }
    Ok(())
}
