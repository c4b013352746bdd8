//! Scenes and their static styling table.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// One of the three mutually exclusive ambient modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scene {
    #[default]
    Cloud,
    Rain,
    Wind,
}

impl Scene {
    /// Rotation order used by the cycle trigger.
    pub const ALL: [Scene; 3] = [Scene::Cloud, Scene::Rain, Scene::Wind];

    /// Next scene in the fixed rotation `Cloud -> Rain -> Wind -> Cloud`.
    pub fn next(self) -> Self {
        match self {
            Scene::Cloud => Scene::Rain,
            Scene::Rain => Scene::Wind,
            Scene::Wind => Scene::Cloud,
        }
    }

    /// Human-readable scene name.
    pub fn name(self) -> &'static str {
        match self {
            Scene::Cloud => "Cloud",
            Scene::Rain => "Rain",
            Scene::Wind => "Wind",
        }
    }

    /// Caption line shown while the scene is active.
    pub fn caption(self) -> &'static str {
        match self {
            Scene::Cloud => "Cloudy Day",
            Scene::Rain => "Rainy Day",
            Scene::Wind => "Windy Day",
        }
    }

    /// Static styling and sprite motion parameters for this scene.
    pub fn profile(self) -> &'static SceneProfile {
        match self {
            Scene::Cloud => &CLOUD_PROFILE,
            Scene::Rain => &RAIN_PROFILE,
            Scene::Wind => &WIND_PROFILE,
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloud" | "cloudy" => Ok(Scene::Cloud),
            "rain" | "rainy" => Ok(Scene::Rain),
            "wind" | "windy" => Ok(Scene::Wind),
            other => Err(format!("unknown scene: {other} (expected cloud, rain or wind)")),
        }
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Radial background gradient centered on the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    /// Color at the center.
    pub inner: Rgb,
    /// Color at the rim (radius 0.5 of the container).
    pub outer: Rgb,
}

impl Gradient {
    /// Sample the gradient at normalized container coordinates.
    pub fn sample(&self, nx: f32, ny: f32) -> Rgb {
        let dx = nx - 0.5;
        let dy = ny - 0.5;
        let distance = (dx * dx + dy * dy).sqrt() / 0.5;
        self.inner.lerp(self.outer, distance)
    }
}

/// Per-scene entry of the styling table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneProfile {
    pub background: Gradient,
    /// Steady-state sprite opacity.
    pub sprite_opacity: f32,
    /// Steady-state uniform sprite scale.
    pub sprite_scale: f32,
    /// Glow strength in `[0, 1]`; 0 disables the halo.
    pub sprite_glow: f32,
    /// Peak vertical bob offset (negative is up).
    pub bob_amplitude: f32,
    /// Time to travel from rest to the peak offset.
    pub bob_half_period: Duration,
}

const CLOUD_PROFILE: SceneProfile = SceneProfile {
    background: Gradient {
        inner: Rgb(255, 182, 193),
        outer: Rgb(173, 216, 230),
    },
    sprite_opacity: 1.0,
    sprite_scale: 1.0,
    sprite_glow: 0.6,
    bob_amplitude: -8.0,
    bob_half_period: Duration::from_millis(3000),
};

const RAIN_PROFILE: SceneProfile = SceneProfile {
    background: Gradient {
        inner: Rgb(128, 128, 128),
        outer: Rgb(169, 169, 169),
    },
    sprite_opacity: 0.9,
    sprite_scale: 0.92,
    sprite_glow: 0.0,
    bob_amplitude: -5.0,
    bob_half_period: Duration::from_millis(2200),
};

const WIND_PROFILE: SceneProfile = SceneProfile {
    background: Gradient {
        inner: Rgb(255, 165, 0),
        outer: Rgb(255, 140, 0),
    },
    sprite_opacity: 0.95,
    sprite_scale: 1.0,
    sprite_glow: 0.3,
    bob_amplitude: -12.0,
    bob_half_period: Duration::from_millis(4000),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_order() {
        assert_eq!(Scene::Cloud.next(), Scene::Rain);
        assert_eq!(Scene::Rain.next(), Scene::Wind);
        assert_eq!(Scene::Wind.next(), Scene::Cloud);
    }

    #[test]
    fn test_scene_from_str() {
        assert_eq!("Rain".parse::<Scene>(), Ok(Scene::Rain));
        assert_eq!(" windy ".parse::<Scene>(), Ok(Scene::Wind));
        assert!("snow".parse::<Scene>().is_err());
    }

    #[test]
    fn test_profiles_are_distinct() {
        let backgrounds: Vec<_> = Scene::ALL.iter().map(|s| s.profile().background).collect();
        assert_ne!(backgrounds[0], backgrounds[1]);
        assert_ne!(backgrounds[1], backgrounds[2]);
        // Wind drifts wider and slower than rain.
        let rain = Scene::Rain.profile();
        let wind = Scene::Wind.profile();
        assert!(wind.bob_amplitude.abs() > rain.bob_amplitude.abs());
        assert!(wind.bob_half_period > rain.bob_half_period);
    }

    #[test]
    fn test_gradient_sample() {
        let g = Scene::Cloud.profile().background;
        assert_eq!(g.sample(0.5, 0.5), g.inner);
        assert_eq!(g.sample(1.0, 0.5), g.outer);
        assert_eq!(g.sample(0.0, 0.0), g.outer);
    }
}
