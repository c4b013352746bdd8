//! Core types shared by the nimbus engine, its configuration and the
//! terminal front end.
//!
//! This crate holds the closed set of scenes with their styling table,
//! layout geometry, easing curves and the engine configuration.

mod config;
mod easing;
mod geometry;
mod scene;

pub use config::{
    ClockConfig, CloudConfig, EngineConfig, RainConfig, SpriteConfig, WindConfig,
};
pub use easing::{Easing, Oscillation, Tween};
pub use geometry::{Point, Size};
pub use scene::{Gradient, Rgb, Scene, SceneProfile};
