//! Ambient scene animation engine.
//!
//! The engine owns a frame clock with interval timers, one particle pool per
//! effect kind, the foreground sprite animator, the scene state machine and
//! the layout readiness gate. A host feeds it notifications and triggers,
//! steps it with [`Engine::advance`] and paints whatever it exposes.
//!
//! Everything runs on the caller's thread; there is no internal scheduling
//! beyond the explicit clock, so the engine is fully deterministic for a
//! given seed and sequence of calls.

mod clock;
mod engine;
mod error;
mod layout;
mod machine;
mod particle;
mod pool;
mod sprite;

pub use clock::{Clock, FrameHook, TimerId};
pub use engine::{Caption, CaptionHandle, ContainerHandle, Engine, EngineBuilder, SpriteHandle};
pub use error::{EngineError, HandleKind};
pub use layout::{LayoutGate, LayoutOutcome};
pub use machine::{SceneMachine, Trigger};
pub use particle::{Envelope, Lifecycle, Particle, ParticleKind, ParticleView};
pub use pool::{CloudPool, Pools, RainPool, WindPool};
pub use sprite::{SpriteAnimator, SpriteView};
