//! Scene state machine bookkeeping.
//!
//! The machine only decides; the engine executes a transition step by step
//! so the outgoing scene is fully torn down before the incoming one starts.

use nimbus_core::Scene;

/// Discrete external triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SelectCloud,
    SelectRain,
    SelectWind,
    /// Advance along `Cloud -> Rain -> Wind -> Cloud`.
    AdvanceCycle,
}

impl Trigger {
    pub fn select(scene: Scene) -> Self {
        match scene {
            Scene::Cloud => Trigger::SelectCloud,
            Scene::Rain => Trigger::SelectRain,
            Scene::Wind => Trigger::SelectWind,
        }
    }
}

#[derive(Debug, Default)]
pub struct SceneMachine {
    current: Scene,
    activated: bool,
    transitions: u64,
}

impl SceneMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Scene {
        self.current
    }

    /// Whether any scene has been entered yet.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Completed transitions, the intro included.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Re-entering the current scene is a no-op unless it is the intro.
    pub fn should_enter(&self, target: Scene, intro: bool) -> bool {
        intro || target != self.current
    }

    pub fn target_for(&self, trigger: Trigger) -> Scene {
        match trigger {
            Trigger::SelectCloud => Scene::Cloud,
            Trigger::SelectRain => Scene::Rain,
            Trigger::SelectWind => Scene::Wind,
            Trigger::AdvanceCycle => self.current.next(),
        }
    }

    pub fn commit(&mut self, target: Scene) {
        self.current = target;
        self.activated = true;
        self.transitions += 1;
    }
}
