//! Keeps the sprite centered once both sizes are measurable.

use nimbus_core::{Point, Size};

use crate::sprite::SpriteAnimator;

/// Result of one centering attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutOutcome {
    /// The sprite was moved to this top-left position.
    Centered(Point),
    /// A size was unavailable; one retry has been scheduled.
    Deferred,
    /// A size was unavailable and a retry was already pending.
    AlreadyPending,
}

/// Deferred-retry gate: a debounce flag plus an explicit retry entry point.
#[derive(Debug, Default)]
pub struct LayoutGate {
    pending: bool,
    scheduled: u64,
}

impl LayoutGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Center the sprite in the container, or schedule a single retry when
    /// either size is zero, negative, NaN or infinite.
    pub fn center(&mut self, container: Size, sprite: &mut SpriteAnimator) -> LayoutOutcome {
        match (container.valid(), sprite.size().and_then(Size::valid)) {
            (Some(container), Some(size)) => {
                let position = container.center_of(size);
                sprite.set_position(position);
                LayoutOutcome::Centered(position)
            }
            _ if self.pending => LayoutOutcome::AlreadyPending,
            _ => {
                self.pending = true;
                self.scheduled += 1;
                LayoutOutcome::Deferred
            }
        }
    }

    /// Run the pending retry, if any.
    pub fn retry(&mut self, container: Size, sprite: &mut SpriteAnimator) -> Option<LayoutOutcome> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(self.center(container, sprite))
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total retries scheduled since creation.
    pub fn scheduled_retries(&self) -> u64 {
        self.scheduled
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}
