//! Engine construction errors.

use std::fmt;

use thiserror::Error;

/// Visual handles the engine cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Container,
    Sprite,
    Caption,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleKind::Container => "container",
            HandleKind::Sprite => "sprite",
            HandleKind::Caption => "caption",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("required {0} handle was not provided")]
    MissingHandle(HandleKind),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}
