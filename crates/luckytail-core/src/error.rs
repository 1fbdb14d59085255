use std::path::PathBuf;

use glam::Vec2;
use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`](crate::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Faults detected while updating the tail. These never leave a tick as `Err`;
/// they are reported through [`TickOutcome`](crate::TickOutcome) and logged.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TailFault {
    #[error("leader reported non-finite state (position {position}, velocity {velocity})")]
    NonFiniteLeader { position: Vec2, velocity: Vec2 },
    #[error("direction hint {0} is not finite")]
    NonFiniteHint(f32),
    #[error("segment {index} resolved to a non-finite pose")]
    NonFinitePose { index: usize },
}
