//! Error types for the registry, audio sinks and configuration.

use crate::shape::ShapeId;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("outline needs at least 3 points, got {0}")]
    DegenerateOutline(usize),
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f32, y: f32 },
    #[error("canvas must have positive finite size, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("registry capacity must be at least 1")]
    ZeroCapacity,
    #[error("shape {0} not found")]
    NotFound(ShapeId),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl RegistryError {
    /// `true` for argument validation failures (bad outline, coordinate,
    /// canvas or capacity).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            RegistryError::DegenerateOutline(_)
                | RegistryError::NonFinite { .. }
                | RegistryError::InvalidCanvas { .. }
                | RegistryError::ZeroCapacity
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("failed to open voice sink: {0}")]
    Sink(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
