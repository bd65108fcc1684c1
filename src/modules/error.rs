//! Configuration errors raised when a search session is set up.

use super::position::Position;
use std::fmt;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which search endpoint a configuration error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// Grid has no cells
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    /// Start or goal lies outside the grid
    #[error("{endpoint} position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        endpoint: Endpoint,
        position: Position,
        width: usize,
        height: usize,
    },

    /// Probability outside [0, 1] or NaN
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Configuration text could not be deserialized
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}
