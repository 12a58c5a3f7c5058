//! Error types for the simulation engine.
//!
//! Only programming and configuration mistakes are errors. Gameplay
//! rejections (blocked moves, failed rotations) are reported as unchanged
//! state, never through this type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A coordinate outside the grid was passed to a checked accessor.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },

    #[error("grid dimensions {width}x{height} are outside the supported range")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A saved game that does not describe a reachable session.
    #[error("invalid saved game: {0}")]
    InvalidSave(String),
}

pub type Result<T> = std::result::Result<T, Error>;
