//! Map error types.

use lazarus_core::Position2D;

/// Errors raised by grid map operations and map configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The position lies outside the map extent.
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position2D),

    /// The cost of an unwalkable tile was requested.
    #[error("tile {0} is not walkable and has no cost")]
    UnwalkableTileCost(Position2D),

    /// A map was requested with a zero-sized side.
    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// No field-of-view implementation is registered under this name.
    #[error("unsupported FOV algorithm: {0:?}")]
    UnsupportedAlgorithm(String),
}

/// Result type alias for map operations.
pub type Result<T> = std::result::Result<T, MapError>;
