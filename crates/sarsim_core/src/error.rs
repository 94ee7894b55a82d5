//! Error types for sarsim_core operations.
//!
//! Out-of-bounds coordinates are a hard error everywhere: silently
//! clamping a query would corrupt spatial invariants. Invalid state
//! transitions (rescuing a non-victim cell, exploring a mountain) are
//! not errors at all; they report through boolean or cost return
//! values because drones act on possibly stale perception.

use thiserror::Error;

/// Main error type for grid and signal operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Coordinate outside the grid extent.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: u16, y: u16, width: u16, height: u16 },

    /// Scenario setup tried to combine mutually exclusive cell states.
    #[error("invalid placement at ({x}, {y}): {reason}")]
    InvalidPlacement { x: u16, y: u16, reason: &'static str },
}

/// Result type alias for sarsim_core operations.
pub type Result<T> = std::result::Result<T, GridError>;
