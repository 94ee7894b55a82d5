//! Shared value types for the disaster-response grid.

pub mod geometry;
pub mod signal;
pub mod terrain;
