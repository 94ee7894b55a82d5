//! Core data structures for the SARSIM disaster-response simulation.
//!
//! Plain serde-serializable value types shared between the simulation
//! engine and external consumers (renderer, scenario tooling). No
//! simulation logic lives here.

pub mod data;

pub use data::geometry::{Compass, Direction, Position};
pub use data::signal::{Signal, SignalKind};
pub use data::terrain::{ObstacleKind, TerrainClass};
