//! # SARSIM Core
//!
//! The deterministic simulation engine for SARSIM - a stigmergic
//! disaster-response grid in which autonomous drones explore terrain,
//! rescue victims and coordinate indirectly through decaying scent-like
//! signals left on grid cells.
//!
//! This crate contains:
//! - The decaying signal layer with spatial and temporal queries
//! - The 2D cell-state grid (terrain, occupancy, global counters)
//! - The per-drone behavior state machine (cooldowns, thresholds)
//! - The pluggable action-policy interface and its randomized default
//! - The tick driver that sequences sense → decide → act → decay
//!
//! ## Determinism
//!
//! All randomness flows through seeded `ChaCha8Rng` instances and drones
//! act in a fixed list order within a tick, so two simulations built
//! from the same configuration produce identical histories.
//!
//! ## Example
//!
//! ```
//! use sarsim_core::config::SimConfig;
//! use sarsim_core::sim::Simulation;
//!
//! let mut config = SimConfig::default();
//! config.world.width = 20;
//! config.world.height = 20;
//! config.world.seed = Some(42);
//!
//! let mut sim = Simulation::new(config).unwrap();
//! for _ in 0..10 {
//!     sim.tick().unwrap();
//! }
//! let snapshot = sim.snapshot();
//! assert_eq!(snapshot.tick, 10);
//! ```

/// Per-drone behavior state machine and perception
pub mod agent;
/// Configuration management for scenario and simulation parameters
pub mod config;
/// Error types for grid and signal operations
pub mod error;
/// Run metrics collection and structured logging
pub mod metrics;
/// Pluggable action-selection policies
pub mod policy;
/// Decaying signal (pheromone) layer
pub mod signal;
/// Tick-boundary snapshots for the external renderer
pub mod snapshot;
/// Simulation driver: scenario setup and the per-tick pass
pub mod sim;

/// 2D cell-state grid composed with the signal layer
pub mod grid;

pub use agent::{CellPercept, Drone, Perception};
pub use error::{GridError, Result};
pub use grid::{CellView, Grid};
pub use metrics::{init_logging, Metrics};
pub use policy::{ActionPlan, ActionPolicy, RandomWalkPolicy};
pub use sarsim_data::{Compass, Direction, ObstacleKind, Position, Signal, SignalKind, TerrainClass};
pub use signal::SignalField;
pub use sim::Simulation;
pub use snapshot::{DroneSnapshot, WorldSnapshot};
