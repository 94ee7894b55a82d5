//! Tick-boundary snapshots for the external renderer.
//!
//! Pure serde value types: the renderer consumes them read-only and
//! the core guarantees they are taken only after a full tick, never
//! mid-update.

use sarsim_data::{Position, TerrainClass};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DroneSnapshot {
    pub id: Uuid,
    pub position: Position,
    pub time_budget_spent: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: u16,
    pub height: u16,
    pub terrain: Vec<Vec<TerrainClass>>,
    pub drones: Vec<DroneSnapshot>,
    pub explored_cell_count: u64,
    pub rescued_victim_count: u64,
}

impl WorldSnapshot {
    /// Drone coordinates in fixed drone order.
    #[must_use]
    pub fn agent_positions(&self) -> Vec<Position> {
        self.drones.iter().map(|d| d.position).collect()
    }
}
