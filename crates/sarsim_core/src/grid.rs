//! 2D cell-state grid for the disaster-response area.
//!
//! The grid owns one mutually exclusive [`TerrainClass`] tag per cell,
//! the composed [`SignalField`], and the global counters. Counters move
//! only through grid methods; drones never touch them directly.
//!
//! Cell-state invariants:
//! - at most one of {VictimPresent, SafeZone, Obstacle(Mountain)} per cell
//! - a mountain is never passable and never holds a victim
//! - rescue converts VictimPresent into SafeZone, never back to Empty

use std::collections::HashMap;

use sarsim_data::{Compass, ObstacleKind, Position, Signal, TerrainClass};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::signal::SignalField;

/// Read-only snapshot of one cell, as collected by a sensing ray.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellView {
    pub position: Position,
    pub terrain: TerrainClass,
    pub signals: Vec<Signal>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Grid {
    cells: Vec<TerrainClass>,
    signals: SignalField,
    width: u16,
    height: u16,
    explored_cell_count: u64,
    rescued_victim_count: u64,
}

impl Grid {
    #[must_use]
    pub fn new(width: u16, height: u16, signal_decay_rate: f32) -> Self {
        Self {
            cells: vec![TerrainClass::Empty; width as usize * height as usize],
            signals: SignalField::new(width, height, signal_decay_rate),
            width,
            height,
            explored_cell_count: 0,
            rescued_victim_count: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Distinct cells that have transitioned into SafeZone.
    #[must_use]
    pub fn explored_cell_count(&self) -> u64 {
        self.explored_cell_count
    }

    #[must_use]
    pub fn rescued_victim_count(&self) -> u64 {
        self.rescued_victim_count
    }

    #[must_use]
    pub fn signals(&self) -> &SignalField {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalField {
        &mut self.signals
    }

    #[inline(always)]
    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize * self.width as usize) + x as usize
    }

    fn checked_index(&self, x: u16, y: u16) -> Result<usize> {
        if x < self.width && y < self.height {
            Ok(self.index(x, y))
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn terrain_at(&self, x: u16, y: u16) -> Result<TerrainClass> {
        Ok(self.cells[self.checked_index(x, y)?])
    }

    /// Direct terrain mutation, used only during scenario setup.
    ///
    /// Placing a mountain over a victim (or a victim onto a mountain)
    /// violates mutual exclusion and is rejected; setup order matters.
    pub fn set_terrain(&mut self, x: u16, y: u16, class: TerrainClass) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        let current = self.cells[idx];
        if class.is_mountain() && current == TerrainClass::VictimPresent {
            return Err(GridError::InvalidPlacement {
                x,
                y,
                reason: "mountain may not be placed on a victim cell",
            });
        }
        if class == TerrainClass::VictimPresent && current.is_mountain() {
            return Err(GridError::InvalidPlacement {
                x,
                y,
                reason: "victim may not be placed on a mountain cell",
            });
        }
        self.cells[idx] = class;
        Ok(())
    }

    /// Setup helper: place an obstacle of the given kind.
    pub fn place_obstacle(&mut self, x: u16, y: u16, kind: ObstacleKind) -> Result<()> {
        self.set_terrain(x, y, TerrainClass::Obstacle(kind))
    }

    /// Setup helper: place a victim.
    pub fn place_victim(&mut self, x: u16, y: u16) -> Result<()> {
        self.set_terrain(x, y, TerrainClass::VictimPresent)
    }

    /// Only mountains block movement; everything else, including
    /// unexplored collapsed buildings, is passable.
    pub fn is_passable(&self, x: u16, y: u16) -> Result<bool> {
        Ok(!self.terrain_at(x, y)?.is_mountain())
    }

    /// Time cost of exploring a cell.
    ///
    /// Empty (and victim / safe-zone) cells cost 1. An unexplored
    /// collapsed building costs 3 and flips its `explored` flag, so a
    /// second sweep costs 0 — nothing left to find. Mountains cost 0;
    /// they cannot be explored. Never changes the terrain tag.
    pub fn explore(&mut self, x: u16, y: u16) -> Result<u64> {
        let idx = self.checked_index(x, y)?;
        match self.cells[idx] {
            TerrainClass::Obstacle(ObstacleKind::Mountain) => Ok(0),
            TerrainClass::Obstacle(ObstacleKind::CollapsedBuilding { explored: false }) => {
                self.cells[idx] =
                    TerrainClass::Obstacle(ObstacleKind::CollapsedBuilding { explored: true });
                Ok(3)
            }
            TerrainClass::Obstacle(ObstacleKind::CollapsedBuilding { explored: true }) => Ok(0),
            _ => Ok(1),
        }
    }

    /// Rescues the victim at `(x, y)`: VictimPresent becomes SafeZone
    /// and the rescue counter increments. On any other cell this is a
    /// reported no-op (`false`), not an error — drones act on stale
    /// perception.
    pub fn mark_rescued(&mut self, x: u16, y: u16) -> Result<bool> {
        let idx = self.checked_index(x, y)?;
        if self.cells[idx] != TerrainClass::VictimPresent {
            return Ok(false);
        }
        self.set_safe_at(idx);
        self.rescued_victim_count += 1;
        Ok(true)
    }

    /// Idempotently marks a cell as SafeZone. The explored counter
    /// increments only on the cell's first transition into SafeZone.
    /// Mountains are left untouched (`false`).
    pub fn mark_safe(&mut self, x: u16, y: u16) -> Result<bool> {
        let idx = self.checked_index(x, y)?;
        if self.cells[idx].is_mountain() {
            return Ok(false);
        }
        Ok(self.set_safe_at(idx))
    }

    /// Mutual exclusion makes "not already SafeZone" the first-transition
    /// test; no separate counted flag is needed.
    fn set_safe_at(&mut self, idx: usize) -> bool {
        if self.cells[idx] == TerrainClass::SafeZone {
            return false;
        }
        self.cells[idx] = TerrainClass::SafeZone;
        self.explored_cell_count += 1;
        true
    }

    pub fn victim_positions(&self) -> Vec<Position> {
        self.positions_where(|t| t == TerrainClass::VictimPresent)
    }

    pub fn safe_zone_positions(&self) -> Vec<Position> {
        self.positions_where(|t| t == TerrainClass::SafeZone)
    }

    pub fn mountain_positions(&self) -> Vec<Position> {
        self.positions_where(|t| t.is_mountain())
    }

    fn positions_where(&self, pred: impl Fn(TerrainClass) -> bool) -> Vec<Position> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if pred(self.cells[self.index(x, y)]) {
                    out.push(Position::new(x, y));
                }
            }
        }
        out
    }

    /// Number of SafeZone cells within Chebyshev `radius` of `center`.
    pub fn safe_zones_near(&self, center: Position, radius: u16) -> Result<usize> {
        self.checked_index(center.x, center.y)?;
        let r = i32::from(radius);
        let mut count = 0;
        for dy in -r..=r {
            for dx in -r..=r {
                if let Some(pos) = center.offset(dx, dy, self.width, self.height) {
                    if self.cells[self.index(pos.x, pos.y)] == TerrainClass::SafeZone {
                        count += 1;
                    }
                }
            }
        }
        Ok(count)
    }

    /// Long-range sensing: for each of the 8 compass bearings, walks a
    /// directional ray outward up to `radius` cells, collecting the
    /// terrain and signals encountered. A bearing whose first step is
    /// already out of bounds maps to `None`; otherwise the ray stops at
    /// the boundary and reports the cells it covered.
    pub fn neighborhood_square(
        &self,
        center: Position,
        radius: u16,
    ) -> Result<HashMap<Compass, Option<Vec<CellView>>>> {
        self.checked_index(center.x, center.y)?;
        let mut out = HashMap::with_capacity(8);
        for bearing in Compass::ALL {
            let (dx, dy) = bearing.delta();
            let mut ray = Vec::new();
            for step in 1..=i32::from(radius) {
                match center.offset(dx * step, dy * step, self.width, self.height) {
                    Some(pos) => {
                        let idx = self.index(pos.x, pos.y);
                        ray.push(CellView {
                            position: pos,
                            terrain: self.cells[idx],
                            signals: self
                                .signals
                                .signals_at(pos.x, pos.y)
                                .map(<[Signal]>::to_vec)
                                .unwrap_or_default(),
                        });
                    }
                    None => break,
                }
            }
            out.insert(bearing, if ray.is_empty() { None } else { Some(ray) });
        }
        Ok(out)
    }

    /// Full 2D terrain snapshot for the external renderer.
    #[must_use]
    pub fn terrain_grid(&self) -> Vec<Vec<TerrainClass>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.cells[self.index(x, y)]).collect())
            .collect()
    }

    /// Runs the uniform decay pass over the whole signal layer. Called
    /// exactly once per tick, after all drones have acted.
    pub fn decay_signals(&mut self, current_tick: u64) {
        self.signals.decay_all(current_tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarsim_data::SignalKind;

    fn grid() -> Grid {
        Grid::new(10, 10, 100.0)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let g = grid();
        assert_eq!(g.terrain_at(0, 0).unwrap(), TerrainClass::Empty);
        assert_eq!(g.explored_cell_count(), 0);
        assert_eq!(g.rescued_victim_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_an_error_not_a_clamp() {
        let g = grid();
        assert!(g.terrain_at(10, 0).is_err());
        assert!(g.terrain_at(0, 10).is_err());
        assert!(g.is_passable(11, 11).is_err());
    }

    #[test]
    fn test_mountain_blocks_passage() {
        let mut g = grid();
        g.place_obstacle(3, 3, ObstacleKind::Mountain).unwrap();
        assert!(!g.is_passable(3, 3).unwrap());
        assert!(g.is_passable(3, 4).unwrap());
    }

    #[test]
    fn test_collapsed_building_is_passable() {
        let mut g = grid();
        g.place_obstacle(2, 2, ObstacleKind::CollapsedBuilding { explored: false })
            .unwrap();
        assert!(g.is_passable(2, 2).unwrap());
    }

    #[test]
    fn test_mountain_victim_mutual_exclusion_at_setup() {
        let mut g = grid();
        g.place_victim(4, 4).unwrap();
        let err = g.place_obstacle(4, 4, ObstacleKind::Mountain).unwrap_err();
        assert!(matches!(err, GridError::InvalidPlacement { .. }));

        g.place_obstacle(5, 5, ObstacleKind::Mountain).unwrap();
        assert!(g.place_victim(5, 5).is_err());
    }

    #[test]
    fn test_explore_costs() {
        let mut g = grid();
        g.place_obstacle(1, 1, ObstacleKind::Mountain).unwrap();
        g.place_obstacle(2, 2, ObstacleKind::CollapsedBuilding { explored: false })
            .unwrap();

        assert_eq!(g.explore(0, 0).unwrap(), 1);
        assert_eq!(g.explore(1, 1).unwrap(), 0);
        assert_eq!(g.explore(2, 2).unwrap(), 3);
        // Second sweep of the same building finds nothing
        assert_eq!(g.explore(2, 2).unwrap(), 0);
    }

    #[test]
    fn test_explore_never_changes_terrain_class() {
        let mut g = grid();
        g.place_victim(6, 6).unwrap();
        g.explore(6, 6).unwrap();
        assert_eq!(g.terrain_at(6, 6).unwrap(), TerrainClass::VictimPresent);
    }

    #[test]
    fn test_rescue_transition() {
        let mut g = grid();
        g.place_victim(5, 6).unwrap();

        assert!(g.mark_rescued(5, 6).unwrap());
        assert_eq!(g.terrain_at(5, 6).unwrap(), TerrainClass::SafeZone);
        assert_eq!(g.rescued_victim_count(), 1);
        // A rescued cell counts as explored exactly once
        assert_eq!(g.explored_cell_count(), 1);
    }

    #[test]
    fn test_rescue_on_non_victim_is_reported_noop() {
        let mut g = grid();
        assert!(!g.mark_rescued(0, 0).unwrap());
        assert_eq!(g.rescued_victim_count(), 0);
        assert_eq!(g.terrain_at(0, 0).unwrap(), TerrainClass::Empty);
    }

    #[test]
    fn test_mark_safe_counts_first_transition_only() {
        let mut g = grid();
        assert!(g.mark_safe(1, 2).unwrap());
        assert!(!g.mark_safe(1, 2).unwrap());
        assert!(!g.mark_safe(1, 2).unwrap());
        assert_eq!(g.explored_cell_count(), 1);
    }

    #[test]
    fn test_mark_safe_after_rescue_does_not_double_count() {
        let mut g = grid();
        g.place_victim(7, 7).unwrap();
        g.mark_rescued(7, 7).unwrap();
        g.mark_safe(7, 7).unwrap();
        assert_eq!(g.explored_cell_count(), 1);
    }

    #[test]
    fn test_mark_safe_leaves_mountains_alone() {
        let mut g = grid();
        g.place_obstacle(8, 8, ObstacleKind::Mountain).unwrap();
        assert!(!g.mark_safe(8, 8).unwrap());
        assert!(g.terrain_at(8, 8).unwrap().is_mountain());
        assert_eq!(g.explored_cell_count(), 0);
    }

    #[test]
    fn test_mutual_exclusion_holds_through_transitions() {
        let mut g = grid();
        g.place_victim(3, 3).unwrap();
        g.place_obstacle(4, 4, ObstacleKind::Mountain).unwrap();
        g.mark_safe(5, 5).unwrap();
        g.mark_rescued(3, 3).unwrap();

        for y in 0..10 {
            for x in 0..10 {
                let t = g.terrain_at(x, y).unwrap();
                let states = [
                    t == TerrainClass::VictimPresent,
                    t == TerrainClass::SafeZone,
                    t.is_mountain(),
                ];
                assert!(states.iter().filter(|&&s| s).count() <= 1);
            }
        }
    }

    #[test]
    fn test_position_scans() {
        let mut g = grid();
        g.place_victim(1, 0).unwrap();
        g.place_victim(2, 5).unwrap();
        g.place_obstacle(9, 9, ObstacleKind::Mountain).unwrap();
        g.mark_safe(0, 0).unwrap();

        assert_eq!(
            g.victim_positions(),
            vec![Position::new(1, 0), Position::new(2, 5)]
        );
        assert_eq!(g.mountain_positions(), vec![Position::new(9, 9)]);
        assert_eq!(g.safe_zone_positions(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_safe_zones_near_counts_window() {
        let mut g = grid();
        for x in 3..=5 {
            g.mark_safe(x, 4).unwrap();
        }
        g.mark_safe(9, 9).unwrap();

        assert_eq!(g.safe_zones_near(Position::new(4, 4), 2).unwrap(), 3);
        assert_eq!(g.safe_zones_near(Position::new(0, 0), 2).unwrap(), 0);
    }

    #[test]
    fn test_neighborhood_square_rays() {
        let mut g = grid();
        g.place_obstacle(5, 3, ObstacleKind::Mountain).unwrap();
        g.signals_mut()
            .emit(Position::new(7, 5), SignalKind::Trail, "t", 0, 1.0)
            .unwrap();

        let rays = g.neighborhood_square(Position::new(5, 5), 2).unwrap();
        assert_eq!(rays.len(), 8);

        let north = rays[&Compass::N].as_ref().unwrap();
        assert_eq!(north.len(), 2);
        assert!(north[1].terrain.is_mountain());

        let east = rays[&Compass::E].as_ref().unwrap();
        assert_eq!(east[1].signals.len(), 1);
    }

    #[test]
    fn test_neighborhood_square_out_of_bounds_direction_is_none() {
        let g = grid();
        let rays = g.neighborhood_square(Position::new(0, 0), 3).unwrap();
        assert!(rays[&Compass::N].is_none());
        assert!(rays[&Compass::W].is_none());
        assert!(rays[&Compass::Nw].is_none());
        // Rays toward the interior are truncated, not None
        assert_eq!(rays[&Compass::S].as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_neighborhood_square_ray_truncates_at_boundary() {
        let g = grid();
        let rays = g.neighborhood_square(Position::new(8, 5), 4).unwrap();
        assert_eq!(rays[&Compass::E].as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_terrain_grid_snapshot_dimensions() {
        let g = Grid::new(4, 3, 100.0);
        let snapshot = g.terrain_grid();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].len(), 4);
    }
}
