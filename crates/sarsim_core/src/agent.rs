//! Per-drone behavior state machine.
//!
//! A drone cycles through Sensing → Deciding → Acting each tick unless
//! it is busy assisting a victim, in which case it skips ticks until
//! its busy window elapses. Drones never mutate one another; all
//! coordination runs indirectly through signals on the grid.

use std::collections::{HashMap, HashSet, VecDeque};

use sarsim_data::{Compass, Direction, ObstacleKind, Position, Signal, SignalKind, TerrainClass};
use uuid::Uuid;

use crate::config::{AgentConfig, SignalConfig};
use crate::error::Result;
use crate::grid::{CellView, Grid};

/// How many past positions the visited-history ring retains.
const VISITED_HISTORY_LEN: usize = 4;

/// Snapshot of one adjacent cell as the drone perceives it.
#[derive(Debug, Clone)]
pub struct CellPercept {
    pub signals: Vec<Signal>,
    pub is_obstacle: bool,
    pub has_victim: bool,
    pub is_safe_zone: bool,
    pub passable: bool,
}

/// A drone's short-range awareness: the 8 adjacent cells, `None` where
/// the grid ends.
#[derive(Debug, Clone)]
pub struct Perception {
    pub position: Position,
    pub cells: HashMap<Compass, Option<CellPercept>>,
}

/// One autonomous response drone.
#[derive(Debug)]
pub struct Drone {
    pub id: Uuid,
    position: Position,
    time_budget_spent: u64,
    visited_history: VecDeque<Position>,
    last_help_tick: u64,
    last_area_cleared_tick: u64,
    /// Busy until this tick while assisting a victim.
    last_action_tick: u64,
    start_tick: u64,
    perception: Option<Perception>,
    config: AgentConfig,
    signal_config: SignalConfig,
}

impl Drone {
    #[must_use]
    pub fn new(
        start_pos: Position,
        start_tick: u64,
        config: AgentConfig,
        signal_config: SignalConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: start_pos,
            time_budget_spent: 0,
            visited_history: VecDeque::with_capacity(VISITED_HISTORY_LEN),
            last_help_tick: 0,
            last_area_cleared_tick: 0,
            last_action_tick: 0,
            start_tick,
            perception: None,
            config,
            signal_config,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn time_budget_spent(&self) -> u64 {
        self.time_budget_spent
    }

    #[must_use]
    pub fn visited_history(&self) -> &VecDeque<Position> {
        &self.visited_history
    }

    /// Still occupied assisting a victim; ignores actions until the
    /// busy window elapses.
    #[must_use]
    pub fn is_busy(&self, current_tick: u64) -> bool {
        current_tick < self.last_action_tick
    }

    /// True iff one cardinal step lands in bounds on a passable cell.
    pub fn can_move(&self, grid: &Grid, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        match self.position.offset(dx, dy, grid.width(), grid.height()) {
            Some(target) => grid.is_passable(target.x, target.y).unwrap_or(false),
            None => false,
        }
    }

    /// Moves one step and drops a Trail marker at the new position.
    ///
    /// An unmovable direction is a documented no-op: the drone simply
    /// could not move this tick.
    pub fn step(&mut self, grid: &mut Grid, direction: Direction, current_tick: u64) -> Result<()> {
        if !self.can_move(grid, direction) {
            return Ok(());
        }
        let (dx, dy) = direction.delta();
        // can_move already proved the offset is in bounds
        if let Some(target) = self.position.offset(dx, dy, grid.width(), grid.height()) {
            self.position = target;
            self.record_visit(target);
            grid.signals_mut().emit(
                target,
                SignalKind::Trail,
                "drone passed through",
                current_tick,
                self.signal_config.trail_intensity,
            )?;
        }
        Ok(())
    }

    /// Consecutive duplicates are suppressed so holding position does
    /// not pollute the ring.
    fn record_visit(&mut self, position: Position) {
        if self.visited_history.back() == Some(&position) {
            return;
        }
        if self.visited_history.len() == VISITED_HISTORY_LEN {
            self.visited_history.pop_front();
        }
        self.visited_history.push_back(position);
    }

    /// Works the cell under the drone.
    ///
    /// A victim costs the fixed rescue time, opens the busy window and
    /// triggers the need-help evaluation; an unexplored collapsed
    /// building costs its exploration time. Either way the cell ends up
    /// marked safe and the drone pays the 1-unit base cost.
    pub fn explore_current_cell(&mut self, grid: &mut Grid, current_tick: u64) -> Result<()> {
        let Position { x, y } = self.position;
        if grid.mark_rescued(x, y)? {
            tracing::info!(drone = %self.id, x, y, tick = current_tick, "Victim rescued");
            self.time_budget_spent += self.config.rescue_time_cost;
            self.last_action_tick = current_tick + self.config.rescue_time_cost;
            grid.signals_mut().emit(
                self.position,
                SignalKind::VictimFound,
                "Victim located here",
                current_tick,
                self.signal_config.victim_found_intensity,
            )?;
            self.evaluate_need_help(grid, current_tick)?;
        } else if matches!(
            grid.terrain_at(x, y)?,
            TerrainClass::Obstacle(ObstacleKind::CollapsedBuilding { explored: false })
        ) {
            self.time_budget_spent += grid.explore(x, y)?;
        }
        grid.mark_safe(x, y)?;
        self.time_budget_spent += 1;
        Ok(())
    }

    /// Emits NeedHelp when the drone has churned through enough
    /// distinct cells without reporting, subject to the cooldown.
    /// Distinct cells (not raw visits) keep back-and-forth jitter from
    /// triggering a false alarm. Emission clears the history.
    pub fn evaluate_need_help(&mut self, grid: &mut Grid, current_tick: u64) -> Result<()> {
        let distinct: HashSet<&Position> = self.visited_history.iter().collect();
        if distinct.len() < self.config.help_threshold {
            return Ok(());
        }
        if current_tick - self.last_help_tick <= self.config.help_cooldown {
            return Ok(());
        }
        tracing::debug!(drone = %self.id, tick = current_tick, "Emitting NeedHelp");
        grid.signals_mut().emit(
            self.position,
            SignalKind::NeedHelp,
            "Assistance required",
            current_tick,
            1.0,
        )?;
        self.last_help_tick = current_tick;
        self.visited_history.clear();
        Ok(())
    }

    /// Emits AreaCleared once the warm-up period has passed, the 5×5
    /// neighborhood holds enough safe zones, and the emission cooldown
    /// has elapsed.
    pub fn evaluate_area_cleared(&mut self, grid: &mut Grid, current_tick: u64) -> Result<()> {
        if current_tick - self.start_tick < self.config.area_cleared_cooldown {
            return Ok(());
        }
        let safe_nearby = grid.safe_zones_near(self.position, 2)?;
        if safe_nearby < self.config.required_safe_zones {
            return Ok(());
        }
        if current_tick - self.last_area_cleared_tick < self.config.area_cleared_cooldown {
            return Ok(());
        }
        tracing::debug!(drone = %self.id, tick = current_tick, "Emitting AreaCleared");
        grid.signals_mut().emit(
            self.position,
            SignalKind::AreaCleared,
            "Area now under control",
            current_tick,
            1.0,
        )?;
        self.last_area_cleared_tick = current_tick;
        Ok(())
    }

    /// Long-range sensing: directional rays out to the configured
    /// sensing radius. Costs nothing; external policies use it to look
    /// past the adjacent ring.
    pub fn survey(&self, grid: &Grid) -> Result<HashMap<Compass, Option<Vec<CellView>>>> {
        grid.neighborhood_square(self.position, self.config.sensing_radius)
    }

    /// Short-range sensing: snapshots the 8 adjacent cells. Feeds the
    /// action policy; long-range sweeps go through [`Drone::survey`].
    pub fn perceive(&mut self, grid: &Grid) -> &Perception {
        let mut cells = HashMap::with_capacity(8);
        for bearing in Compass::ALL {
            let (dx, dy) = bearing.delta();
            let percept = self
                .position
                .offset(dx, dy, grid.width(), grid.height())
                .map(|pos| {
                    let terrain = grid
                        .terrain_at(pos.x, pos.y)
                        .expect("offset stayed in bounds");
                    CellPercept {
                        signals: grid
                            .signals()
                            .signals_at(pos.x, pos.y)
                            .map(<[Signal]>::to_vec)
                            .unwrap_or_default(),
                        is_obstacle: terrain.is_obstacle(),
                        has_victim: terrain == TerrainClass::VictimPresent,
                        is_safe_zone: terrain == TerrainClass::SafeZone,
                        passable: !terrain.is_mountain(),
                    }
                });
            cells.insert(bearing, percept);
        }
        self.perception.insert(Perception {
            position: self.position,
            cells,
        })
    }
}
