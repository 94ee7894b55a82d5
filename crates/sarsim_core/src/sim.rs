//! Simulation driver: scenario setup and the per-tick pass.
//!
//! One logical timeline: `tick()` advances a discrete counter, runs the
//! sense → decide → act pass over every drone in fixed list order (two
//! drones contesting a cell resolve by iteration order, not a race),
//! and finishes with the uniform signal-decay pass as the last
//! serialized step. Snapshots are taken only between ticks.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sarsim_data::{ObstacleKind, Position, TerrainClass};

use crate::agent::Drone;
use crate::config::SimConfig;
use crate::grid::Grid;
use crate::metrics::Metrics;
use crate::policy::{ActionPlan, ActionPolicy, RandomWalkPolicy};
use crate::snapshot::{DroneSnapshot, WorldSnapshot};

pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    drones: Vec<Drone>,
    policies: Vec<Box<dyn ActionPolicy>>,
    tick: u64,
    metrics: Metrics,
}

impl Simulation {
    /// Builds the scenario: validates the configuration, lays out
    /// mountains, collapsed buildings and victims with the seeded rng,
    /// and spawns every drone at the grid center with the default
    /// random-walk policy.
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let seed = config.world.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut grid = Grid::new(
            config.world.width,
            config.world.height,
            config.signal.decay_rate,
        );
        place_scenario(&mut grid, &mut rng, &config);

        let start = Position::new(config.world.width / 2, config.world.height / 2);
        let drones: Vec<Drone> = (0..config.world.num_drones)
            .map(|_| Drone::new(start, 0, config.agent.clone(), config.signal.clone()))
            .collect();
        let policies: Vec<Box<dyn ActionPolicy>> = (0..config.world.num_drones)
            .map(|i| {
                Box::new(RandomWalkPolicy::new(
                    seed.wrapping_add(i as u64 + 1),
                    config.policy.move_chance,
                )) as Box<dyn ActionPolicy>
            })
            .collect();

        tracing::info!(
            width = config.world.width,
            height = config.world.height,
            drones = config.world.num_drones,
            victims = grid.victim_positions().len(),
            seed = seed,
            "Scenario initialized"
        );

        Ok(Self {
            config,
            grid,
            drones,
            policies,
            tick: 0,
            metrics: Metrics::new(),
        })
    }

    /// Replaces one drone's policy. The seam for plugging in scripted
    /// or externally-delegated decision making.
    pub fn set_policy(&mut self, drone_index: usize, policy: Box<dyn ActionPolicy>) {
        if drone_index < self.policies.len() {
            self.policies[drone_index] = policy;
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs one full tick: every non-busy drone senses, decides and
    /// acts in fixed order, then the whole signal layer decays once.
    ///
    /// A policy failure downgrades to "no action this tick" for that
    /// drone; nothing here is fatal.
    pub fn tick(&mut self) -> crate::error::Result<()> {
        let started = Instant::now();
        let current = self.tick;

        for (drone, policy) in self.drones.iter_mut().zip(self.policies.iter_mut()) {
            if drone.is_busy(current) {
                continue;
            }

            let perception = drone.perceive(&self.grid).clone();
            let plan = match policy.decide(&perception) {
                Ok(plan) => plan,
                Err(err) => {
                    tracing::warn!(drone = %drone.id, tick = current, error = %err,
                        "Policy failed; drone holds position");
                    ActionPlan::hold()
                }
            };

            if let Some(direction) = plan.movement {
                drone.step(&mut self.grid, direction, current)?;
            }
            if plan.explore {
                drone.explore_current_cell(&mut self.grid, current)?;
            }
            drone.evaluate_area_cleared(&mut self.grid, current)?;
        }

        // The one uniform decay pass; no emission may interleave with it.
        self.grid.decay_signals(current);

        self.tick += 1;
        self.metrics.record_tick(
            started.elapsed(),
            self.grid.rescued_victim_count(),
            self.grid.explored_cell_count(),
        );
        Ok(())
    }

    /// Runs the configured number of ticks.
    pub fn run(&mut self) -> crate::error::Result<()> {
        for _ in 0..self.config.world.ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Read-only world snapshot, safe at tick boundaries.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            width: self.grid.width(),
            height: self.grid.height(),
            terrain: self.grid.terrain_grid(),
            drones: self
                .drones
                .iter()
                .map(|d| DroneSnapshot {
                    id: d.id,
                    position: d.position(),
                    time_budget_spent: d.time_budget_spent(),
                })
                .collect(),
            explored_cell_count: self.grid.explored_cell_count(),
            rescued_victim_count: self.grid.rescued_victim_count(),
        }
    }

    /// Cumulative time spent by all drones.
    #[must_use]
    pub fn total_time_spent(&self) -> u64 {
        self.drones.iter().map(Drone::time_budget_spent).sum()
    }
}

/// Random scenario layout with rejection sampling: mountains first,
/// then collapsed buildings on passable cells, then victims on cells
/// that are still empty. Attempt caps keep degenerate configurations
/// from spinning.
fn place_scenario(grid: &mut Grid, rng: &mut ChaCha8Rng, config: &SimConfig) {
    let mut place = |count: usize, f: &mut dyn FnMut(&mut Grid, u16, u16) -> bool| {
        let mut placed = 0;
        let mut attempts = 0;
        let cap = count.saturating_mul(20).max(100);
        while placed < count && attempts < cap {
            let x = rng.gen_range(0..grid.width());
            let y = rng.gen_range(0..grid.height());
            if f(grid, x, y) {
                placed += 1;
            }
            attempts += 1;
        }
    };

    place(config.world.num_mountains, &mut |g, x, y| {
        g.terrain_at(x, y).is_ok_and(|t| t == TerrainClass::Empty)
            && g.place_obstacle(x, y, ObstacleKind::Mountain).is_ok()
    });
    place(config.world.num_buildings, &mut |g, x, y| {
        g.terrain_at(x, y).is_ok_and(|t| t == TerrainClass::Empty)
            && g
                .place_obstacle(x, y, ObstacleKind::CollapsedBuilding { explored: false })
                .is_ok()
    });
    place(config.world.num_victims, &mut |g, x, y| {
        g.terrain_at(x, y).is_ok_and(|t| t == TerrainClass::Empty)
            && g.place_victim(x, y).is_ok()
    });
}
