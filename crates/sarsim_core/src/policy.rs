//! Pluggable action-selection policies.
//!
//! A policy turns a drone's local perception into the action it takes
//! this tick. The simulation driver treats a failing policy as "take
//! no action", so an external decision collaborator can never stall
//! the run.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sarsim_data::{Compass, Direction};

use crate::agent::Perception;

/// The action a drone takes this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPlan {
    pub movement: Option<Direction>,
    pub explore: bool,
}

impl ActionPlan {
    /// The no-op fallback used when a policy fails.
    #[must_use]
    pub fn hold() -> Self {
        Self {
            movement: None,
            explore: false,
        }
    }
}

/// Sense → decide seam: alternate policies (scripted, learned, or
/// delegated to an external reasoning service) swap in here without
/// touching grid or drone internals.
pub trait ActionPolicy {
    fn decide(&mut self, perception: &Perception) -> anyhow::Result<ActionPlan>;
}

/// The default randomized heuristic: with a configured probability,
/// pick uniformly among the currently legal cardinal moves, then
/// always work the cell underneath.
pub struct RandomWalkPolicy {
    rng: ChaCha8Rng,
    move_chance: f64,
}

impl RandomWalkPolicy {
    #[must_use]
    pub fn new(seed: u64, move_chance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            move_chance,
        }
    }

    fn legal_moves(perception: &Perception) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| {
                perception
                    .cells
                    .get(&Compass::from(*dir))
                    .and_then(Option::as_ref)
                    .is_some_and(|cell| cell.passable)
            })
            .collect()
    }
}

impl ActionPolicy for RandomWalkPolicy {
    fn decide(&mut self, perception: &Perception) -> anyhow::Result<ActionPlan> {
        let movement = if self.rng.gen_bool(self.move_chance) {
            Self::legal_moves(perception).choose(&mut self.rng).copied()
        } else {
            None
        };
        Ok(ActionPlan {
            movement,
            explore: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Drone;
    use crate::config::{AgentConfig, SignalConfig};
    use crate::grid::Grid;
    use sarsim_data::{ObstacleKind, Position};

    fn perception_at(grid: &Grid, x: u16, y: u16) -> Perception {
        let mut drone = Drone::new(
            Position::new(x, y),
            0,
            AgentConfig::default(),
            SignalConfig::default(),
        );
        drone.perceive(grid).clone()
    }

    #[test]
    fn test_random_walk_only_picks_legal_moves() {
        let mut grid = Grid::new(10, 10, 100.0);
        grid.place_obstacle(1, 0, ObstacleKind::Mountain).unwrap();
        let perception = perception_at(&grid, 0, 0);

        let mut policy = RandomWalkPolicy::new(7, 1.0);
        for _ in 0..100 {
            let plan = policy.decide(&perception).unwrap();
            // From (0,0) with a mountain east, only south is legal
            assert_eq!(plan.movement, Some(Direction::South));
            assert!(plan.explore);
        }
    }

    #[test]
    fn test_random_walk_zero_chance_never_moves() {
        let grid = Grid::new(10, 10, 100.0);
        let perception = perception_at(&grid, 5, 5);

        let mut policy = RandomWalkPolicy::new(7, 0.0);
        for _ in 0..50 {
            let plan = policy.decide(&perception).unwrap();
            assert_eq!(plan.movement, None);
            assert!(plan.explore);
        }
    }

    #[test]
    fn test_random_walk_is_deterministic_per_seed() {
        let grid = Grid::new(10, 10, 100.0);
        let perception = perception_at(&grid, 5, 5);

        let mut a = RandomWalkPolicy::new(99, 0.5);
        let mut b = RandomWalkPolicy::new(99, 0.5);
        for _ in 0..200 {
            assert_eq!(
                a.decide(&perception).unwrap(),
                b.decide(&perception).unwrap()
            );
        }
    }

    #[test]
    fn test_boxed_in_drone_has_no_legal_moves() {
        let mut grid = Grid::new(3, 3, 100.0);
        for (x, y) in [(1, 0), (1, 2), (0, 1), (2, 1)] {
            grid.place_obstacle(x, y, ObstacleKind::Mountain).unwrap();
        }
        let perception = perception_at(&grid, 1, 1);

        let mut policy = RandomWalkPolicy::new(3, 1.0);
        let plan = policy.decide(&perception).unwrap();
        assert_eq!(plan.movement, None);
        assert!(plan.explore);
    }

    #[test]
    fn test_hold_plan_is_inert() {
        let plan = ActionPlan::hold();
        assert_eq!(plan.movement, None);
        assert!(!plan.explore);
    }
}
