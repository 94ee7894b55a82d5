//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. Defaults carry the canonical scenario constants; a TOML file
//! overrides them.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 100
//! height = 100
//! num_drones = 4
//! num_victims = 10
//! seed = 42
//!
//! [signal]
//! decay_rate = 100.0
//!
//! [agent]
//! help_cooldown = 30
//! ```

use serde::{Deserialize, Serialize};

/// Scenario-level configuration: grid extent, entity counts, run length.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub num_drones: usize,
    pub num_victims: usize,
    pub num_mountains: usize,
    pub num_buildings: usize,
    pub ticks: u64,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            num_drones: 4,
            num_victims: 10,
            num_mountains: 10,
            num_buildings: 10,
            ticks: 100,
            seed: None,
        }
    }
}

/// Signal layer tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SignalConfig {
    /// Divisor applied to signal age in the exponential decay curve.
    pub decay_rate: f32,
    /// Emission intensity of a movement trail.
    pub trail_intensity: f32,
    /// Emission intensity of a victim-found marker.
    pub victim_found_intensity: f32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            decay_rate: 100.0,
            trail_intensity: 1.0,
            victim_found_intensity: 2.0,
        }
    }
}

/// Drone behavior thresholds and cooldowns.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// Distinct visited cells required before a NeedHelp emission.
    pub help_threshold: usize,
    /// Minimum ticks between two NeedHelp emissions by one drone.
    pub help_cooldown: u64,
    /// Warm-up period and minimum ticks between AreaCleared emissions.
    pub area_cleared_cooldown: u64,
    /// SafeZone cells required in the 5x5 neighborhood for AreaCleared.
    pub required_safe_zones: usize,
    /// Time units a drone is occupied assisting one victim.
    pub rescue_time_cost: u64,
    /// Ray length for the long-range `neighborhood_square` sweep.
    pub sensing_radius: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            help_threshold: 2,
            help_cooldown: 30,
            area_cleared_cooldown: 30,
            required_safe_zones: 5,
            rescue_time_cost: 5,
            sensing_radius: 5,
        }
    }
}

/// Default action-policy tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PolicyConfig {
    /// Probability that a drone attempts a move on a given tick.
    pub move_chance: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { move_chance: 0.5 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub signal: SignalConfig,
    pub agent: AgentConfig,
    pub policy: PolicyConfig,
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0, "Grid width must be positive");
        anyhow::ensure!(self.world.width <= 1000, "Grid width too large (max 1000)");
        anyhow::ensure!(self.world.height > 0, "Grid height must be positive");
        anyhow::ensure!(
            self.world.height <= 1000,
            "Grid height too large (max 1000)"
        );
        anyhow::ensure!(self.world.num_drones > 0, "At least one drone is required");
        anyhow::ensure!(
            self.world.num_drones <= 1000,
            "Too many drones (max 1000)"
        );
        let area = self.world.width as usize * self.world.height as usize;
        anyhow::ensure!(
            self.world.num_victims + self.world.num_mountains + self.world.num_buildings <= area,
            "Scenario does not fit on the grid"
        );

        anyhow::ensure!(
            self.signal.decay_rate > 0.0,
            "Signal decay rate must be positive"
        );
        anyhow::ensure!(
            self.signal.trail_intensity > 0.0,
            "Trail intensity must be positive"
        );
        anyhow::ensure!(
            self.signal.victim_found_intensity > 0.0,
            "Victim-found intensity must be positive"
        );

        anyhow::ensure!(
            self.agent.help_threshold >= 1,
            "Help threshold must be at least 1"
        );
        anyhow::ensure!(
            self.agent.required_safe_zones >= 1,
            "Required safe zones must be at least 1"
        );
        anyhow::ensure!(
            self.agent.sensing_radius >= 1,
            "Sensing radius must be at least 1"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.policy.move_chance),
            "Move chance must be in [0.0, 1.0]"
        );

        Ok(())
    }

    /// Loads and validates configuration from TOML content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}
