use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sarsim_core::config::SimConfig;
use sarsim_core::{init_logging, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the number of ticks to run
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the scenario seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the final terrain map to stdout
    #[arg(long)]
    map: bool,

    /// Write the final world snapshot as JSON to this path
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = if args.config.exists() {
        let content = std::fs::read_to_string(&args.config)
            .with_context(|| format!("reading {}", args.config.display()))?;
        SimConfig::from_toml(&content)
            .with_context(|| format!("parsing {}", args.config.display()))?
    } else {
        tracing::info!(path = %args.config.display(), "No config file, using defaults");
        SimConfig::default()
    };

    if let Some(ticks) = args.ticks {
        config.world.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

fn render_map(sim: &Simulation) {
    let snapshot = sim.snapshot();
    let positions = snapshot.agent_positions();
    for (y, row) in snapshot.terrain.iter().enumerate() {
        let line: String = row
            .iter()
            .enumerate()
            .map(|(x, terrain)| {
                let here = sarsim_data::Position::new(x as u16, y as u16);
                if positions.contains(&here) {
                    'D'
                } else {
                    terrain.symbol()
                }
            })
            .collect();
        println!("{line}");
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(&args)?;
    let ticks = config.world.ticks;

    let mut sim = Simulation::new(config)?;
    for _ in 0..ticks {
        sim.tick()?;
    }

    if args.map {
        render_map(&sim);
    }

    let snapshot = sim.snapshot();
    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "Snapshot written");
    }
    println!("Simulation finished after {} ticks", snapshot.tick);
    println!(
        "Total area explored: {} cells",
        snapshot.explored_cell_count
    );
    println!("Victims rescued: {}", snapshot.rescued_victim_count);
    println!(
        "Total time spent by all drones: {} units",
        sim.total_time_spent()
    );
    println!(
        "Wall clock: {:.2}s",
        sim.metrics().elapsed().as_secs_f64()
    );

    Ok(())
}
