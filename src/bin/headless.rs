//! Headless runner
//!
//! Seeds a scenario from command-line flags, advances it a number of frames
//! and prints a summary, optionally writing the final JSON snapshot.

use std::path::PathBuf;

use ahash::AHashMap;
use clap::Parser;
use life_sandbox::core::config::SimulationConfig;
use life_sandbox::core::error::Result;
use life_sandbox::core::types::Vec2;
use life_sandbox::simulation::{EntityKind, Material, Simulation, SimulationEvent, SpawnMode};
use life_sandbox::world::terrain::WorldShape;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Life Sandbox runner
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run a seeded sandbox scenario without a display")]
struct Args {
    /// TOML config file (defaults apply to missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// World shape: complete, four or half
    #[arg(long)]
    shape: Option<WorldShape>,

    /// Frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Steps per frame
    #[arg(long, default_value_t = 1)]
    speed: u32,

    #[arg(long, default_value_t = 20)]
    settlers: u32,

    #[arg(long, default_value_t = 4)]
    hostiles: u32,

    #[arg(long, default_value_t = 1)]
    beasts: u32,

    #[arg(long, default_value_t = 1)]
    wanderers: u32,

    #[arg(long, default_value_t = 2)]
    defenders: u32,

    #[arg(long, default_value_t = 1)]
    guardians: u32,

    /// Random resource nodes scattered at start
    #[arg(long, default_value_t = 15)]
    resources: u32,

    /// Write the final snapshot as JSON here
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// Summary of a headless run
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    frames: u32,
    ticks: u64,
    currency: u64,
    population: AHashMap<EntityKind, usize>,
    kills: AHashMap<EntityKind, usize>,
    structures_built: usize,
    ore_emitted: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("life_sandbox=warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(shape) = args.shape {
        config.world_shape = shape;
    }
    config.validate()?;

    let seed = config.seed;
    let dt = config.frame_seconds;
    let mut sim = Simulation::new(config)?;

    // placement uses its own stream so the world stream only sees simulation draws
    let mut placement = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    scatter(&mut sim, &mut placement, args.settlers, SpawnMode::Settler);
    scatter(&mut sim, &mut placement, args.hostiles, SpawnMode::Hostile);
    scatter(&mut sim, &mut placement, args.beasts, SpawnMode::ApexBeast);
    scatter(&mut sim, &mut placement, args.wanderers, SpawnMode::Wanderer);
    scatter(&mut sim, &mut placement, args.defenders, SpawnMode::Defender);
    scatter(&mut sim, &mut placement, args.guardians, SpawnMode::Guardian);
    for _ in 0..args.resources {
        // the mine's ore is never scattered by hand
        let material = Material::ALL[placement.gen_range(0..Material::ALL.len() - 1)];
        scatter(&mut sim, &mut placement, 1, SpawnMode::Resource(material));
    }

    sim.clock.set_speed(args.speed);
    tracing::info!(frames = args.frames, speed = args.speed, "Headless run starting");

    let mut kills: AHashMap<EntityKind, usize> = AHashMap::new();
    let mut structures_built = 0;
    let mut ore_emitted = 0;
    for _ in 0..args.frames {
        for event in sim.advance_frame(dt) {
            match event {
                SimulationEvent::Killed { kind, .. } => *kills.entry(kind).or_insert(0) += 1,
                SimulationEvent::Built { .. } => structures_built += 1,
                SimulationEvent::OreEmitted { .. } => ore_emitted += 1,
                _ => {}
            }
        }
    }

    let snapshot = sim.snapshot();
    let summary = RunSummary {
        seed,
        frames: args.frames,
        ticks: sim.world.current_tick,
        currency: snapshot.currency,
        population: snapshot.counts(),
        kills,
        structures_built,
        ore_emitted,
    };

    if let Some(path) = &args.snapshot {
        std::fs::write(path, snapshot.to_json()?)?;
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("=== HEADLESS RUN (seed {}) ===", summary.seed);
        println!("Frames: {}  Ticks: {}", summary.frames, summary.ticks);
        println!("Currency: {}", summary.currency);
        println!("Structures built: {}  Ore emitted: {}", summary.structures_built, summary.ore_emitted);
        let mut population: Vec<_> = summary.population.iter().collect();
        population.sort_by_key(|(kind, _)| kind.name());
        for (kind, n) in population {
            println!("  {:<16} {}", kind.name(), n);
        }
        let mut kills: Vec<_> = summary.kills.iter().collect();
        kills.sort_by_key(|(kind, _)| kind.name());
        for (kind, n) in kills {
            println!("  killed {:<9} {}", kind.name(), n);
        }
    }

    Ok(())
}

fn scatter(sim: &mut Simulation, rng: &mut ChaCha8Rng, n: u32, mode: SpawnMode) {
    let viewport = sim.world.viewport;
    for _ in 0..n {
        let at = Vec2::new(
            rng.gen_range(0.0..viewport.width),
            rng.gen_range(0.0..viewport.height),
        );
        sim.spawn(mode, at);
    }
}
