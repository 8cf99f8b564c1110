//! Life Sandbox - interactive console
//!
//! Stands in for the graphical input layer: every button and click of the
//! canvas UI has a text command. Pass a TOML config path as the first
//! argument to override the defaults.

use std::io::{self, Write};
use std::path::Path;

use ahash::AHashMap;
use life_sandbox::command::{CommandExecutor, ConsoleCommand, HELP};
use life_sandbox::core::config::SimulationConfig;
use life_sandbox::core::error::Result;
use life_sandbox::simulation::{Simulation, SimulationEvent};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("life_sandbox=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(Path::new(&path))?,
        None => SimulationConfig::default(),
    };

    tracing::info!("Life Sandbox starting...");
    let mut sim = Simulation::new(config)?;

    println!("\n=== LIFE SANDBOX ===");
    println!("Settlers, creatures and constructs on a shared world");
    println!();
    println!("{}", HELP);
    println!();

    loop {
        display_status(&sim);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let command = match input.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match CommandExecutor::execute(&mut sim, &command) {
            Ok(result) => {
                for line in &result.lines {
                    println!("{}", line);
                }
                print_event_tally(&result.events);
                if result.quit {
                    break;
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    tracing::info!("Life Sandbox shutting down");
    Ok(())
}

fn display_status(sim: &Simulation) {
    let world = &sim.world;
    println!();
    println!(
        "--- Tick {} | {} | Settlers: {} | Currency: {} | Spawn: {} ---",
        world.current_tick,
        if sim.clock.is_paused() { "paused" } else { "running" },
        world.settlers.len(),
        world.treasury.displayed(),
        sim.spawn_mode
    );
}

fn print_event_tally(events: &[SimulationEvent]) {
    if events.is_empty() {
        return;
    }
    let mut tally: AHashMap<&'static str, usize> = AHashMap::new();
    for event in events {
        *tally.entry(event.label()).or_insert(0) += 1;
    }
    let mut entries: Vec<_> = tally.into_iter().collect();
    entries.sort();
    let summary: Vec<String> = entries
        .iter()
        .map(|(label, n)| format!("{} {}", n, label))
        .collect();
    println!("Events: {}", summary.join(", "));
}
