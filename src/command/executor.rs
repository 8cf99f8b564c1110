//! Command execution - applies console commands to a running simulation

use std::fs;

use tracing::debug;

use crate::command::parser::ConsoleCommand;
use crate::core::error::{Result, SandboxError};
use crate::simulation::clock::Simulation;
use crate::simulation::events::SimulationEvent;

pub const HELP: &str = "\
Commands:
  mode <kind>                  - Choose what click spawns (settler, hostile, beast, wanderer,
                                 defender, guardian, or a material such as diamond)
  click <x> <y>                - Spawn with the current mode
  spawn <kind> <x> <y> [n]     - Spawn n entities of a kind (limit: console_max_spawn)
  run <n>                      - Advance n frames (pause and speed apply; limit: console_max_frames)
  tick / t                     - Advance one frame-length step, even while paused
  pause / p                    - Toggle pause
  speed <n>                    - Steps per frame; also unpauses (limit: console_max_speed)
  shape <complete|four|half>   - Change the world shape
  theme <earth|mars|moon|jupiter>
  reset                        - Clear the world and pause
  status / s                   - Show counts and currency
  snapshot [path]              - Print or write the JSON snapshot
  quit / q                     - Exit";

/// Result of executing a command
#[derive(Debug, Default)]
pub struct ExecutionResult {
    /// Lines for the console to print
    pub lines: Vec<String>,
    pub events: Vec<SimulationEvent>,
    pub quit: bool,
}

impl ExecutionResult {
    fn say(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            ..Self::default()
        }
    }
}

/// Executes console commands against a simulation
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn execute(sim: &mut Simulation, command: &ConsoleCommand) -> Result<ExecutionResult> {
        debug!(?command, "Executing console command");
        let result = match command {
            ConsoleCommand::Mode(mode) => {
                sim.spawn_mode = *mode;
                ExecutionResult::say(format!("Spawn mode: {}", mode))
            }
            ConsoleCommand::Click(at) => {
                let (spawned, events) = sim.click(*at);
                ExecutionResult {
                    lines: vec![format!("Spawned {:?} at ({:.0}, {:.0})", spawned, at.x, at.y)],
                    events,
                    quit: false,
                }
            }
            ConsoleCommand::Spawn { mode, at, count } => {
                within_limit("spawn count", *count, sim.world.config.console_max_spawn)?;
                let mut events = Vec::new();
                for _ in 0..*count {
                    events.extend(sim.spawn(*mode, *at).1);
                }
                ExecutionResult {
                    lines: vec![format!("Spawned {} x {}", count, mode)],
                    events,
                    quit: false,
                }
            }
            ConsoleCommand::Run(frames) => {
                within_limit("run frames", *frames, sim.world.config.console_max_frames)?;
                let dt = sim.world.config.frame_seconds;
                let mut events = Vec::new();
                for _ in 0..*frames {
                    events.extend(sim.advance_frame(dt));
                }
                let line = if sim.clock.is_paused() {
                    "Paused - nothing ran (use 'pause' or 'speed <n>')".to_string()
                } else {
                    format!("Ran {} frames. Now at tick {}.", frames, sim.world.current_tick)
                };
                ExecutionResult {
                    lines: vec![line],
                    events,
                    quit: false,
                }
            }
            ConsoleCommand::Tick => {
                let events = sim.step();
                ExecutionResult {
                    lines: vec![format!("Tick {} complete.", sim.world.current_tick)],
                    events,
                    quit: false,
                }
            }
            ConsoleCommand::TogglePause => {
                let paused = sim.clock.toggle_pause();
                ExecutionResult::say(if paused { "Paused" } else { "Running" })
            }
            ConsoleCommand::Speed(n) => {
                within_limit("speed", *n, sim.world.config.console_max_speed)?;
                sim.clock.set_speed(*n);
                ExecutionResult::say(format!("Speed x{}", sim.clock.speed()))
            }
            ConsoleCommand::Shape(shape) => {
                sim.set_shape(*shape);
                ExecutionResult::say(format!("World shape: {}", shape.name()))
            }
            ConsoleCommand::Theme(theme) => {
                sim.set_theme(*theme);
                ExecutionResult::say(format!("World theme: {}", theme.name()))
            }
            ConsoleCommand::Reset => {
                sim.reset();
                ExecutionResult::say("World reset (paused)")
            }
            ConsoleCommand::Status => ExecutionResult {
                lines: status_lines(sim),
                ..ExecutionResult::default()
            },
            ConsoleCommand::Snapshot(path) => {
                let json = sim.snapshot().to_json()?;
                match path {
                    Some(path) => {
                        fs::write(path, json)?;
                        ExecutionResult::say(format!("Snapshot written to {}", path.display()))
                    }
                    None => ExecutionResult::say(json),
                }
            }
            ConsoleCommand::Help => ExecutionResult::say(HELP),
            ConsoleCommand::Quit => ExecutionResult {
                quit: true,
                ..ExecutionResult::default()
            },
        };
        Ok(result)
    }
}

fn status_lines(sim: &Simulation) -> Vec<String> {
    let world = &sim.world;
    vec![
        format!(
            "Tick {} | {} | speed x{} | shape {} | theme {} | currency {}",
            world.current_tick,
            if sim.clock.is_paused() { "paused" } else { "running" },
            sim.clock.speed(),
            world.shape.name(),
            world.theme.name(),
            world.treasury.displayed()
        ),
        format!(
            "  settlers {} | hostiles {} | beasts {} | wanderers {} | defenders {} | guardians {} | pets {}",
            world.settlers.len(),
            world.hostiles.len(),
            world.beasts.len(),
            world.wanderers.len(),
            world.defenders.len(),
            world.guardians.len(),
            world.pets.len()
        ),
        format!(
            "  resources {} | dwellings {} | farms {} | markets {} | shops {} | mines {} | settlements {}",
            world.resources.len(),
            world.dwellings.len(),
            world.farms.len(),
            world.markets.len(),
            world.shops.len(),
            world.mines.len(),
            world.settlements.len()
        ),
    ]
}

fn within_limit(what: &str, value: u32, limit: u32) -> Result<()> {
    if value > limit {
        return Err(SandboxError::InvalidCommand(format!(
            "{} {} exceeds the limit of {}",
            what, value, limit
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::Vec2;
    use crate::entity::species::RoleKind;

    fn sim() -> Simulation {
        Simulation::new(SimulationConfig::default()).unwrap()
    }

    fn run(sim: &mut Simulation, line: &str) -> ExecutionResult {
        let command: ConsoleCommand = line.parse().unwrap();
        CommandExecutor::execute(sim, &command).unwrap()
    }

    #[test]
    fn test_mode_then_click() {
        let mut sim = sim();
        run(&mut sim, "mode monster");
        run(&mut sim, "click 100 100");
        assert_eq!(sim.world.hostiles.len(), 1);
    }

    #[test]
    fn test_run_while_paused_does_nothing() {
        let mut sim = sim();
        let result = run(&mut sim, "run 10");
        assert_eq!(sim.world.current_tick, 0);
        assert!(result.lines[0].starts_with("Paused"));

        run(&mut sim, "speed 2");
        run(&mut sim, "run 10");
        assert_eq!(sim.world.current_tick, 20);
    }

    #[test]
    fn test_tick_ignores_pause() {
        let mut sim = sim();
        run(&mut sim, "tick");
        assert_eq!(sim.world.current_tick, 1);
    }

    #[test]
    fn test_spawn_count_and_reset() {
        let mut sim = sim();
        run(&mut sim, "spawn golem 300 300 3");
        assert_eq!(sim.world.guardians.len(), 3);
        run(&mut sim, "reset");
        assert_eq!(sim.world.entity_count(), 0);
    }

    #[test]
    fn test_oversized_requests_are_refused() {
        let mut sim = sim();
        sim.world.config.console_max_spawn = 5;
        sim.world.config.console_max_frames = 100;
        sim.world.config.console_max_speed = 8;

        for line in ["spawn settler 10 10 6", "run 101", "speed 9"] {
            let command: ConsoleCommand = line.parse().unwrap();
            let result = CommandExecutor::execute(&mut sim, &command);
            assert!(matches!(result, Err(SandboxError::InvalidCommand(_))), "{}", line);
        }
        assert!(sim.world.settlers.is_empty());
        assert!(sim.clock.is_paused());
        assert_eq!(sim.world.current_tick, 0);

        run(&mut sim, "spawn settler 10 10 5");
        assert_eq!(sim.world.settlers.len(), 5);
        run(&mut sim, "speed 8");
        run(&mut sim, "run 100");
        assert_eq!(sim.world.current_tick, 800);
    }

    #[test]
    fn test_tick_runs_the_mine_check() {
        let mut sim = sim();
        sim.world.add_settler(Vec2::new(100.0, 100.0), RoleKind::Miner);
        sim.world.add_defender(Vec2::new(640.0, 360.0));
        for _ in 0..31 {
            run(&mut sim, "tick");
        }
        assert_eq!(sim.world.mines.len(), 1);
    }

    #[test]
    fn test_status_and_quit() {
        let mut sim = sim();
        let status = run(&mut sim, "status");
        assert_eq!(status.lines.len(), 3);
        assert!(status.lines[0].contains("paused"));
        assert!(run(&mut sim, "q").quit);
    }

    #[test]
    fn test_snapshot_prints_json() {
        let mut sim = sim();
        run(&mut sim, "spawn ruby 50 50");
        let result = run(&mut sim, "snapshot");
        assert!(result.lines[0].contains("\"ruby\""));
    }
}
