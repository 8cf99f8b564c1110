//! Simulation clock - pause flag, speed multiplier and frame driving
//!
//! The host calls [`Simulation::advance_frame`] once per rendered frame.
//! A paused clock runs nothing; otherwise the frame runs `speed` steps with
//! the same `dt` each. The mine-existence check runs on its own interval of
//! unpaused frame time.

use tracing::info;

use crate::city::construction;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::Vec2;
use crate::ecs::world::World;
use crate::simulation::events::SimulationEvent;
use crate::simulation::snapshot::WorldSnapshot;
use crate::simulation::spawn::{spawn_at, SpawnMode, Spawned};
use crate::simulation::tick::run_simulation_step;
use crate::world::terrain::WorldShape;
use crate::world::theme::WorldTheme;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    paused: bool,
    speed: u32,
    /// Unpaused frame time since the last mine check
    mine_check_elapsed: f32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            paused: true,
            speed: 1,
            mine_check_elapsed: 0.0,
        }
    }
}

impl SimulationClock {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Returns the new paused flag
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Choose steps per frame (at least 1); choosing a speed also starts the clock
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.max(1);
        self.paused = false;
    }

    /// Accumulate frame time; returns how many mine checks are due
    fn mine_checks_due(&mut self, dt: f32, interval: f32) -> u32 {
        self.mine_check_elapsed += dt;
        let mut due = 0;
        while self.mine_check_elapsed >= interval {
            self.mine_check_elapsed -= interval;
            due += 1;
        }
        due
    }
}

/// The world plus the clock that drives it
pub struct Simulation {
    pub world: World,
    pub clock: SimulationClock,
    /// What the next click spawns
    pub spawn_mode: SpawnMode,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        info!(
            seed = config.seed,
            width = config.viewport_width,
            height = config.viewport_height,
            shape = config.world_shape.name(),
            "Simulation created"
        );
        Ok(Self {
            world: World::new(config),
            clock: SimulationClock::default(),
            spawn_mode: SpawnMode::default(),
        })
    }

    /// Run one rendered frame of `dt` seconds
    pub fn advance_frame(&mut self, dt: f32) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        if self.clock.is_paused() {
            return events;
        }

        for _ in 0..self.clock.speed() {
            events.extend(run_simulation_step(&mut self.world, dt));
        }
        self.run_mine_checks(dt, &mut events);
        events
    }

    /// Single step of `frame_seconds` regardless of pause state
    ///
    /// Counts as one frame of elapsed time for the mine check.
    pub fn step(&mut self) -> Vec<SimulationEvent> {
        let dt = self.world.config.frame_seconds;
        let mut events = run_simulation_step(&mut self.world, dt);
        self.run_mine_checks(dt, &mut events);
        events
    }

    fn run_mine_checks(&mut self, dt: f32, events: &mut Vec<SimulationEvent>) {
        let interval = self.world.config.mine_check_interval;
        for _ in 0..self.clock.mine_checks_due(dt, interval) {
            construction::ensure_mine(&mut self.world, events);
        }
    }

    /// Click with the current spawn mode
    pub fn click(&mut self, at: Vec2) -> (Spawned, Vec<SimulationEvent>) {
        let mode = self.spawn_mode;
        self.spawn(mode, at)
    }

    pub fn spawn(&mut self, mode: SpawnMode, at: Vec2) -> (Spawned, Vec<SimulationEvent>) {
        let mut events = Vec::new();
        let spawned = spawn_at(&mut self.world, mode, at, &mut events);
        (spawned, events)
    }

    /// Clear everything and pause; shape, theme and viewport are kept
    pub fn reset(&mut self) {
        self.world.reset();
        self.clock.pause();
        self.clock.mine_check_elapsed = 0.0;
        info!(shape = self.world.shape.name(), "Simulation reset");
    }

    pub fn set_shape(&mut self, shape: WorldShape) {
        if self.world.shape != shape {
            info!(from = self.world.shape.name(), to = shape.name(), "World shape changed");
        }
        self.world.shape = shape;
    }

    pub fn set_theme(&mut self, theme: WorldTheme) {
        self.world.theme = theme;
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world, self.clock.is_paused(), self.clock.speed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::species::RoleKind;

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> Simulation {
        Simulation::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_paused() {
        let mut sim = sim();
        assert!(sim.clock.is_paused());
        sim.world.add_market(Vec2::new(100.0, 100.0));
        assert!(sim.advance_frame(DT).is_empty());
        assert_eq!(sim.world.current_tick, 0);
        assert_eq!(sim.world.treasury.balance(), 0.0);
    }

    #[test]
    fn test_speed_runs_multiple_steps_and_unpauses() {
        let mut sim = sim();
        sim.clock.set_speed(4);
        assert!(!sim.clock.is_paused());
        sim.advance_frame(DT);
        assert_eq!(sim.world.current_tick, 4);
    }

    #[test]
    fn test_zero_speed_is_one() {
        let mut clock = SimulationClock::default();
        clock.set_speed(0);
        assert_eq!(clock.speed(), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = SimulationClock::default();
        assert!(!clock.toggle_pause());
        assert!(clock.toggle_pause());
    }

    #[test]
    fn test_mine_check_runs_on_interval() {
        let mut sim = sim();
        sim.world.add_settler(Vec2::new(100.0, 100.0), RoleKind::Miner);
        sim.world.add_defender(Vec2::new(640.0, 360.0));
        sim.clock.resume();

        // 29 frames is under half a second
        for _ in 0..29 {
            sim.advance_frame(DT);
        }
        assert!(sim.world.mines.is_empty());
        for _ in 0..2 {
            sim.advance_frame(DT);
        }
        assert_eq!(sim.world.mines.len(), 1);
    }

    #[test]
    fn test_single_steps_reach_the_mine_check() {
        let mut sim = sim();
        sim.world.add_settler(Vec2::new(100.0, 100.0), RoleKind::Miner);
        sim.world.add_defender(Vec2::new(640.0, 360.0));
        assert!(sim.clock.is_paused());

        for _ in 0..29 {
            sim.step();
        }
        assert!(sim.world.mines.is_empty());
        for _ in 0..2 {
            sim.step();
        }
        assert_eq!(sim.world.mines.len(), 1);
    }

    #[test]
    fn test_reset_pauses_and_clears() {
        let mut sim = sim();
        sim.set_shape(WorldShape::Four);
        sim.set_theme(WorldTheme::Moon);
        sim.clock.set_speed(2);
        sim.spawn(SpawnMode::Hostile, Vec2::new(100.0, 100.0));
        sim.advance_frame(DT);

        sim.reset();

        assert!(sim.clock.is_paused());
        assert_eq!(sim.world.entity_count(), 0);
        assert_eq!(sim.world.current_tick, 0);
        assert_eq!(sim.world.shape, WorldShape::Four);
        assert_eq!(sim.world.theme, WorldTheme::Moon);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            viewport_width: 0.0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }
}
