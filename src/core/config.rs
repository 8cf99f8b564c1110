//! Simulation configuration with documented constants
//!
//! The crowd thresholds and probabilities below are tunables rather than
//! physics: they shape how the species behave around each other. Per-species
//! stats (health, speed, reach) live next to the species that owns them.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SandboxError};
use crate::core::types::Viewport;
use crate::world::terrain::WorldShape;

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === WORLD ===
    /// Width of the simulated surface (world units)
    pub viewport_width: f32,

    /// Height of the simulated surface (world units)
    pub viewport_height: f32,

    /// Seed for the world RNG
    ///
    /// Every stochastic decision (spawn roles, steering noise, placement
    /// jitter, pet rolls, mine emission) draws from one seeded stream.
    pub seed: u64,

    /// Starting world shape
    pub world_shape: WorldShape,

    /// Frame duration used by headless runs (seconds)
    ///
    /// Interactive front-ends pass their own measured frame time instead.
    pub frame_seconds: f32,

    // === APEX BEAST ===
    /// Settlers within 80 units that make an apex beast retreat
    pub beast_retreat_crowd: usize,

    /// Maximum settlers within 80 units for an apex beast to charge
    pub beast_charge_max_crowd: usize,

    /// Steps a charge lasts before the beast falls back to hunting
    ///
    /// The default is a single-step lunge.
    pub beast_charge_ticks: u32,

    // === NEUTRAL WANDERER ===
    /// Combined nearby settlers + beasts that make a wanderer retreat
    pub wanderer_retreat_crowd: usize,

    /// Nearby settlers at which a wanderer flanks instead of hunting
    pub wanderer_flank_crowd: usize,

    /// Health below which a wanderer retreats
    pub wanderer_retreat_health: f32,

    // === SETTLERS ===
    /// Hostile creatures within 80 units a settler still engages
    ///
    /// Above this, the settler backs off to regroup.
    pub settler_regroup_threshold: usize,

    /// Per-tick chance a normal settler becomes a farmer when farms exist
    pub farmer_conversion_chance: f64,

    // === STRUCTURES ===
    /// Chance that a new or upgraded dwelling spawns a pet
    pub pet_spawn_chance: f64,

    /// Dwelling count that founds the mini-settlement
    pub settlement_dwelling_threshold: usize,

    /// Interval between mine-existence checks (seconds of unpaused time)
    pub mine_check_interval: f32,

    // === CONSOLE ===
    /// Most entities one `spawn` command may create
    pub console_max_spawn: u32,

    /// Most frames one `run` command may advance
    pub console_max_frames: u32,

    /// Highest steps-per-frame a `speed` command may select
    pub console_max_speed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            seed: 12345,
            world_shape: WorldShape::Complete,
            frame_seconds: 1.0 / 60.0,

            beast_retreat_crowd: 4,
            beast_charge_max_crowd: 2,
            beast_charge_ticks: 1,

            wanderer_retreat_crowd: 6,
            wanderer_flank_crowd: 3,
            wanderer_retreat_health: 80.0,

            settler_regroup_threshold: 2,
            farmer_conversion_chance: 0.0005,

            pet_spawn_chance: 1.0,
            settlement_dwelling_threshold: 35,
            mine_check_interval: 0.5,

            console_max_spawn: 500,
            console_max_frames: 36_000,
            console_max_speed: 64,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| SandboxError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(SandboxError::InvalidConfig(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }

        if self.frame_seconds <= 0.0 || self.mine_check_interval <= 0.0 {
            return Err(SandboxError::InvalidConfig(
                "frame_seconds and mine_check_interval must be positive".into(),
            ));
        }

        for (name, p) in [
            ("farmer_conversion_chance", self.farmer_conversion_chance),
            ("pet_spawn_chance", self.pet_spawn_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SandboxError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }

        if self.console_max_spawn == 0 || self.console_max_frames == 0 || self.console_max_speed == 0
        {
            return Err(SandboxError::InvalidConfig(
                "console limits must be at least 1".into(),
            ));
        }

        // A beast that charges into the crowd size it flees from would oscillate
        if self.beast_charge_max_crowd >= self.beast_retreat_crowd {
            return Err(SandboxError::InvalidConfig(format!(
                "beast_charge_max_crowd ({}) should be < beast_retreat_crowd ({})",
                self.beast_charge_max_crowd, self.beast_retreat_crowd
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7
            world_shape = "four"
            beast_retreat_crowd = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world_shape, WorldShape::Four);
        assert_eq!(config.beast_retreat_crowd, 5);
        assert_eq!(config.wanderer_retreat_crowd, 6);
        assert!((config.viewport_width - 1280.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let config = SimulationConfig {
            pet_spawn_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SandboxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_crowd_thresholds_must_be_ordered() {
        let config = SimulationConfig {
            beast_charge_max_crowd: 4,
            beast_retreat_crowd: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_console_limits_must_be_positive() {
        let config = SimulationConfig {
            console_max_frames: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SandboxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_garbage_toml_is_parse_error() {
        let result = SimulationConfig::from_toml_str("seed = [");
        assert!(matches!(result, Err(SandboxError::ConfigParse(_))));
    }
}
