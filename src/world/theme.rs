//! Presentation theme of the world surface
//!
//! Only renderers read this; the simulation behaves the same on every theme.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SandboxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldTheme {
    #[default]
    Earth,
    Mars,
    Moon,
    Jupiter,
}

impl WorldTheme {
    pub fn name(&self) -> &'static str {
        match self {
            WorldTheme::Earth => "earth",
            WorldTheme::Mars => "mars",
            WorldTheme::Moon => "moon",
            WorldTheme::Jupiter => "jupiter",
        }
    }
}

impl FromStr for WorldTheme {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "earth" => Ok(WorldTheme::Earth),
            "mars" => Ok(WorldTheme::Mars),
            "moon" => Ok(WorldTheme::Moon),
            "jupiter" => Ok(WorldTheme::Jupiter),
            other => Err(SandboxError::UnknownWorldTheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme_round_trips_name() {
        for theme in [
            WorldTheme::Earth,
            WorldTheme::Mars,
            WorldTheme::Moon,
            WorldTheme::Jupiter,
        ] {
            assert_eq!(theme.name().parse::<WorldTheme>().unwrap(), theme);
        }
        assert!("venus".parse::<WorldTheme>().is_err());
    }
}
