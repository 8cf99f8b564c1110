//! Spawn modes - what the next click on the surface creates

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::city::construction;
use crate::core::error::SandboxError;
use crate::core::types::Vec2;
use crate::ecs::world::{
    BeastId, DefenderId, GuardianId, HostileId, ResourceId, SettlerId, WandererId, World,
};
use crate::entity::species::settler::SettlerRole;
use crate::simulation::events::SimulationEvent;
use crate::simulation::resource::Material;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpawnMode {
    #[default]
    Settler,
    Hostile,
    ApexBeast,
    Wanderer,
    Defender,
    Guardian,
    Resource(Material),
}

impl fmt::Display for SpawnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnMode::Settler => write!(f, "settler"),
            SpawnMode::Hostile => write!(f, "hostile"),
            SpawnMode::ApexBeast => write!(f, "beast"),
            SpawnMode::Wanderer => write!(f, "wanderer"),
            SpawnMode::Defender => write!(f, "defender"),
            SpawnMode::Guardian => write!(f, "guardian"),
            SpawnMode::Resource(m) => write!(f, "{}", m.name()),
        }
    }
}

impl FromStr for SpawnMode {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let mode = match lowered.as_str() {
            "settler" | "human" => SpawnMode::Settler,
            "hostile" | "monster" => SpawnMode::Hostile,
            "beast" | "apex" | "rhino" => SpawnMode::ApexBeast,
            "wanderer" | "alien" => SpawnMode::Wanderer,
            "defender" | "gef" => SpawnMode::Defender,
            "guardian" | "golem" => SpawnMode::Guardian,
            other => other
                .parse::<Material>()
                .map(SpawnMode::Resource)
                .map_err(|_| SandboxError::UnknownSpawnMode(s.to_string()))?,
        };
        Ok(mode)
    }
}

/// Handle of whatever a click created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawned {
    Settler(SettlerId),
    Hostile(HostileId),
    ApexBeast(BeastId),
    Wanderer(WandererId),
    Defender(DefenderId),
    Guardian(GuardianId),
    Resource(ResourceId),
}

/// Create one entity of `mode` at `at`, clamped onto the surface
///
/// Settlers get a rolled role; a new defender opens the game shops
/// the game developers are waiting for.
pub fn spawn_at(
    world: &mut World,
    mode: SpawnMode,
    at: Vec2,
    events: &mut Vec<SimulationEvent>,
) -> Spawned {
    let at = world.viewport.clamp(at, 0.0);
    let spawned = match mode {
        SpawnMode::Settler => {
            let role = SettlerRole::roll(&mut world.rng);
            Spawned::Settler(world.add_settler(at, role.kind()))
        }
        SpawnMode::Hostile => Spawned::Hostile(world.add_hostile(at)),
        SpawnMode::ApexBeast => Spawned::ApexBeast(world.add_beast(at)),
        SpawnMode::Wanderer => Spawned::Wanderer(world.add_wanderer(at)),
        SpawnMode::Defender => {
            let id = world.add_defender(at);
            construction::build_game_shops(world, at, events);
            Spawned::Defender(id)
        }
        SpawnMode::Guardian => Spawned::Guardian(world.add_guardian(at)),
        SpawnMode::Resource(material) => Spawned::Resource(world.add_resource(at, material)),
    };
    debug!(mode = %mode, x = at.x, y = at.y, "Spawned");
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::species::RoleKind;

    #[test]
    fn test_parse_modes_and_aliases() {
        assert_eq!("monster".parse::<SpawnMode>().unwrap(), SpawnMode::Hostile);
        assert_eq!("Rhino".parse::<SpawnMode>().unwrap(), SpawnMode::ApexBeast);
        assert_eq!("gef".parse::<SpawnMode>().unwrap(), SpawnMode::Defender);
        assert_eq!(
            "ruby".parse::<SpawnMode>().unwrap(),
            SpawnMode::Resource(Material::Ruby)
        );
        assert!(matches!(
            "dragon".parse::<SpawnMode>(),
            Err(SandboxError::UnknownSpawnMode(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for mode in [
            SpawnMode::Settler,
            SpawnMode::ApexBeast,
            SpawnMode::Resource(Material::Netherite),
        ] {
            assert_eq!(mode.to_string().parse::<SpawnMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_spawn_clamps_to_surface() {
        let mut world = World::default();
        let mut events = Vec::new();
        let Spawned::Hostile(id) =
            spawn_at(&mut world, SpawnMode::Hostile, Vec2::new(-50.0, 5000.0), &mut events)
        else {
            panic!("expected a hostile");
        };
        let pos = world.hostiles.get(id).unwrap().position;
        assert_eq!(pos, Vec2::new(0.0, 720.0));
    }

    #[test]
    fn test_defender_spawn_opens_shops() {
        let mut world = World::default();
        world.add_settler(Vec2::new(50.0, 50.0), RoleKind::GameDev);
        world.add_settler(Vec2::new(60.0, 50.0), RoleKind::GameDev);
        let mut events = Vec::new();

        spawn_at(&mut world, SpawnMode::Defender, Vec2::new(640.0, 360.0), &mut events);

        assert_eq!(world.shops.len(), 2);
        assert_eq!(world.defenders.len(), 1);
    }
}
