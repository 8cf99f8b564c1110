//! Events emitted by a simulation step
//!
//! The step returns these instead of logging from deep inside behavior code;
//! callers decide what to print or tally.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::entity::species::pet::PetKind;
use crate::entity::species::settler::RoleKind;
use crate::simulation::resource::Material;

/// Every kind of thing that can appear on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Settler,
    Hostile,
    ApexBeast,
    Wanderer,
    Defender,
    Guardian,
    Pet,
    Resource,
    Dwelling,
    Farm,
    Market,
    GameShop,
    Mine,
    MiniSettlement,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Settler => "settler",
            EntityKind::Hostile => "hostile",
            EntityKind::ApexBeast => "apex_beast",
            EntityKind::Wanderer => "wanderer",
            EntityKind::Defender => "defender",
            EntityKind::Guardian => "guardian",
            EntityKind::Pet => "pet",
            EntityKind::Resource => "resource",
            EntityKind::Dwelling => "dwelling",
            EntityKind::Farm => "farm",
            EntityKind::Market => "market",
            EntityKind::GameShop => "game_shop",
            EntityKind::Mine => "mine",
            EntityKind::MiniSettlement => "mini_settlement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// Health reached zero; the entity was removed on the spot
    Killed { kind: EntityKind, position: Vec2 },
    ResourceCollected {
        collector: EntityKind,
        material: Material,
        /// The collector's weapon changed
        upgraded: bool,
    },
    Built { kind: EntityKind, position: Vec2 },
    DwellingUpgraded { position: Vec2 },
    PetAdopted { kind: PetKind, position: Vec2 },
    RoleChanged { from: RoleKind, to: RoleKind },
    OreEmitted { material: Material, position: Vec2 },
}

impl SimulationEvent {
    /// Short label used for tallies
    pub fn label(&self) -> &'static str {
        match self {
            SimulationEvent::Killed { .. } => "killed",
            SimulationEvent::ResourceCollected { .. } => "collected",
            SimulationEvent::Built { .. } => "built",
            SimulationEvent::DwellingUpgraded { .. } => "upgraded",
            SimulationEvent::PetAdopted { .. } => "pet",
            SimulationEvent::RoleChanged { .. } => "role_changed",
            SimulationEvent::OreEmitted { .. } => "ore",
        }
    }
}
