//! Read-only view of the world for renderers and tooling

use ahash::AHashMap;
use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{Tick, Vec2, Viewport};
use crate::ecs::world::World;
use crate::entity::species::apex_beast::BEAST_HEALTH;
use crate::entity::species::defender::DEFENDER_HEALTH;
use crate::entity::species::guardian::GUARDIAN_HEALTH;
use crate::entity::species::hostile::HOSTILE_HEALTH;
use crate::entity::species::settler::SETTLER_HEALTH;
use crate::entity::species::wanderer::WANDERER_HEALTH;
use crate::simulation::events::EntityKind;
use crate::simulation::resource::Material;
use crate::spatial::query::Positioned;
use crate::world::terrain::WorldShape;
use crate::world::theme::WorldTheme;

/// One drawable entity or structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEntity {
    pub kind: EntityKind,
    pub position: Vec2,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl RenderEntity {
    fn at(kind: EntityKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            health_ratio: None,
            role: None,
            material: None,
            armor: None,
            state: None,
            level: None,
            food: None,
            hidden: None,
        }
    }

    fn health(mut self, health: f32, max: f32) -> Self {
        self.health_ratio = Some((health / max).clamp(0.0, 1.0));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    /// Whole currency units
    pub currency: u64,
    pub paused: bool,
    pub speed: u32,
    pub shape: WorldShape,
    pub theme: WorldTheme,
    pub viewport: Viewport,
    pub entities: Vec<RenderEntity>,
}

impl WorldSnapshot {
    pub fn capture(world: &World, paused: bool, speed: u32) -> Self {
        let mut entities = Vec::with_capacity(world.entity_count() + world.resources.len());

        entities.extend(world.resources.values().map(|r| RenderEntity {
            material: Some(r.material),
            ..RenderEntity::at(EntityKind::Resource, r.position)
        }));
        entities.extend(world.dwellings.values().map(|d| RenderEntity {
            level: Some(d.level),
            ..RenderEntity::at(EntityKind::Dwelling, d.position)
        }));
        entities.extend(world.farms.values().map(|f| RenderEntity {
            food: Some(f.food),
            ..RenderEntity::at(EntityKind::Farm, f.position)
        }));
        entities.extend(
            world
                .markets
                .positions()
                .map(|p| RenderEntity::at(EntityKind::Market, p)),
        );
        entities.extend(
            world
                .shops
                .positions()
                .map(|p| RenderEntity::at(EntityKind::GameShop, p)),
        );
        entities.extend(
            world
                .mines
                .positions()
                .map(|p| RenderEntity::at(EntityKind::Mine, p)),
        );
        entities.extend(
            world
                .settlements
                .positions()
                .map(|p| RenderEntity::at(EntityKind::MiniSettlement, p)),
        );

        entities.extend(world.settlers.values().map(|s| {
            RenderEntity {
                role: Some(s.role.kind().name()),
                material: s.weapon.material,
                armor: Some(s.armor.level()),
                ..RenderEntity::at(EntityKind::Settler, s.position())
            }
            .health(s.health, SETTLER_HEALTH)
        }));
        entities.extend(world.hostiles.values().map(|h| {
            RenderEntity::at(EntityKind::Hostile, h.position).health(h.health, HOSTILE_HEALTH)
        }));
        entities.extend(world.beasts.values().map(|b| {
            RenderEntity {
                state: Some(b.state.name()),
                ..RenderEntity::at(EntityKind::ApexBeast, b.position)
            }
            .health(b.health, BEAST_HEALTH)
        }));
        entities.extend(world.wanderers.values().map(|w| {
            RenderEntity {
                role: Some(w.role.name()),
                material: w.weapon.material,
                armor: Some(w.armor.level()),
                state: Some(w.state.name()),
                ..RenderEntity::at(EntityKind::Wanderer, w.position)
            }
            .health(w.health, WANDERER_HEALTH)
        }));
        entities.extend(world.defenders.values().map(|d| {
            RenderEntity::at(EntityKind::Defender, d.position).health(d.health, DEFENDER_HEALTH)
        }));
        entities.extend(world.guardians.values().map(|g| {
            RenderEntity::at(EntityKind::Guardian, g.position).health(g.health, GUARDIAN_HEALTH)
        }));
        entities.extend(world.pets.values().map(|p| RenderEntity {
            role: Some(p.kind.name()),
            hidden: Some(p.inside),
            ..RenderEntity::at(EntityKind::Pet, p.position)
        }));

        Self {
            tick: world.current_tick,
            currency: world.treasury.displayed(),
            paused,
            speed,
            shape: world.shape,
            theme: world.theme,
            viewport: world.viewport,
            entities,
        }
    }

    /// Number of entries per kind
    pub fn counts(&self) -> AHashMap<EntityKind, usize> {
        let mut counts = AHashMap::new();
        for entity in &self.entities {
            *counts.entry(entity.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
