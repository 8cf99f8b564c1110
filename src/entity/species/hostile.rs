//! Hostile creatures - chase the nearest settler and bite on contact

use crate::combat::strike::{strike_within, Combatant};
use crate::core::types::Vec2;
use crate::ecs::world::{HostileId, World};
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::Positioned;
use crate::spatial::steering::{direct_step, heading, jitter};

pub const HOSTILE_HEALTH: f32 = 30.0;
pub const HOSTILE_SPEED: f32 = 1.1;
pub const HOSTILE_DAMAGE: f32 = 1.5;
pub const HOSTILE_REACH: f32 = 20.0;
const NOISE: f32 = 0.15;
const EDGE_MARGIN: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct HostileCreature {
    pub position: Vec2,
    pub health: f32,
    pub speed: f32,
}

impl HostileCreature {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            health: HOSTILE_HEALTH,
            speed: HOSTILE_SPEED,
        }
    }
}

impl Positioned for HostileCreature {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Combatant for HostileCreature {
    fn health(&self) -> f32 {
        self.health
    }

    fn health_mut(&mut self) -> &mut f32 {
        &mut self.health
    }
}

pub fn update_hostile(world: &mut World, id: HostileId, events: &mut Vec<SimulationEvent>) {
    let Some(mut me) = world.hostiles.get(id).cloned() else {
        return;
    };

    strike_within(&mut world.settlers, me.position, HOSTILE_REACH, HOSTILE_DAMAGE)
        .record(EntityKind::Settler, events);

    let mut dir = world
        .settlers
        .nearest(me.position)
        .map(|(_, s)| heading(me.position, s.position()).0)
        .unwrap_or(Vec2::ZERO);
    dir += jitter(&mut world.rng, NOISE);

    me.position = direct_step(me.position, dir, me.speed);
    me.position = world.viewport.clamp(me.position, EDGE_MARGIN);

    if let Some(slot) = world.hostiles.get_mut(id) {
        *slot = me;
    }
}
