//! Defender constructs - escort settlers, shield them from threats and build

use crate::city::construction;
use crate::combat::strike::{strike_within, Combatant};
use crate::combat::threat::nearest_threat;
use crate::core::types::Vec2;
use crate::ecs::world::{DefenderId, World};
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::Positioned;
use crate::spatial::steering::{direct_step, heading, jitter};

pub const DEFENDER_HEALTH: f32 = 100.0;
pub const DEFENDER_SPEED: f32 = 1.3;
pub const HOSTILE_DAMAGE: f32 = 1.2;
pub const HOSTILE_REACH: f32 = 25.0;
pub const BEAST_DAMAGE: f32 = 1.8;
pub const BEAST_REACH: f32 = 28.0;
/// Farther than this from its settler the defender walks back
pub const ESCORT_DISTANCE: f32 = 70.0;
const ESCORT_WEIGHT: f32 = 1.1;
const SHIELD_WEIGHT: f32 = 1.3;
pub const BUILD_RANGE: f32 = 60.0;
pub const BUILD_COOLDOWN: u32 = 240;
/// Unescorted defenders above this health go after threats
const BRAVE_HEALTH: f32 = 60.0;
const FLEE_WEIGHT: f32 = 1.3;
const NOISE: f32 = 0.12;
const EDGE_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DefenderConstruct {
    pub position: Vec2,
    pub health: f32,
    pub speed: f32,
    pub build_cooldown: u32,
}

impl DefenderConstruct {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            health: DEFENDER_HEALTH,
            speed: DEFENDER_SPEED,
            build_cooldown: 0,
        }
    }
}

impl Positioned for DefenderConstruct {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Combatant for DefenderConstruct {
    fn health(&self) -> f32 {
        self.health
    }

    fn health_mut(&mut self) -> &mut f32 {
        &mut self.health
    }
}

pub fn update_defender(world: &mut World, id: DefenderId, events: &mut Vec<SimulationEvent>) {
    let Some(mut me) = world.defenders.get(id).cloned() else {
        return;
    };
    me.build_cooldown = me.build_cooldown.saturating_sub(1);

    strike_within(&mut world.hostiles, me.position, HOSTILE_REACH, HOSTILE_DAMAGE)
        .record(EntityKind::Hostile, events);
    strike_within(&mut world.beasts, me.position, BEAST_REACH, BEAST_DAMAGE)
        .record(EntityKind::ApexBeast, events);

    let pos = me.position;
    let escorted = world
        .settlers
        .nearest(pos)
        .map(|(sid, s)| (sid, s.position()));
    let threat = nearest_threat(world, pos).map(|(_, at)| at);

    let mut dir = Vec2::ZERO;
    match escorted {
        Some((settler, settler_pos)) => {
            let (toward, d) = heading(pos, settler_pos);
            if d > ESCORT_DISTANCE {
                dir += toward * ESCORT_WEIGHT;
            }
            if let Some(threat_pos) = threat {
                let guard_post = settler_pos.midpoint(&threat_pos);
                dir += heading(pos, guard_post).0 * SHIELD_WEIGHT;
            }
            if d <= BUILD_RANGE && me.build_cooldown == 0 {
                construction::try_build_dwelling(world, settler_pos, events);
                construction::try_build_market(world, settler, events);
                me.build_cooldown = BUILD_COOLDOWN;
            }
        }
        None => {
            if let Some(threat_pos) = threat {
                let (toward, _) = heading(pos, threat_pos);
                if me.health > BRAVE_HEALTH {
                    dir += toward;
                } else {
                    dir -= toward * FLEE_WEIGHT;
                }
            }
        }
    }
    dir += jitter(&mut world.rng, NOISE);

    me.position = direct_step(pos, dir, me.speed);
    me.position = world.viewport.clamp(me.position, EDGE_MARGIN);

    if let Some(slot) = world.defenders.get_mut(id) {
        *slot = me;
    }
}
