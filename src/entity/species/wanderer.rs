//! Neutral wanderers - powerful roamers that only fight creatures
//!
//! A wanderer collects resources like a settler, scores the hostile
//! creatures and apex beasts around it and picks a tactic: retreat when
//! hurt or swarmed, mine, kite beasts, flank alongside settlers, hunt, or
//! drift toward the crowd and observe.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::strike::{strike_within, Combatant};
use crate::combat::threat::Threat;
use crate::core::types::Vec2;
use crate::ecs::world::{WandererId, World};
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::simulation::resource::{collect_within, Armament, ArmorTier};
use crate::spatial::query::{centroid, Positioned};
use crate::spatial::steering::{direct_step, heading, jitter};

pub const WANDERER_HEALTH: f32 = 345.0;
pub const WANDERER_SPEED: f32 = 2.1;
pub const WANDERER_WEAPON: f32 = 2.4;
pub const WANDERER_REACH: f32 = 24.0;
pub const RETARGET_TICKS: u32 = 60;

const BEAST_SCORE: f32 = 30.0;
const HOSTILE_SCORE: f32 = 25.0;
const DISTANCE_PENALTY: f32 = 0.1;

const SETTLER_RADIUS: f32 = 110.0;
const BEAST_RADIUS: f32 = 120.0;
const RETREAT_RADIUS: f32 = 150.0;

const KITE_STANDOFF: f32 = 90.0;
const KITE_REAPPROACH: f32 = 120.0;
const FLANK_FORWARD: f32 = 0.4;
const FLANK_LATERAL: f32 = 0.8;
const OBSERVE_RESOURCE_PULL: f32 = 0.5;

const NOISE: f32 = 0.08;
const EDGE_MARGIN: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WandererRole {
    Miner,
    Guardian,
}

impl WandererRole {
    /// 60% miner, 40% guardian
    pub fn roll(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.6) {
            WandererRole::Miner
        } else {
            WandererRole::Guardian
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WandererRole::Miner => "miner",
            WandererRole::Guardian => "guardian",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WandererState {
    #[default]
    Observe,
    Hunt,
    Kite,
    Flank,
    Retreat,
    Mine,
}

impl WandererState {
    pub fn name(&self) -> &'static str {
        match self {
            WandererState::Observe => "observe",
            WandererState::Hunt => "hunt",
            WandererState::Kite => "kite",
            WandererState::Flank => "flank",
            WandererState::Retreat => "retreat",
            WandererState::Mine => "mine",
        }
    }

    /// Retreat and observe only get theirs while there is a crowd to react to
    fn speed_multiplier(&self) -> f32 {
        match self {
            WandererState::Mine => 1.05,
            WandererState::Kite => 1.1,
            WandererState::Flank => 1.3,
            WandererState::Retreat => 1.4,
            WandererState::Observe => 0.9,
            WandererState::Hunt => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeutralWanderer {
    pub position: Vec2,
    pub health: f32,
    pub speed: f32,
    pub weapon: Armament,
    pub armor: ArmorTier,
    pub role: WandererRole,
    pub state: WandererState,
    pub target: Option<Threat>,
    pub retarget_cooldown: u32,
    /// +1 or -1, picked at retarget time
    pub flank_side: f32,
}

impl NeutralWanderer {
    pub fn new(position: Vec2, role: WandererRole) -> Self {
        Self {
            position,
            health: WANDERER_HEALTH,
            speed: WANDERER_SPEED,
            weapon: Armament::bare(WANDERER_WEAPON),
            armor: ArmorTier::None,
            role,
            state: WandererState::Observe,
            target: None,
            retarget_cooldown: 0,
            flank_side: 1.0,
        }
    }
}

impl Positioned for NeutralWanderer {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Combatant for NeutralWanderer {
    fn health(&self) -> f32 {
        self.health
    }

    fn health_mut(&mut self) -> &mut f32 {
        &mut self.health
    }
}

/// Highest-scoring creature; earlier candidates win ties, beasts first
pub fn best_target(world: &World, from: Vec2) -> Option<Threat> {
    let beasts = world
        .beasts
        .iter()
        .map(|(id, b)| (Threat::Beast(id), BEAST_SCORE - DISTANCE_PENALTY * b.position.distance(&from)));
    let hostiles = world.hostiles.iter().map(|(id, h)| {
        (
            Threat::Hostile(id),
            HOSTILE_SCORE - DISTANCE_PENALTY * h.position.distance(&from),
        )
    });
    beasts
        .chain(hostiles)
        .min_by_key(|(_, score)| Reverse(OrderedFloat(*score)))
        .map(|(threat, _)| threat)
}

pub fn update_wanderer(world: &mut World, id: WandererId, events: &mut Vec<SimulationEvent>) {
    let Some(mut me) = world.wanderers.get(id).cloned() else {
        return;
    };

    collect_within(
        &mut world.resources,
        me.position,
        &mut me.weapon,
        EntityKind::Wanderer,
        events,
    );
    me.armor = me.armor.max(me.weapon.armor_tier());
    let nearest_resource = world.resources.nearest(me.position).map(|(_, r)| r.position);

    strike_within(&mut world.hostiles, me.position, WANDERER_REACH, me.weapon.power)
        .record(EntityKind::Hostile, events);
    strike_within(&mut world.beasts, me.position, WANDERER_REACH, me.weapon.power)
        .record(EntityKind::ApexBeast, events);

    let target_lost = me.target.map_or(true, |t| !t.is_alive(world));
    if target_lost || me.retarget_cooldown == 0 {
        me.target = best_target(world, me.position);
        me.retarget_cooldown = RETARGET_TICKS;
        me.flank_side = if world.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    } else {
        me.retarget_cooldown -= 1;
    }
    let target_pos = me.target.and_then(|t| t.position(world));

    let settlers_near = world.settlers.count_within(me.position, SETTLER_RADIUS);
    let beasts_near = world.beasts.count_within(me.position, BEAST_RADIUS);
    let cfg = &world.config;
    let is_miner = me.role == WandererRole::Miner;

    me.state = if me.health < cfg.wanderer_retreat_health
        || settlers_near + beasts_near >= cfg.wanderer_retreat_crowd
    {
        WandererState::Retreat
    } else if is_miner && nearest_resource.is_some() && me.target.is_none() {
        WandererState::Mine
    } else if me.target.is_some_and(|t| t.is_beast()) {
        WandererState::Kite
    } else if me.target.is_some() && settlers_near >= cfg.wanderer_flank_crowd {
        WandererState::Flank
    } else if me.target.is_some() {
        WandererState::Hunt
    } else if is_miner && nearest_resource.is_some() {
        WandererState::Mine
    } else {
        WandererState::Observe
    };

    let pos = me.position;
    let mut dir = Vec2::ZERO;
    let mut speed = me.speed * me.state.speed_multiplier();
    match me.state {
        WandererState::Mine => {
            if let Some(at) = nearest_resource {
                dir = heading(pos, at).0;
            }
        }
        WandererState::Kite => {
            if let Some(at) = target_pos {
                let (toward, d) = heading(pos, at);
                if d < KITE_STANDOFF {
                    dir = -toward;
                } else if d > KITE_REAPPROACH {
                    dir = toward;
                }
            }
        }
        WandererState::Flank => {
            if let Some(at) = target_pos {
                let (toward, _) = heading(pos, at);
                dir = toward * FLANK_FORWARD + toward.perp() * (FLANK_LATERAL * me.flank_side);
            }
        }
        WandererState::Hunt => {
            if let Some(at) = target_pos {
                dir = heading(pos, at).0;
            }
        }
        WandererState::Retreat => {
            let threats = world
                .settlers
                .positions()
                .chain(world.beasts.positions())
                .chain(world.hostiles.positions())
                .filter(|p| p.distance(&pos) < RETREAT_RADIUS);
            match centroid(threats) {
                Some(center) => dir = (pos - center).unit_or_zero(),
                None => speed = me.speed,
            }
        }
        WandererState::Observe => {
            let crowd = world
                .settlers
                .positions()
                .chain(world.defenders.positions())
                .chain(world.hostiles.positions())
                .chain(world.beasts.positions());
            match centroid(crowd) {
                Some(center) => dir = heading(pos, center).0,
                None => speed = me.speed,
            }
            if is_miner {
                if let Some(at) = nearest_resource {
                    dir += heading(pos, at).0 * OBSERVE_RESOURCE_PULL;
                }
            }
        }
    }
    dir += jitter(&mut world.rng, NOISE);

    me.position = direct_step(pos, dir, speed);
    me.position = world.viewport.clamp(me.position, EDGE_MARGIN);

    if let Some(slot) = world.wanderers.get_mut(id) {
        *slot = me;
    }
}
