//! Apex beasts - heavy hunters that charge lone settlers and back off from crowds
//!
//! State priority each step: an active retreat runs out its timer; a crowd
//! of settlers starts a new retreat; an active charge runs out its length
//! (one step by default); a small crowd with the cooldown elapsed starts a
//! charge; otherwise hunt the target, or wander without one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::strike::{strike_within, Combatant};
use crate::core::types::Vec2;
use crate::ecs::world::{BeastId, SettlerId, World};
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::{centroid, Positioned};
use crate::spatial::steering::{direct_step, heading, jitter};

pub const BEAST_HEALTH: f32 = 85.0;
pub const BEAST_SPEED: f32 = 1.8;
pub const BEAST_DAMAGE: f32 = 3.5;
pub const BEAST_REACH: f32 = 26.0;
/// Settlers closer than this count toward the crowd
pub const CROWD_RADIUS: f32 = 80.0;
const RETREAT_RADIUS: f32 = 100.0;
pub const RETREAT_TICKS: u32 = 120;
pub const CHARGE_COOLDOWN: u32 = 180;
const RETREAT_MULTIPLIER: f32 = 1.6;
const CHARGE_MULTIPLIER: f32 = 2.4;
const NOISE: f32 = 0.1;
const EDGE_MARGIN: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeastState {
    Hunt,
    Charge,
    Retreat,
    #[default]
    Wander,
}

impl BeastState {
    pub fn name(&self) -> &'static str {
        match self {
            BeastState::Hunt => "hunt",
            BeastState::Charge => "charge",
            BeastState::Retreat => "retreat",
            BeastState::Wander => "wander",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApexBeast {
    pub position: Vec2,
    /// Position before the last move, read by settlers to predict motion
    pub previous_position: Vec2,
    pub health: f32,
    pub speed: f32,
    pub state: BeastState,
    pub target: Option<SettlerId>,
    pub charge_cooldown: u32,
    /// Steps left in the current charge
    pub charge_timer: u32,
    /// Steps left in the current retreat
    pub retreat_timer: u32,
}

impl ApexBeast {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            previous_position: position,
            health: BEAST_HEALTH,
            speed: BEAST_SPEED,
            state: BeastState::Wander,
            target: None,
            charge_cooldown: 0,
            charge_timer: 0,
            retreat_timer: 0,
        }
    }

    /// Pick the next state given the settler crowd around the beast
    fn transition(&mut self, crowd: usize, retreat_crowd: usize, charge_max: usize, burst: u32) {
        let has_target = self.target.is_some();
        self.state = if self.state == BeastState::Retreat && self.retreat_timer > 0 {
            BeastState::Retreat
        } else if crowd >= retreat_crowd {
            self.retreat_timer = RETREAT_TICKS;
            BeastState::Retreat
        } else if self.state == BeastState::Charge && self.charge_timer > 0 && has_target {
            BeastState::Charge
        } else if has_target && crowd <= charge_max && self.charge_cooldown == 0 {
            self.charge_timer = burst;
            self.charge_cooldown = CHARGE_COOLDOWN;
            BeastState::Charge
        } else if has_target {
            BeastState::Hunt
        } else {
            BeastState::Wander
        };
    }
}

impl Positioned for ApexBeast {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Combatant for ApexBeast {
    fn health(&self) -> f32 {
        self.health
    }

    fn health_mut(&mut self) -> &mut f32 {
        &mut self.health
    }
}

pub fn update_beast(world: &mut World, id: BeastId, events: &mut Vec<SimulationEvent>) {
    let Some(mut me) = world.beasts.get(id).cloned() else {
        return;
    };

    strike_within(&mut world.settlers, me.position, BEAST_REACH, BEAST_DAMAGE)
        .record(EntityKind::Settler, events);

    me.charge_cooldown = me.charge_cooldown.saturating_sub(1);
    me.charge_timer = me.charge_timer.saturating_sub(1);
    me.retreat_timer = me.retreat_timer.saturating_sub(1);

    if me.target.map_or(true, |t| !world.settlers.contains(t)) {
        me.target = world.settlers.nearest(me.position).map(|(sid, _)| sid);
    }

    let crowd = world.settlers.count_within(me.position, CROWD_RADIUS);
    let cfg = &world.config;
    me.transition(
        crowd,
        cfg.beast_retreat_crowd,
        cfg.beast_charge_max_crowd,
        cfg.beast_charge_ticks,
    );

    let target_pos = me
        .target
        .and_then(|t| world.settlers.get(t))
        .map(|s| s.position());

    let mut speed = me.speed;
    let mut dir = match (me.state, target_pos) {
        (BeastState::Charge, Some(at)) => {
            speed *= CHARGE_MULTIPLIER;
            heading(me.position, at).0
        }
        (BeastState::Hunt, Some(at)) => heading(me.position, at).0,
        (BeastState::Retreat, _) => {
            let crowd_center = centroid(
                world
                    .settlers
                    .positions()
                    .filter(|p| p.distance(&me.position) < RETREAT_RADIUS),
            );
            match crowd_center {
                Some(center) => {
                    speed *= RETREAT_MULTIPLIER;
                    (me.position - center).unit_or_zero()
                }
                None => {
                    me.state = BeastState::Wander;
                    me.retreat_timer = 0;
                    random_heading(world)
                }
            }
        }
        _ => random_heading(world),
    };
    dir += jitter(&mut world.rng, NOISE);

    me.previous_position = me.position;
    me.position = direct_step(me.position, dir, speed);
    me.position = world.viewport.clamp(me.position, EDGE_MARGIN);

    if let Some(slot) = world.beasts.get_mut(id) {
        *slot = me;
    }
}

fn random_heading(world: &mut World) -> Vec2 {
    Vec2::new(
        world.rng.gen_range(-1.0..1.0),
        world.rng.gen_range(-1.0..1.0),
    )
}
