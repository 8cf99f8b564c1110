//! Settlers - the population everything else revolves around
//!
//! Every settler collects resources, upgrades armor and hits nearby hostile
//! creatures each step, then runs the behavior of its role. Normal settlers
//! fight or flee, builders raise and upgrade dwellings, farmers tend farms,
//! miners work the mine and the two merchant roles loiter near their shops.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::city::construction;
use crate::combat::strike::{strike_within, Combatant};
use crate::core::error::SandboxError;
use crate::core::types::Vec2;
use crate::ecs::world::{FarmId, MineId, SettlerId, World};
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::simulation::resource::{collect_within, Armament, ArmorTier};
use crate::spatial::query::Positioned;
use crate::spatial::steering::{direct_step, heading, jitter, repulsion_term, Kinematics};

pub const SETTLER_HEALTH: f32 = 50.0;
/// Farm healing never pushes health past this
pub const SETTLER_HEAL_CAP: f32 = 100.0;
pub const SETTLER_WEAPON: f32 = 1.0;
pub const SETTLER_SPEED: f32 = 1.6;
/// Hostile creatures closer than this take the settler's weapon power
pub const STRIKE_RADIUS: f32 = 20.0;
const EDGE_MARGIN: f32 = 5.0;

// Normal role
const BEAST_AWARENESS: f32 = 140.0;
/// Steps of beast motion extrapolated when dodging
const BEAST_LOOKAHEAD: f32 = 6.0;
const BEAST_AVOID_WEIGHT: f32 = 1.6;
const HOSTILE_CROWD_RADIUS: f32 = 80.0;
const RETREAT_WEIGHT: f32 = 0.6;
/// Resources on the shoreline are approached from the side
const SHORE_DETOUR_MAGNITUDE: f32 = 0.6;
const SHORE_DETOUR_OFFSET: f32 = 12.0;
const HEAL_BELOW: f32 = 80.0;
const FARM_PULL: f32 = 0.9;
const FEED_RADIUS: f32 = 18.0;
const HEAL_AMOUNT: f32 = 10.0;
const WATER_WEIGHT: f32 = 2.0;
const SHORE_BASE_WEIGHT: f32 = 1.1;
const SHORE_SCALE_WEIGHT: f32 = 0.7;
const CALM_NOISE: f32 = 0.12;
const ALERT_NOISE: f32 = 0.07;

// Builder role
const UPGRADE_REACH: f32 = 18.0;
const FARMING_REACH: f32 = 40.0;

// Farmer role
const TEND_REACH: f32 = 10.0;
const FARMER_REPULSION: f32 = 0.9;

// Miner role
const MINE_REACH: f32 = 14.0;

const MARKET_LOITER: f32 = 15.0;
const SHOP_LOITER: f32 = 20.0;

/// Role tag without per-role state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Normal,
    Builder,
    Farmer,
    MarketOwner,
    Miner,
    GameDev,
}

impl RoleKind {
    pub const ALL: [RoleKind; 6] = [
        RoleKind::Normal,
        RoleKind::Builder,
        RoleKind::Farmer,
        RoleKind::MarketOwner,
        RoleKind::Miner,
        RoleKind::GameDev,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoleKind::Normal => "normal",
            RoleKind::Builder => "builder",
            RoleKind::Farmer => "farmer",
            RoleKind::MarketOwner => "market_owner",
            RoleKind::Miner => "miner",
            RoleKind::GameDev => "game_dev",
        }
    }
}

impl FromStr for RoleKind {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase().replace('-', "_");
        RoleKind::ALL
            .into_iter()
            .find(|r| r.name() == lowered)
            .ok_or_else(|| SandboxError::InvalidCommand(format!("unknown role '{}'", s)))
    }
}

/// Role with the state only that role needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlerRole {
    Normal,
    Builder,
    Farmer { farm: Option<FarmId> },
    MarketOwner,
    Miner { mine: Option<MineId> },
    GameDev,
}

impl SettlerRole {
    pub fn kind(&self) -> RoleKind {
        match self {
            SettlerRole::Normal => RoleKind::Normal,
            SettlerRole::Builder => RoleKind::Builder,
            SettlerRole::Farmer { .. } => RoleKind::Farmer,
            SettlerRole::MarketOwner => RoleKind::MarketOwner,
            SettlerRole::Miner { .. } => RoleKind::Miner,
            SettlerRole::GameDev => RoleKind::GameDev,
        }
    }

    pub fn from_kind(kind: RoleKind) -> Self {
        match kind {
            RoleKind::Normal => SettlerRole::Normal,
            RoleKind::Builder => SettlerRole::Builder,
            RoleKind::Farmer => SettlerRole::Farmer { farm: None },
            RoleKind::MarketOwner => SettlerRole::MarketOwner,
            RoleKind::Miner => SettlerRole::Miner { mine: None },
            RoleKind::GameDev => SettlerRole::GameDev,
        }
    }

    /// Role of a freshly spawned settler
    ///
    /// 15% market owner, 5% game developer, 10% miner, 20% builder,
    /// the rest normal. Farmers only arise by conversion.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let r: f32 = rng.gen();
        let kind = if r < 0.15 {
            RoleKind::MarketOwner
        } else if r < 0.20 {
            RoleKind::GameDev
        } else if r < 0.30 {
            RoleKind::Miner
        } else if r < 0.50 {
            RoleKind::Builder
        } else {
            RoleKind::Normal
        };
        Self::from_kind(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settler {
    pub body: Kinematics,
    pub health: f32,
    pub weapon: Armament,
    pub armor: ArmorTier,
    pub speed: f32,
    pub role: SettlerRole,
}

impl Settler {
    pub fn new(position: Vec2, role: SettlerRole, wander_phase: f32) -> Self {
        Self {
            body: Kinematics::at(position, wander_phase),
            health: SETTLER_HEALTH,
            weapon: Armament::bare(SETTLER_WEAPON),
            armor: ArmorTier::None,
            speed: SETTLER_SPEED,
            role,
        }
    }

    /// Base speed adjusted for wounds and role
    ///
    /// Only the inertial movement applies these factors. Roles that step
    /// directly (builder, waiting miner, game developer) use the base speed.
    pub fn movement_speed(&self) -> f32 {
        let mut speed = self.speed;
        if self.health < 40.0 {
            speed *= 0.68;
        }
        match self.role.kind() {
            RoleKind::Farmer => speed * 0.8,
            RoleKind::Builder => speed * 0.95,
            _ => speed,
        }
    }
}

impl Positioned for Settler {
    fn position(&self) -> Vec2 {
        self.body.position
    }
}

impl Combatant for Settler {
    fn health(&self) -> f32 {
        self.health
    }

    fn health_mut(&mut self) -> &mut f32 {
        &mut self.health
    }
}

/// One step for one settler
pub fn update_settler(world: &mut World, id: SettlerId, events: &mut Vec<SimulationEvent>) {
    let Some(mut me) = world.settlers.get(id).cloned() else {
        return;
    };

    let pos = me.position();
    collect_within(
        &mut world.resources,
        pos,
        &mut me.weapon,
        EntityKind::Settler,
        events,
    );
    me.armor = me.armor.max(me.weapon.armor_tier());

    strike_within(&mut world.hostiles, pos, STRIKE_RADIUS, me.weapon.power)
        .record(EntityKind::Hostile, events);

    if me.role == SettlerRole::Normal
        && !world.farms.is_empty()
        && world.rng.gen_bool(world.config.farmer_conversion_chance)
    {
        me.role = SettlerRole::Farmer { farm: None };
        events.push(SimulationEvent::RoleChanged {
            from: RoleKind::Normal,
            to: RoleKind::Farmer,
        });
    }

    match me.role.kind() {
        RoleKind::Normal => update_normal(world, id, &mut me),
        RoleKind::Builder => update_builder(world, &mut me, events),
        RoleKind::Farmer => update_farmer(world, id, &mut me),
        RoleKind::Miner => update_miner(world, id, &mut me),
        RoleKind::MarketOwner => update_market_owner(world, id, &mut me),
        RoleKind::GameDev => update_game_dev(world, &mut me),
    }

    me.body.position = world.viewport.clamp(me.body.position, EDGE_MARGIN);

    if let Some(slot) = world.settlers.get_mut(id) {
        *slot = me;
    }
}

/// Inertial step with separation from every other settler
fn steer(world: &World, id: SettlerId, me: &mut Settler, desired: Vec2, speed: f32) {
    let peers = world
        .settlers
        .iter()
        .filter(|(other, _)| *other != id)
        .map(|(_, s)| s.position());
    me.body.steer(desired, speed, peers, world.viewport);
}

fn update_normal(world: &mut World, id: SettlerId, me: &mut Settler) {
    let pos = me.position();
    let mut dir = Vec2::ZERO;

    if let Some((_, beast)) = world.beasts.nearest(pos) {
        let d = beast.position().distance(&pos);
        if d < BEAST_AWARENESS {
            let predicted =
                beast.position() + (beast.position() - beast.previous_position) * BEAST_LOOKAHEAD;
            let urgency = ((BEAST_AWARENESS - d) / 80.0 + 0.6).min(1.6);
            dir += (pos - predicted).unit_or_zero() * (BEAST_AVOID_WEIGHT * urgency);
        }
    }

    if let Some((_, hostile)) = world.hostiles.nearest(pos) {
        let (toward, _) = heading(pos, hostile.position());
        let crowd = world.hostiles.count_within(pos, HOSTILE_CROWD_RADIUS);
        if crowd <= world.config.settler_regroup_threshold {
            dir += toward;
        } else {
            dir -= toward * RETREAT_WEIGHT;
        }
    } else if let Some((_, node)) = world.resources.nearest(pos) {
        let delta = node.position - pos;
        let shore = world.terrain().repulsion(node.position);
        if shore.magnitude > SHORE_DETOUR_MAGNITUDE {
            let offset = delta.unit_or_zero().perp() * SHORE_DETOUR_OFFSET;
            dir += (delta + offset).unit_or_zero();
        } else {
            dir += delta.unit_or_zero();
        }
    }

    if me.health < HEAL_BELOW {
        if let Some((farm_id, farm)) = world.farms.nearest(pos) {
            let (toward, d) = heading(pos, farm.position);
            dir += toward * FARM_PULL;
            if d < FEED_RADIUS {
                let fed = world.farms.get_mut(farm_id).is_some_and(|f| f.feed());
                if fed {
                    me.health = (me.health + HEAL_AMOUNT).min(SETTLER_HEAL_CAP);
                }
            }
        }
    }

    let repel = world.terrain().repulsion(pos);
    if repel.is_active() {
        let weight = if repel.inside {
            WATER_WEIGHT
        } else {
            SHORE_BASE_WEIGHT + repel.magnitude * SHORE_SCALE_WEIGHT
        };
        dir += repulsion_term(repel, weight);
    }

    let alert = !world.beasts.is_empty() || !world.hostiles.is_empty();
    dir += jitter(&mut world.rng, if alert { ALERT_NOISE } else { CALM_NOISE });

    let speed = me.movement_speed();
    steer(world, id, me, dir, speed);
}

fn update_builder(world: &mut World, me: &mut Settler, events: &mut Vec<SimulationEvent>) {
    let pos = me.position();
    let mut dir = Vec2::ZERO;

    let unfinished = world
        .dwellings
        .nearest_where(pos, |d| !d.is_upgraded())
        .map(|(id, d)| (id, d.position));

    if let Some((dwelling, at)) = unfinished {
        let (toward, d) = heading(pos, at);
        dir = toward;
        if d < UPGRADE_REACH {
            construction::upgrade_dwelling(world, dwelling, events);
        }
    } else if let Some((_, home)) = world.dwellings.nearest(pos) {
        let at = home.position;
        let (toward, d) = heading(pos, at);
        if d < FARMING_REACH {
            construction::try_place_farm(world, at, events);
        } else {
            dir = toward;
        }
    }

    dir += jitter(&mut world.rng, 0.15);
    me.body.position = direct_step(pos, dir, me.speed);
}

fn update_farmer(world: &mut World, id: SettlerId, me: &mut Settler) {
    let pos = me.position();
    let mut dir = Vec2::ZERO;

    let current = match me.role {
        SettlerRole::Farmer { farm } => farm.filter(|f| world.farms.contains(*f)),
        _ => None,
    };
    let farm = current.or_else(|| world.farms.nearest(pos).map(|(fid, _)| fid));
    me.role = SettlerRole::Farmer { farm };

    if let Some(fid) = farm {
        if let Some(at) = world.farms.get(fid).map(|f| f.position) {
            let (toward, d) = heading(pos, at);
            if d > TEND_REACH {
                dir += toward;
            } else if let Some(f) = world.farms.get_mut(fid) {
                f.tend();
            }
        }
    }

    dir += repulsion_term(world.terrain().repulsion(pos), FARMER_REPULSION);
    dir += jitter(&mut world.rng, 0.1);
    let speed = me.movement_speed() * 0.8;
    steer(world, id, me, dir, speed);
}

fn update_miner(world: &mut World, id: SettlerId, me: &mut Settler) {
    let pos = me.position();

    if world.mines.is_empty() {
        // wait near a defender until the mine exists
        let mut dir = world
            .defenders
            .nearest(pos)
            .map(|(_, d)| heading(pos, d.position()).0)
            .unwrap_or(Vec2::ZERO);
        dir += jitter(&mut world.rng, 0.15);
        me.body.position = direct_step(pos, dir, me.speed * 0.9);
        return;
    }

    let current = match me.role {
        SettlerRole::Miner { mine } => mine.filter(|m| world.mines.contains(*m)),
        _ => None,
    };
    let mine = current.or_else(|| world.mines.first().map(|(mid, _)| mid));
    me.role = SettlerRole::Miner { mine };

    let mut dir = Vec2::ZERO;
    if let Some(at) = mine.and_then(|m| world.mines.get(m)).map(|m| m.position) {
        let (toward, d) = heading(pos, at);
        if d > MINE_REACH {
            dir = toward;
        } else {
            dir += jitter(&mut world.rng, 0.05);
        }
    }

    let speed = me.movement_speed() * 0.8;
    steer(world, id, me, dir, speed);
}

fn update_market_owner(world: &mut World, id: SettlerId, me: &mut Settler) {
    let pos = me.position();
    let target = world
        .markets
        .nearest(pos)
        .map(|(_, m)| m.position)
        .or_else(|| world.dwellings.nearest(pos).map(|(_, d)| d.position));

    let mut dir = Vec2::ZERO;
    if let Some(at) = target {
        let (toward, d) = heading(pos, at);
        if d > MARKET_LOITER {
            dir = toward;
        }
    }
    dir += jitter(&mut world.rng, 0.15);
    let speed = me.movement_speed() * 0.9;
    steer(world, id, me, dir, speed);
}

fn update_game_dev(world: &mut World, me: &mut Settler) {
    let pos = me.position();
    let target = world
        .shops
        .nearest(pos)
        .map(|(_, s)| s.position)
        .or_else(|| world.defenders.nearest(pos).map(|(_, d)| d.position()))
        .or_else(|| world.dwellings.nearest(pos).map(|(_, d)| d.position));

    let mut dir = Vec2::ZERO;
    if let Some(at) = target {
        let (toward, d) = heading(pos, at);
        if d > SHOP_LOITER {
            dir = toward;
        }
    }
    dir += jitter(&mut world.rng, 0.1);
    me.body.position = direct_step(pos, dir, me.speed * 0.85);
}
