//! Construction triggers
//!
//! Every structure is capped by the population that justifies it:
//! dwellings and farms by settlers, markets by market owners, game shops by
//! game developers. The mine and the mini-settlement are singletons.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use tracing::{debug, info};

use crate::city::building::MiniSettlement;
use crate::core::types::Vec2;
use crate::ecs::world::{DwellingId, SettlerId, World};
use crate::entity::species::pet::PetKind;
use crate::entity::species::settler::RoleKind;
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::Positioned;

/// Dwellings are tried in a row to the right of the anchor
pub const DWELLING_SPACING: f32 = 40.0;
const DWELLING_CANDIDATES: usize = 8;
const DWELLING_EDGE_MARGIN: f32 = 20.0;

pub const MARKET_RADIUS: f32 = 45.0;
const MARKET_CANDIDATES: usize = 4;
const MARKET_EDGE_MARGIN: f32 = 30.0;
const MARKET_DWELLING_CLEARANCE: f32 = 40.0;
const MARKET_SPACING: f32 = 50.0;

const FARM_SCATTER: f32 = 50.0;
const FARM_EDGE_MARGIN: f32 = 20.0;

pub const SHOP_RADIUS: f32 = 60.0;
const SHOP_EDGE_MARGIN: f32 = 40.0;

pub const MINE_OFFSET: f32 = 60.0;
const MINE_EDGE_MARGIN: f32 = 40.0;

const PET_SCATTER: f32 = 10.0;

/// Try to put a dwelling near `anchor`
///
/// Candidates lie at `anchor + (40 * i, 0)` for `i` in `1..=8`; the first
/// one inside the edge margin and 40 units clear of every other dwelling
/// is used.
pub fn try_build_dwelling(
    world: &mut World,
    anchor: Vec2,
    events: &mut Vec<SimulationEvent>,
) -> Option<DwellingId> {
    if world.dwellings.len() >= world.settlers.len() {
        return None;
    }

    let site = (1..=DWELLING_CANDIDATES)
        .map(|i| anchor + Vec2::new(DWELLING_SPACING * i as f32, 0.0))
        .filter(|p| world.viewport.inside_margin(*p, DWELLING_EDGE_MARGIN))
        .find(|p| {
            !world
                .dwellings
                .values()
                .any(|d| d.position.distance(p) < DWELLING_SPACING)
        })?;

    let id = world.add_dwelling(site);
    debug!(x = site.x, y = site.y, total = world.dwellings.len(), "Dwelling built");
    events.push(SimulationEvent::Built {
        kind: EntityKind::Dwelling,
        position: site,
    });
    roll_pet(world, site, events);
    Some(id)
}

/// Raise a dwelling to the top level; returns false if it was already there
pub fn upgrade_dwelling(
    world: &mut World,
    id: DwellingId,
    events: &mut Vec<SimulationEvent>,
) -> bool {
    let Some(dwelling) = world.dwellings.get_mut(id) else {
        return false;
    };
    if dwelling.is_upgraded() {
        return false;
    }
    dwelling.upgrade();
    let position = dwelling.position;
    events.push(SimulationEvent::DwellingUpgraded { position });
    roll_pet(world, position, events);
    true
}

/// Try to open a market around a market-owner settler
pub fn try_build_market(
    world: &mut World,
    owner: SettlerId,
    events: &mut Vec<SimulationEvent>,
) -> bool {
    let Some(anchor) = world
        .settlers
        .get(owner)
        .filter(|s| s.role.kind() == RoleKind::MarketOwner)
        .map(|s| s.position())
    else {
        return false;
    };
    if world.markets.len() >= world.count_role(RoleKind::MarketOwner) {
        return false;
    }

    let site = (1..=MARKET_CANDIDATES)
        .map(|i| anchor + Vec2::from_angle(FRAC_PI_2 * i as f32) * MARKET_RADIUS)
        .filter(|p| world.viewport.inside_margin(*p, MARKET_EDGE_MARGIN))
        .find(|p| {
            let crowded_by_home = world
                .dwellings
                .values()
                .any(|d| d.position.distance(p) < MARKET_DWELLING_CLEARANCE);
            let crowded_by_market = world
                .markets
                .values()
                .any(|m| m.position.distance(p) < MARKET_SPACING);
            !crowded_by_home && !crowded_by_market
        });

    match site {
        Some(site) => {
            world.add_market(site);
            debug!(x = site.x, y = site.y, "Market opened");
            events.push(SimulationEvent::Built {
                kind: EntityKind::Market,
                position: site,
            });
            true
        }
        None => false,
    }
}

/// Scatter a farm around a dwelling a builder is standing next to
pub fn try_place_farm(world: &mut World, near: Vec2, events: &mut Vec<SimulationEvent>) -> bool {
    if world.farms.len() >= world.settlers.len() {
        return false;
    }
    let site = near
        + Vec2::new(
            world.rng.gen_range(-FARM_SCATTER..FARM_SCATTER),
            world.rng.gen_range(-FARM_SCATTER..FARM_SCATTER),
        );
    if !world.viewport.inside_margin(site, FARM_EDGE_MARGIN) {
        return false;
    }
    world.add_farm(site);
    events.push(SimulationEvent::Built {
        kind: EntityKind::Farm,
        position: site,
    });
    true
}

/// Ring of game shops around a newly spawned defender
///
/// Builds up to `game developers - shops` shops, evenly spaced on a circle;
/// spots outside the edge margin are skipped, not retried.
pub fn build_game_shops(world: &mut World, around: Vec2, events: &mut Vec<SimulationEvent>) -> usize {
    let wanted = world.count_role(RoleKind::GameDev);
    let needed = wanted.saturating_sub(world.shops.len());
    if needed == 0 {
        return 0;
    }

    let step = TAU / needed as f32;
    let mut built = 0;
    for i in 0..needed {
        let site = around + Vec2::from_angle(step * i as f32) * SHOP_RADIUS;
        if !world.viewport.inside_margin(site, SHOP_EDGE_MARGIN) {
            continue;
        }
        world.add_shop(site);
        events.push(SimulationEvent::Built {
            kind: EntityKind::GameShop,
            position: site,
        });
        built += 1;
    }
    if built > 0 {
        info!(built, total = world.shops.len(), "Game shops opened");
    }
    built
}

/// Create the mine once a miner and a defender both exist
pub fn ensure_mine(world: &mut World, events: &mut Vec<SimulationEvent>) -> bool {
    if !world.mines.is_empty() || world.count_role(RoleKind::Miner) == 0 {
        return false;
    }
    let Some(anchor) = world.defenders.first().map(|(_, d)| d.position()) else {
        return false;
    };

    let angle = world.rng.gen_range(0.0..TAU);
    let candidate = anchor + Vec2::from_angle(angle) * MINE_OFFSET;
    let site = if world.viewport.inside_margin(candidate, MINE_EDGE_MARGIN) {
        candidate
    } else {
        world.viewport.center()
    };

    world.add_mine(site);
    info!(x = site.x, y = site.y, "Mine established");
    events.push(SimulationEvent::Built {
        kind: EntityKind::Mine,
        position: site,
    });
    true
}

/// Found the mini-settlement the first time the dwelling count reaches the threshold
pub fn ensure_mini_settlement(world: &mut World, events: &mut Vec<SimulationEvent>) -> bool {
    if world.settlement_founded
        || world.dwellings.len() < world.config.settlement_dwelling_threshold
    {
        return false;
    }
    let site = world.viewport.center();
    world.settlements.insert(MiniSettlement::new(site));
    world.settlement_founded = true;
    info!(dwellings = world.dwellings.len(), "Mini-settlement founded");
    events.push(SimulationEvent::Built {
        kind: EntityKind::MiniSettlement,
        position: site,
    });
    true
}

/// A new or upgraded dwelling may bring a cat or a dog along
pub fn roll_pet(world: &mut World, at: Vec2, events: &mut Vec<SimulationEvent>) {
    if !world.rng.gen_bool(world.config.pet_spawn_chance) {
        return;
    }
    let kind = if world.rng.gen_bool(0.5) {
        PetKind::Cat
    } else {
        PetKind::Dog
    };
    let position = at
        + Vec2::new(
            world.rng.gen_range(-PET_SCATTER..PET_SCATTER),
            world.rng.gen_range(-PET_SCATTER..PET_SCATTER),
        );
    world.add_pet(position, kind);
    events.push(SimulationEvent::PetAdopted { kind, position });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::default()
    }

    #[test]
    fn test_dwelling_capped_by_settlers() {
        let mut world = world();
        let anchor = Vec2::new(200.0, 300.0);
        let mut events = Vec::new();
        assert!(try_build_dwelling(&mut world, anchor, &mut events).is_none());

        world.add_settler(anchor, RoleKind::Normal);
        assert!(try_build_dwelling(&mut world, anchor, &mut events).is_some());
        assert!(try_build_dwelling(&mut world, anchor, &mut events).is_none());
        assert_eq!(world.dwellings.len(), 1);
    }

    #[test]
    fn test_dwelling_row_skips_occupied_spots() {
        let mut world = world();
        let anchor = Vec2::new(200.0, 300.0);
        world.add_settler(anchor, RoleKind::Normal);
        world.add_settler(anchor, RoleKind::Normal);
        let mut events = Vec::new();

        try_build_dwelling(&mut world, anchor, &mut events);
        try_build_dwelling(&mut world, anchor, &mut events);

        let xs: Vec<f32> = world.dwellings.values().map(|d| d.position.x).collect();
        assert_eq!(xs, vec![240.0, 280.0]);
    }

    #[test]
    fn test_dwelling_near_right_edge_fails() {
        let mut world = world();
        let anchor = Vec2::new(world.viewport.width - 30.0, 300.0);
        world.add_settler(anchor, RoleKind::Normal);
        let mut events = Vec::new();
        assert!(try_build_dwelling(&mut world, anchor, &mut events).is_none());
    }

    #[test]
    fn test_market_requires_owner_role() {
        let mut world = world();
        let builder = world.add_settler(Vec2::new(400.0, 300.0), RoleKind::Builder);
        let owner = world.add_settler(Vec2::new(700.0, 300.0), RoleKind::MarketOwner);
        let mut events = Vec::new();

        assert!(!try_build_market(&mut world, builder, &mut events));
        assert!(try_build_market(&mut world, owner, &mut events));
        // one owner, one market
        assert!(!try_build_market(&mut world, owner, &mut events));
        assert_eq!(world.markets.len(), 1);
    }

    #[test]
    fn test_market_first_candidate_is_below_owner() {
        let mut world = world();
        let owner = world.add_settler(Vec2::new(400.0, 300.0), RoleKind::MarketOwner);
        let mut events = Vec::new();
        try_build_market(&mut world, owner, &mut events);

        let (_, market) = world.markets.first().unwrap();
        assert!((market.position.x - 400.0).abs() < 0.01);
        assert!((market.position.y - 345.0).abs() < 0.01);
    }

    #[test]
    fn test_shops_ring_around_defender() {
        let mut world = world();
        for _ in 0..3 {
            world.add_settler(Vec2::new(100.0, 100.0), RoleKind::GameDev);
        }
        let mut events = Vec::new();
        let center = world.viewport.center();

        assert_eq!(build_game_shops(&mut world, center, &mut events), 3);
        for shop in world.shops.values() {
            assert!((shop.position.distance(&center) - SHOP_RADIUS).abs() < 0.01);
        }
        assert_eq!(build_game_shops(&mut world, center, &mut events), 0);
    }

    #[test]
    fn test_shops_off_screen_are_skipped() {
        let mut world = world();
        world.add_settler(Vec2::new(100.0, 100.0), RoleKind::GameDev);
        let mut events = Vec::new();
        // angle 0 lands at x = width + 40
        let corner = Vec2::new(world.viewport.width - 20.0, 300.0);
        assert_eq!(build_game_shops(&mut world, corner, &mut events), 0);
        assert!(world.shops.is_empty());
    }

    #[test]
    fn test_mine_needs_miner_and_defender() {
        let mut world = world();
        let mut events = Vec::new();
        world.add_defender(Vec2::new(640.0, 360.0));
        assert!(!ensure_mine(&mut world, &mut events));

        world.add_settler(Vec2::new(100.0, 100.0), RoleKind::Miner);
        assert!(ensure_mine(&mut world, &mut events));
        assert!(!ensure_mine(&mut world, &mut events));
        assert_eq!(world.mines.len(), 1);

        let (_, mine) = world.mines.first().unwrap();
        let d = mine.position.distance(&Vec2::new(640.0, 360.0));
        assert!((d - MINE_OFFSET).abs() < 0.01);
    }

    #[test]
    fn test_mine_falls_back_to_center() {
        let mut world = world();
        let mut events = Vec::new();
        world.add_settler(Vec2::new(100.0, 100.0), RoleKind::Miner);
        // every point 60 away from the corner is inside the 40 margin band or off screen
        world.add_defender(Vec2::new(0.0, 0.0));
        ensure_mine(&mut world, &mut events);
        let (_, mine) = world.mines.first().unwrap();
        let center = world.viewport.center();
        let d = mine.position.distance(&Vec2::ZERO);
        assert!(mine.position == center || (d - MINE_OFFSET).abs() < 0.01);
    }

    #[test]
    fn test_settlement_founded_once() {
        let mut world = world();
        world.config.settlement_dwelling_threshold = 2;
        let mut events = Vec::new();
        world.add_dwelling(Vec2::new(100.0, 100.0));
        assert!(!ensure_mini_settlement(&mut world, &mut events));
        world.add_dwelling(Vec2::new(200.0, 100.0));
        assert!(ensure_mini_settlement(&mut world, &mut events));
        world.add_dwelling(Vec2::new(300.0, 100.0));
        assert!(!ensure_mini_settlement(&mut world, &mut events));
        assert_eq!(world.settlements.len(), 1);
    }

    #[test]
    fn test_pet_roll_respects_chance() {
        let mut world = world();
        let mut events = Vec::new();
        world.config.pet_spawn_chance = 0.0;
        roll_pet(&mut world, Vec2::new(300.0, 300.0), &mut events);
        assert!(world.pets.is_empty());

        world.config.pet_spawn_chance = 1.0;
        roll_pet(&mut world, Vec2::new(300.0, 300.0), &mut events);
        assert_eq!(world.pets.len(), 1);
        let (_, pet) = world.pets.first().unwrap();
        assert!(pet.position.distance(&Vec2::new(300.0, 300.0)) < 15.0);
    }

    #[test]
    fn test_upgrade_once() {
        let mut world = world();
        world.config.pet_spawn_chance = 0.0;
        let id = world.add_dwelling(Vec2::new(300.0, 300.0));
        let mut events = Vec::new();
        assert!(upgrade_dwelling(&mut world, id, &mut events));
        assert!(!upgrade_dwelling(&mut world, id, &mut events));
        assert_eq!(world.dwellings.get(id).unwrap().level, 2);
    }
}
