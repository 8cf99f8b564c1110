//! Currency accrual, farm regrowth and mine output

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::Vec2;
use crate::ecs::world::World;
use crate::entity::species::settler::RoleKind;
use crate::simulation::events::SimulationEvent;
use crate::simulation::resource::Material;
use crate::spatial::query::Positioned;

/// Income per second of simulated time
pub const MARKET_INCOME: f64 = 10.0;
pub const SHOP_INCOME: f64 = 100.0;
pub const MINE_INCOME: f64 = 50.0;

/// Miners closer than this work the mine
pub const MINE_WORK_RADIUS: f32 = 20.0;
/// Miner-seconds per emitted ore node
pub const MINE_OUTPUT_THRESHOLD: f32 = 2.0;
/// Fraction of `dt` the timer loses while nobody works
pub const MINE_IDLE_DECAY: f32 = 0.5;
const ORE_RING_MIN: f32 = 20.0;
const ORE_RING_MAX: f32 = 30.0;
const ORE_EDGE_MARGIN: f32 = 10.0;

/// Accumulated currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Treasury {
    balance: f64,
}

impl Treasury {
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Whole units shown to the user
    pub fn displayed(&self) -> u64 {
        self.balance.max(0.0).floor() as u64
    }

    /// Add one step of income; returns the amount earned
    pub fn accrue(&mut self, markets: usize, shops: usize, mines: usize, dt: f32) -> f64 {
        let rate =
            markets as f64 * MARKET_INCOME + shops as f64 * SHOP_INCOME + mines as f64 * MINE_INCOME;
        let earned = rate * dt as f64;
        self.balance += earned;
        earned
    }

    pub fn reset(&mut self) {
        self.balance = 0.0;
    }
}

/// One step of income from every market, shop and mine
pub fn accrue_income(world: &mut World, dt: f32) {
    let (markets, shops, mines) = (world.markets.len(), world.shops.len(), world.mines.len());
    world.treasury.accrue(markets, shops, mines, dt);
}

pub fn regenerate_farms(world: &mut World) {
    for farm in world.farms.values_mut() {
        farm.regenerate();
    }
}

/// Advance every mine's production timer and emit ore
pub fn run_mines(world: &mut World, dt: f32, events: &mut Vec<SimulationEvent>) {
    for i in 0..world.mines.begin_pass() {
        let Some(id) = world.mines.pass_handle(i) else {
            break;
        };
        let Some(mine) = world.mines.get(id).copied() else {
            continue;
        };

        let workers = world
            .settlers
            .values()
            .filter(|s| {
                s.role.kind() == RoleKind::Miner
                    && s.position().distance(&mine.position) < MINE_WORK_RADIUS
            })
            .count();

        let mut timer = mine.production_timer;
        if workers == 0 {
            timer = (timer - dt * MINE_IDLE_DECAY).max(0.0);
        } else {
            timer += dt * workers as f32;
            while timer >= MINE_OUTPUT_THRESHOLD {
                timer -= MINE_OUTPUT_THRESHOLD;
                let Some(position) = ore_drop_point(world, mine.position) else {
                    continue;
                };
                world.add_resource(position, Material::Amandite);
                debug!(x = position.x, y = position.y, workers, "Mine emitted ore");
                events.push(SimulationEvent::OreEmitted {
                    material: Material::Amandite,
                    position,
                });
            }
        }

        if let Some(mine) = world.mines.get_mut(id) {
            mine.production_timer = timer;
        }
    }
}

/// Random point on the ore ring; `None` when it falls too close to the edge
fn ore_drop_point(world: &mut World, around: Vec2) -> Option<Vec2> {
    let angle = world.rng.gen_range(0.0..TAU);
    let radius = world.rng.gen_range(ORE_RING_MIN..ORE_RING_MAX);
    let p = around + Vec2::from_angle(angle) * radius;
    world.viewport.inside_margin(p, ORE_EDGE_MARGIN).then_some(p)
}
