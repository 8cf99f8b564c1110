//! Tick system - one simulation step over the whole world
//!
//! Processing order is fixed:
//! economy -> structures -> settlers -> defenders -> guardians -> beasts
//! -> wanderers -> hostiles -> pets
//!
//! Within a species, agents run in insertion order. Damage and removals
//! take effect immediately, so earlier agents can change what later agents
//! see in the same step.

use tracing::trace;

use crate::city::{construction, economy};
use crate::ecs::world::World;
use crate::entity::species::{
    update_beast, update_defender, update_guardian, update_hostile, update_pet, update_settler,
    update_wanderer,
};
use crate::simulation::events::SimulationEvent;

/// Run one simulation step of `dt` seconds
pub fn run_simulation_step(world: &mut World, dt: f32) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    economy::accrue_income(world, dt);
    construction::ensure_mini_settlement(world, &mut events);
    economy::run_mines(world, dt, &mut events);
    economy::regenerate_farms(world);

    for i in 0..world.settlers.begin_pass() {
        let Some(id) = world.settlers.pass_handle(i) else {
            break;
        };
        update_settler(world, id, &mut events);
    }
    for i in 0..world.defenders.begin_pass() {
        let Some(id) = world.defenders.pass_handle(i) else {
            break;
        };
        update_defender(world, id, &mut events);
    }
    for i in 0..world.guardians.begin_pass() {
        let Some(id) = world.guardians.pass_handle(i) else {
            break;
        };
        update_guardian(world, id, &mut events);
    }
    for i in 0..world.beasts.begin_pass() {
        let Some(id) = world.beasts.pass_handle(i) else {
            break;
        };
        update_beast(world, id, &mut events);
    }
    for i in 0..world.wanderers.begin_pass() {
        let Some(id) = world.wanderers.pass_handle(i) else {
            break;
        };
        update_wanderer(world, id, &mut events);
    }
    for i in 0..world.hostiles.begin_pass() {
        let Some(id) = world.hostiles.pass_handle(i) else {
            break;
        };
        update_hostile(world, id, &mut events);
    }
    for i in 0..world.pets.begin_pass() {
        let Some(id) = world.pets.pass_handle(i) else {
            break;
        };
        update_pet(world, id);
    }

    world.current_tick += 1;

    trace!(
        tick = world.current_tick,
        settlers = world.settlers.len(),
        hostiles = world.hostiles.len(),
        beasts = world.beasts.len(),
        events = events.len(),
        "Step complete"
    );

    events
}
