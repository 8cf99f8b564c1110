//! Pets - cats and dogs that wander between dwellings and hide inside them

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::ecs::world::{PetId, World};
use crate::spatial::query::Positioned;
use crate::spatial::steering::{direct_step, heading, jitter};

/// Per-step chance to go inside once at a dwelling
pub const ENTER_CHANCE: f64 = 0.01;
const HIDE_MIN_TICKS: u32 = 200;
const HIDE_EXTRA_TICKS: u32 = 200;
const EDGE_MARGIN: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetKind {
    Cat,
    Dog,
}

impl PetKind {
    pub fn speed(&self) -> f32 {
        match self {
            PetKind::Cat => 1.3,
            PetKind::Dog => 1.5,
        }
    }

    /// Distance at which the pet counts as arrived at a dwelling
    pub fn arrival(&self) -> f32 {
        match self {
            PetKind::Cat => 10.0,
            PetKind::Dog => 14.0,
        }
    }

    pub fn noise(&self) -> f32 {
        match self {
            PetKind::Cat => 0.25,
            PetKind::Dog => 0.18,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PetKind::Cat => "cat",
            PetKind::Dog => "dog",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub kind: PetKind,
    pub position: Vec2,
    pub inside: bool,
    /// Steps left before coming back out
    pub hide_timer: u32,
}

impl Pet {
    pub fn new(position: Vec2, kind: PetKind) -> Self {
        Self {
            kind,
            position,
            inside: false,
            hide_timer: 0,
        }
    }
}

impl Positioned for Pet {
    fn position(&self) -> Vec2 {
        self.position
    }
}

pub fn update_pet(world: &mut World, id: PetId) {
    let Some(mut me) = world.pets.get(id).cloned() else {
        return;
    };

    if me.inside {
        me.hide_timer = me.hide_timer.saturating_sub(1);
        if me.hide_timer == 0 {
            me.inside = false;
        }
    } else {
        let mut dir = Vec2::ZERO;
        if let Some((_, home)) = world.dwellings.nearest(me.position) {
            let (toward, d) = heading(me.position, home.position);
            if d > me.kind.arrival() {
                dir = toward;
            } else if world.rng.gen_bool(ENTER_CHANCE) {
                me.inside = true;
                me.hide_timer = HIDE_MIN_TICKS + world.rng.gen_range(0..HIDE_EXTRA_TICKS);
            }
        }
        dir += jitter(&mut world.rng, me.kind.noise());
        me.position = direct_step(me.position, dir, me.kind.speed());
        me.position = world.viewport.clamp(me.position, EDGE_MARGIN);
    }

    if let Some(slot) = world.pets.get_mut(id) {
        *slot = me;
    }
}
