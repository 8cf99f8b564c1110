//! Handles to anything the protective species fight

use crate::core::types::Vec2;
use crate::ecs::world::{BeastId, HostileId, World};
use crate::spatial::query::Positioned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threat {
    Hostile(HostileId),
    Beast(BeastId),
}

impl Threat {
    /// Current position, `None` once the target has died
    pub fn position(&self, world: &World) -> Option<Vec2> {
        match *self {
            Threat::Hostile(id) => world.hostiles.get(id).map(|h| h.position()),
            Threat::Beast(id) => world.beasts.get(id).map(|b| b.position()),
        }
    }

    pub fn is_alive(&self, world: &World) -> bool {
        match *self {
            Threat::Hostile(id) => world.hostiles.contains(id),
            Threat::Beast(id) => world.beasts.contains(id),
        }
    }

    pub fn is_beast(&self) -> bool {
        matches!(self, Threat::Beast(_))
    }
}

/// Closer of the nearest apex beast and the nearest hostile creature
///
/// The beast is kept when both are equally close.
pub fn nearest_threat(world: &World, from: Vec2) -> Option<(Threat, Vec2)> {
    let beast = world
        .beasts
        .nearest(from)
        .map(|(id, b)| (Threat::Beast(id), b.position()));
    let hostile = world
        .hostiles
        .nearest(from)
        .map(|(id, h)| (Threat::Hostile(id), h.position()));

    match (beast, hostile) {
        (Some(b), Some(h)) => {
            if h.1.distance(&from) < b.1.distance(&from) {
                Some(h)
            } else {
                Some(b)
            }
        }
        (b, h) => b.or(h),
    }
}
