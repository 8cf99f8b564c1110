//! Guardian constructs - bodyguards that step between a settler and danger

use crate::combat::strike::{strike_within, Combatant};
use crate::combat::threat::{nearest_threat, Threat};
use crate::core::types::Vec2;
use crate::ecs::world::{GuardianId, SettlerId, World};
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::Positioned;
use crate::spatial::steering::{direct_step, heading, repulsion_term};

pub const GUARDIAN_HEALTH: f32 = 100.0;
pub const GUARDIAN_SPEED: f32 = 1.2;
pub const GUARDIAN_ATTACK: f32 = 3.6;
pub const GUARDIAN_REACH: f32 = 28.0;
/// Farther than this from its ward the guardian closes in
pub const PROTECT_DISTANCE: f32 = 60.0;
const SHIELD_WEIGHT: f32 = 1.4;
const WANDER_STEP: f32 = 0.02;
const WANDER_WEIGHT: f32 = 0.6;
const WATER_WEIGHT: f32 = 2.0;
const SHORE_BASE_WEIGHT: f32 = 1.2;
const SHORE_SCALE_WEIGHT: f32 = 0.6;
const EDGE_MARGIN: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GuardianConstruct {
    pub position: Vec2,
    pub health: f32,
    pub speed: f32,
    pub attack: f32,
    pub target: Option<Threat>,
    /// Settler currently being protected, re-picked only once it is removed
    pub ward: Option<SettlerId>,
    pub wander_phase: f32,
}

impl GuardianConstruct {
    pub fn new(position: Vec2, wander_phase: f32) -> Self {
        Self {
            position,
            health: GUARDIAN_HEALTH,
            speed: GUARDIAN_SPEED,
            attack: GUARDIAN_ATTACK,
            target: None,
            ward: None,
            wander_phase,
        }
    }
}

impl Positioned for GuardianConstruct {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Combatant for GuardianConstruct {
    fn health(&self) -> f32 {
        self.health
    }

    fn health_mut(&mut self) -> &mut f32 {
        &mut self.health
    }
}

pub fn update_guardian(world: &mut World, id: GuardianId, events: &mut Vec<SimulationEvent>) {
    let Some(mut me) = world.guardians.get(id).cloned() else {
        return;
    };
    let pos = me.position;

    // Keep the current ward until it is gone
    let kept = me
        .ward
        .and_then(|sid| world.settlers.get(sid).map(|s| (sid, s.position())));
    let ward = kept.or_else(|| world.settlers.nearest(pos).map(|(sid, s)| (sid, s.position())));
    me.ward = ward.map(|(sid, _)| sid);
    let threat = nearest_threat(world, pos);
    me.target = threat.map(|(t, _)| t);

    let mut dir = Vec2::ZERO;
    match (ward, threat) {
        (Some((_, ward_pos)), None) => {
            let (toward, d) = heading(pos, ward_pos);
            if d > PROTECT_DISTANCE {
                dir += toward;
            }
        }
        (Some((_, ward_pos)), Some((_, threat_pos))) => {
            let guard_post = ward_pos.midpoint(&threat_pos);
            dir += heading(pos, guard_post).0 * SHIELD_WEIGHT;
        }
        (None, Some((_, threat_pos))) => {
            dir += heading(pos, threat_pos).0;
        }
        (None, None) => {
            me.wander_phase += WANDER_STEP;
            dir += Vec2::from_angle(me.wander_phase) * WANDER_WEIGHT;
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

    me.position = direct_step(pos, dir, me.speed);

    if me.target.is_some() {
        strike_within(&mut world.hostiles, me.position, GUARDIAN_REACH, me.attack)
            .record(EntityKind::Hostile, events);
        strike_within(&mut world.beasts, me.position, GUARDIAN_REACH, me.attack)
            .record(EntityKind::ApexBeast, events);
    }

    me.position = world.viewport.clamp(me.position, EDGE_MARGIN);

    if let Some(slot) = world.guardians.get_mut(id) {
        *slot = me;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::species::settler::RoleKind;
    use crate::world::terrain::WorldShape;

    #[test]
    fn test_guardian_keeps_ward_until_removed() {
        let mut world = World::default();
        let first = world.add_settler(Vec2::new(300.0, 300.0), RoleKind::Normal);
        let id = world.add_guardian(Vec2::new(320.0, 300.0));

        let mut events = Vec::new();
        update_guardian(&mut world, id, &mut events);
        assert_eq!(world.guardians.get(id).unwrap().ward, Some(first));

        // a closer settler does not steal the guardian
        let guardian_pos = world.guardians.get(id).unwrap().position;
        let second = world.add_settler(guardian_pos + Vec2::new(2.0, 0.0), RoleKind::Normal);
        update_guardian(&mut world, id, &mut events);
        assert_eq!(world.guardians.get(id).unwrap().ward, Some(first));

        world.settlers.remove(first);
        update_guardian(&mut world, id, &mut events);
        assert_eq!(world.guardians.get(id).unwrap().ward, Some(second));
    }

    #[test]
    fn test_guardian_steps_between_ward_and_threat() {
        let mut world = World::default();
        let settler = world.add_settler(Vec2::new(300.0, 300.0), RoleKind::Normal);
        world.add_hostile(Vec2::new(500.0, 300.0));
        let id = world.add_guardian(Vec2::new(400.0, 400.0));

        let mut events = Vec::new();
        update_guardian(&mut world, id, &mut events);

        let guardian = world.guardians.get(id).unwrap();
        assert_eq!(guardian.ward, Some(settler));
        // guard post is (400, 300), straight up
        assert!(guardian.position.y < 400.0);
        assert!((guardian.position.x - 400.0).abs() < 0.01);
    }

    #[test]
    fn test_guardian_hits_only_with_target() {
        let mut world = World::default();
        let hostile = world.add_hostile(Vec2::new(310.0, 300.0));
        let id = world.add_guardian(Vec2::new(300.0, 300.0));

        let mut events = Vec::new();
        update_guardian(&mut world, id, &mut events);

        let health = world.hostiles.get(hostile).unwrap().health;
        assert!((health - (30.0 - GUARDIAN_ATTACK)).abs() < 1e-4);
    }

    #[test]
    fn test_idle_guardian_wanders_slowly() {
        let mut world = World::default();
        let id = world.add_guardian(Vec2::new(600.0, 300.0));
        let phase = world.guardians.get(id).unwrap().wander_phase;

        let mut events = Vec::new();
        update_guardian(&mut world, id, &mut events);

        let guardian = world.guardians.get(id).unwrap();
        assert!((guardian.wander_phase - (phase + WANDER_STEP)).abs() < 1e-4);
        let moved = guardian.position.distance(&Vec2::new(600.0, 300.0));
        assert!((moved - GUARDIAN_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_guardian_swims_back_to_land() {
        let mut world = World::default();
        world.shape = WorldShape::Half;
        let id = world.add_guardian(Vec2::new(700.0, 360.0));

        let mut events = Vec::new();
        for _ in 0..200 {
            update_guardian(&mut world, id, &mut events);
        }

        let pos = world.guardians.get(id).unwrap().position;
        assert!(!world.terrain().is_impassable(pos) || pos.x < 660.0);
    }
}
