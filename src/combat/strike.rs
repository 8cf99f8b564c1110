//! Radius damage with immediate removal of the dead
//!
//! An attacker hits every target strictly inside its reach, once per step.
//! Anything that drops to zero health leaves its roster before the next
//! agent runs, so later agents in the same step never see it.

use slotmap::Key;

use crate::core::types::Vec2;
use crate::ecs::roster::Roster;
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::Positioned;

/// An entity with a health pool
pub trait Combatant: Positioned {
    fn health(&self) -> f32;
    fn health_mut(&mut self) -> &mut f32;

    fn is_dead(&self) -> bool {
        self.health() <= 0.0
    }
}

/// Outcome of one strike
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrikeReport {
    pub hits: usize,
    /// Positions of the targets that died
    pub kills: Vec<Vec2>,
}

impl StrikeReport {
    pub fn record(&self, kind: EntityKind, events: &mut Vec<SimulationEvent>) {
        events.extend(
            self.kills
                .iter()
                .map(|&position| SimulationEvent::Killed { kind, position }),
        );
    }
}

/// Damage every member of `targets` within `reach` of `origin`
pub fn strike_within<K: Key, T: Combatant>(
    targets: &mut Roster<K, T>,
    origin: Vec2,
    reach: f32,
    damage: f32,
) -> StrikeReport {
    let mut report = StrikeReport::default();
    targets.retain(|_, target| {
        if target.position().distance(&origin) >= reach {
            return true;
        }
        *target.health_mut() -= damage;
        report.hits += 1;
        if target.is_dead() {
            report.kills.push(target.position());
            return false;
        }
        true
    });
    report
}
