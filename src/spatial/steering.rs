//! Shared steering math
//!
//! Two movement models:
//! - direct: normalize the summed direction and step at a fixed speed
//!   (creatures, constructs, pets, and the simpler settler roles)
//! - inertial: velocity blends toward the desired velocity with peer
//!   separation, a speed cap and soft edge bounce (settlers that wander)

use rand::Rng;

use crate::core::types::{Vec2, Viewport};
use crate::world::terrain::Repulsion;

/// Peers closer than this push each other apart
pub const SEPARATION_RADIUS: f32 = 18.0;
pub const SEPARATION_WEIGHT: f32 = 0.9;
/// Fraction of the old velocity kept each step
pub const INERTIA: f32 = 0.14;
/// Velocity cap relative to the target speed
pub const SPEED_CAP: f32 = 1.25;
pub const EDGE_MARGIN: f32 = 6.0;
pub const EDGE_RESTITUTION: f32 = 0.25;
/// Wander phase advance per step when no direction is given
pub const WANDER_STEP: f32 = 0.01;

/// Uniform noise in `[-magnitude, magnitude)` on each axis
pub fn jitter(rng: &mut impl Rng, magnitude: f32) -> Vec2 {
    if magnitude <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.gen_range(-magnitude..magnitude),
        rng.gen_range(-magnitude..magnitude),
    )
}

/// Unit vector from `from` toward `to` plus the distance between them
///
/// Coincident points give a zero direction.
pub fn heading(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    (delta.unit_or_zero(), delta.length())
}

/// Direct model: step `speed` units along `direction`
pub fn direct_step(position: Vec2, direction: Vec2, speed: f32) -> Vec2 {
    position + direction.unit_or_zero() * speed
}

/// Terrain repulsion scaled by its own magnitude and a caller weight
pub fn repulsion_term(repulsion: Repulsion, weight: f32) -> Vec2 {
    repulsion.direction * (repulsion.magnitude * weight)
}

/// Position, velocity and wander phase of an inertially moving agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub wander_phase: f32,
}

impl Kinematics {
    pub fn at(position: Vec2, wander_phase: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            wander_phase,
        }
    }

    /// Inertial model step
    ///
    /// `peers` are the positions of same-species agents, excluding this one.
    pub fn steer(
        &mut self,
        desired: Vec2,
        target_speed: f32,
        peers: impl Iterator<Item = Vec2>,
        viewport: Viewport,
    ) {
        let mut dir = desired;
        if dir.length() < 0.001 {
            self.wander_phase += WANDER_STEP;
            dir = Vec2::from_angle(self.wander_phase);
        }
        let mut dir = dir.normalize();

        let mut separation = Vec2::ZERO;
        for other in peers {
            let d = self.position.distance(&other);
            if d > 0.0 && d < SEPARATION_RADIUS {
                separation += (self.position - other) / d;
            }
        }
        dir += separation * SEPARATION_WEIGHT;

        let desired_velocity = dir * target_speed;
        self.velocity += (desired_velocity - self.velocity) * (1.0 - INERTIA);

        let speed = self.velocity.length();
        let max_allowed = target_speed * SPEED_CAP;
        if speed > max_allowed && speed > 0.0 {
            self.velocity = self.velocity / speed * max_allowed;
        }

        self.position += self.velocity;
        self.bounce(viewport);
    }

    /// Clamp to the edge margin and reflect + damp the perpendicular velocity
    fn bounce(&mut self, viewport: Viewport) {
        if self.position.x < EDGE_MARGIN {
            self.position.x = EDGE_MARGIN;
            self.velocity.x *= -EDGE_RESTITUTION;
        }
        if self.position.x > viewport.width - EDGE_MARGIN {
            self.position.x = viewport.width - EDGE_MARGIN;
            self.velocity.x *= -EDGE_RESTITUTION;
        }
        if self.position.y < EDGE_MARGIN {
            self.position.y = EDGE_MARGIN;
            self.velocity.y *= -EDGE_RESTITUTION;
        }
        if self.position.y > viewport.height - EDGE_MARGIN {
            self.position.y = viewport.height - EDGE_MARGIN;
            self.velocity.y *= -EDGE_RESTITUTION;
        }
    }
}
