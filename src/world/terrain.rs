//! Passable and impassable terrain (water) for the active world shape
//!
//! Nothing clips agents out of the water. Instead every step they get a
//! repulsion vector: a strong pull back to land while in water and a soft
//! push away from the shoreline while near it.

use std::f32::consts::TAU;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SandboxError;
use crate::core::types::{Vec2, Viewport};

/// Island radius as a fraction of the shorter viewport side
const ISLAND_RADIUS_FRACTION: f32 = 0.20;

/// Inside water: directions sampled and radii searched for land
const ESCAPE_DIRECTIONS: usize = 16;
const ESCAPE_RADIUS_START: f32 = 8.0;
const ESCAPE_RADIUS_MAX: f32 = 220.0;
const ESCAPE_RADIUS_STEP: f32 = 8.0;
const ESCAPE_MAGNITUDE: f32 = 1.4;

/// On land: directions sampled and radii searched for nearby water
const SHORE_DIRECTIONS: usize = 12;
const SHORE_RADIUS_STEP: f32 = 6.0;
/// Distance at which the shoreline starts pushing
pub const SHORE_THRESHOLD: f32 = 36.0;
const SHORE_MIN_MAGNITUDE: f32 = 0.15;
const SHORE_MAGNITUDE_RANGE: f32 = 0.9;

/// Layout of land and water on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldShape {
    /// All land
    #[default]
    Complete,
    /// Water with four circular islands at the quadrant centers
    Four,
    /// One half land, the other water; split follows the aspect ratio
    Half,
}

impl WorldShape {
    pub fn name(&self) -> &'static str {
        match self {
            WorldShape::Complete => "complete",
            WorldShape::Four => "four",
            WorldShape::Half => "half",
        }
    }
}

impl FromStr for WorldShape {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "complete" => Ok(WorldShape::Complete),
            "four" => Ok(WorldShape::Four),
            "half" => Ok(WorldShape::Half),
            other => Err(SandboxError::UnknownWorldShape(other.to_string())),
        }
    }
}

/// Steering away from impassable terrain
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Repulsion {
    /// Unit direction (zero when there is nothing to repel from)
    pub direction: Vec2,
    pub magnitude: f32,
    /// The sampled point itself was impassable
    pub inside: bool,
}

impl Repulsion {
    pub const NONE: Repulsion = Repulsion {
        direction: Vec2::ZERO,
        magnitude: 0.0,
        inside: false,
    };

    pub fn is_active(&self) -> bool {
        self.magnitude > 0.0
    }
}

/// Terrain classifier for one shape on one viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terrain {
    pub shape: WorldShape,
    pub viewport: Viewport,
}

impl Terrain {
    pub fn new(shape: WorldShape, viewport: Viewport) -> Self {
        Self { shape, viewport }
    }

    /// Island centers and radius for the `Four` shape
    pub fn islands(&self) -> ([Vec2; 4], f32) {
        let cx = self.viewport.width / 2.0;
        let cy = self.viewport.height / 2.0;
        let centers = [
            Vec2::new(cx * 0.5, cy * 0.5),
            Vec2::new(cx * 1.5, cy * 0.5),
            Vec2::new(cx * 0.5, cy * 1.5),
            Vec2::new(cx * 1.5, cy * 1.5),
        ];
        (centers, self.viewport.shorter_side() * ISLAND_RADIUS_FRACTION)
    }

    /// Whether `p` is water; points outside the viewport are always passable
    pub fn is_impassable(&self, p: Vec2) -> bool {
        if !self.viewport.contains(p) {
            return false;
        }

        match self.shape {
            WorldShape::Complete => false,
            WorldShape::Four => {
                let (centers, radius) = self.islands();
                !centers.iter().any(|c| c.distance(&p) <= radius)
            }
            WorldShape::Half => {
                if self.viewport.width >= self.viewport.height {
                    p.x > self.viewport.width / 2.0
                } else {
                    p.y > self.viewport.height / 2.0
                }
            }
        }
    }

    /// Repulsion vector at `p`
    pub fn repulsion(&self, p: Vec2) -> Repulsion {
        if self.shape == WorldShape::Complete {
            return Repulsion::NONE;
        }
        if self.is_impassable(p) {
            self.escape_vector(p)
        } else {
            self.shore_vector(p)
        }
    }

    /// In water: point at the nearest land sample, searching ring by ring
    fn escape_vector(&self, p: Vec2) -> Repulsion {
        let mut r = ESCAPE_RADIUS_START;
        while r <= ESCAPE_RADIUS_MAX {
            for i in 0..ESCAPE_DIRECTIONS {
                let dir = Vec2::from_angle(TAU * i as f32 / ESCAPE_DIRECTIONS as f32);
                if !self.is_impassable(p + dir * r) {
                    return Repulsion {
                        direction: dir,
                        magnitude: ESCAPE_MAGNITUDE,
                        inside: true,
                    };
                }
            }
            r += ESCAPE_RADIUS_STEP;
        }
        Repulsion {
            inside: true,
            ..Repulsion::NONE
        }
    }

    /// On land: push away from the closest water sample within the threshold
    fn shore_vector(&self, p: Vec2) -> Repulsion {
        let mut nearest = f32::INFINITY;
        let mut away = Vec2::ZERO;

        for i in 0..SHORE_DIRECTIONS {
            let dir = Vec2::from_angle(TAU * i as f32 / SHORE_DIRECTIONS as f32);
            let mut r = SHORE_RADIUS_STEP;
            while r <= SHORE_THRESHOLD {
                if self.is_impassable(p + dir * r) {
                    if r < nearest {
                        nearest = r;
                        away = -dir;
                    }
                    break;
                }
                r += SHORE_RADIUS_STEP;
            }
        }

        if nearest <= SHORE_THRESHOLD {
            Repulsion {
                direction: away,
                magnitude: SHORE_MAGNITUDE_RANGE * (1.0 - nearest / SHORE_THRESHOLD)
                    + SHORE_MIN_MAGNITUDE,
                inside: false,
            }
        } else {
            Repulsion::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landscape() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_complete_is_all_land() {
        let t = Terrain::new(WorldShape::Complete, landscape());
        assert!(!t.is_impassable(Vec2::new(400.0, 300.0)));
        assert!(!t.repulsion(Vec2::new(1.0, 1.0)).is_active());
    }

    #[test]
    fn test_out_of_bounds_is_passable() {
        let t = Terrain::new(WorldShape::Four, landscape());
        assert!(!t.is_impassable(Vec2::new(-5.0, 300.0)));
        assert!(!t.is_impassable(Vec2::new(400.0, 601.0)));
    }

    #[test]
    fn test_four_islands() {
        let t = Terrain::new(WorldShape::Four, landscape());
        // quadrant center
        assert!(!t.is_impassable(Vec2::new(200.0, 150.0)));
        // viewport center sits between islands
        assert!(t.is_impassable(Vec2::new(400.0, 300.0)));
        let (_, radius) = t.islands();
        assert!((radius - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_half_split_follows_aspect() {
        let wide = Terrain::new(WorldShape::Half, landscape());
        assert!(!wide.is_impassable(Vec2::new(100.0, 500.0)));
        assert!(wide.is_impassable(Vec2::new(700.0, 100.0)));

        let tall = Terrain::new(WorldShape::Half, Viewport::new(400.0, 900.0));
        assert!(!tall.is_impassable(Vec2::new(350.0, 100.0)));
        assert!(tall.is_impassable(Vec2::new(50.0, 800.0)));
    }

    #[test]
    fn test_escape_points_toward_land() {
        let t = Terrain::new(WorldShape::Half, landscape());
        // just right of the split, in water
        let r = t.repulsion(Vec2::new(420.0, 300.0));
        assert!(r.inside);
        assert!((r.magnitude - ESCAPE_MAGNITUDE).abs() < 0.0001);
        assert!(r.direction.x < 0.0);
    }

    #[test]
    fn test_shore_pushes_away_from_water() {
        let t = Terrain::new(WorldShape::Half, landscape());
        let r = t.repulsion(Vec2::new(390.0, 300.0));
        assert!(!r.inside);
        assert!(r.is_active());
        assert!(r.direction.x < 0.0);
        // nearest water sample is 12 units away
        let expected = 0.9 * (1.0 - 12.0 / 36.0) + 0.15;
        assert!((r.magnitude - expected).abs() < 0.0001);
    }

    #[test]
    fn test_far_inland_has_no_repulsion() {
        let t = Terrain::new(WorldShape::Half, landscape());
        assert!(!t.repulsion(Vec2::new(100.0, 300.0)).is_active());
    }

    #[test]
    fn test_parse_shape() {
        assert_eq!("Four".parse::<WorldShape>().unwrap(), WorldShape::Four);
        assert!(matches!(
            "donut".parse::<WorldShape>(),
            Err(SandboxError::UnknownWorldShape(_))
        ));
    }
}
