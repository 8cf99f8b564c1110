//! Structures settlers and constructs put on the map
//!
//! Structures never move (the mini-settlement aside, which the user can
//! drag) and are only removed by a world reset.

use serde::{Deserialize, Serialize};

use crate::core::types::{Vec2, Viewport};
use crate::spatial::query::Positioned;

/// Upgraded dwellings stop attracting builders
pub const MAX_DWELLING_LEVEL: u8 = 2;

pub const FARM_START_FOOD: f32 = 5.0;
pub const FARM_MAX_FOOD: f32 = 60.0;
/// Food regained per step without anyone tending
pub const FARM_REGEN: f32 = 0.005;
/// Food added per step by a tending farmer
pub const FARM_TEND_RATE: f32 = 0.03;

/// Mini-settlement hitbox half-extents
pub const SETTLEMENT_HALF_WIDTH: f32 = 60.0;
pub const SETTLEMENT_HALF_HEIGHT: f32 = 130.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dwelling {
    pub position: Vec2,
    pub level: u8,
}

impl Dwelling {
    pub fn new(position: Vec2) -> Self {
        Self { position, level: 1 }
    }

    pub fn is_upgraded(&self) -> bool {
        self.level >= MAX_DWELLING_LEVEL
    }

    pub fn upgrade(&mut self) {
        self.level = MAX_DWELLING_LEVEL;
    }
}

/// Food source; settlers heal here and farmers tend it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub position: Vec2,
    pub food: f32,
}

impl Farm {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            food: FARM_START_FOOD,
        }
    }

    pub fn regenerate(&mut self) {
        self.food = (self.food + FARM_REGEN).min(FARM_MAX_FOOD);
    }

    pub fn tend(&mut self) {
        self.food = (self.food + FARM_TEND_RATE).min(FARM_MAX_FOOD);
    }

    /// Take one unit of food if more than one is stored
    pub fn feed(&mut self) -> bool {
        if self.food > 1.0 {
            self.food -= 1.0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub position: Vec2,
}

impl Market {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameShop {
    pub position: Vec2,
}

impl GameShop {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}

/// Singleton ore producer worked by miner settlers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mine {
    pub position: Vec2,
    /// Miner-seconds accumulated toward the next emission
    pub production_timer: f32,
}

impl Mine {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            production_timer: 0.0,
        }
    }
}

/// Landmark founded once the town grows large enough
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiniSettlement {
    pub position: Vec2,
}

impl MiniSettlement {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Whether `point` falls inside the drag hitbox
    pub fn hit(&self, point: Vec2) -> bool {
        (point.x - self.position.x).abs() <= SETTLEMENT_HALF_WIDTH
            && (point.y - self.position.y).abs() <= SETTLEMENT_HALF_HEIGHT
    }

    /// Clamp a drag target so the whole hitbox stays on screen
    pub fn clamp_to(viewport: Viewport, to: Vec2) -> Vec2 {
        viewport.clamp_xy(to, SETTLEMENT_HALF_WIDTH, SETTLEMENT_HALF_HEIGHT)
    }
}

macro_rules! impl_positioned {
    ($($ty:ty),*) => {
        $(impl Positioned for $ty {
            fn position(&self) -> Vec2 {
                self.position
            }
        })*
    };
}

impl_positioned!(Dwelling, Farm, Market, GameShop, Mine, MiniSettlement);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farm_food_is_capped() {
        let mut farm = Farm::new(Vec2::ZERO);
        assert!((farm.food - FARM_START_FOOD).abs() < 0.001);
        farm.food = 59.99;
        farm.tend();
        assert!((farm.food - FARM_MAX_FOOD).abs() < 0.001);
        farm.regenerate();
        assert!((farm.food - FARM_MAX_FOOD).abs() < 0.001);
    }

    #[test]
    fn test_farm_keeps_last_unit() {
        let mut farm = Farm::new(Vec2::ZERO);
        farm.food = 1.5;
        assert!(farm.feed());
        assert!((farm.food - 0.5).abs() < 0.001);
        assert!(!farm.feed());
    }

    #[test]
    fn test_dwelling_upgrade() {
        let mut dwelling = Dwelling::new(Vec2::ZERO);
        assert_eq!(dwelling.level, 1);
        assert!(!dwelling.is_upgraded());
        dwelling.upgrade();
        assert!(dwelling.is_upgraded());
    }

    #[test]
    fn test_settlement_hitbox() {
        let settlement = MiniSettlement::new(Vec2::new(200.0, 200.0));
        assert!(settlement.hit(Vec2::new(260.0, 330.0)));
        assert!(!settlement.hit(Vec2::new(261.0, 200.0)));
        assert!(!settlement.hit(Vec2::new(200.0, 331.0)));
    }
}
