//! World surface: terrain classification and presentation theme

pub mod terrain;
pub mod theme;

pub use terrain::{Repulsion, Terrain, WorldShape};
pub use theme::WorldTheme;
