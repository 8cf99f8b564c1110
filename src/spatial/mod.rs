//! Spatial queries and steering shared by every species

pub mod query;
pub mod steering;

pub use query::{centroid, distance, find_nearest, Positioned};
pub use steering::{direct_step, heading, jitter, repulsion_term, Kinematics};
