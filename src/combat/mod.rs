//! Contact combat shared by every fighting species

pub mod strike;
pub mod threat;

pub use strike::{strike_within, Combatant, StrikeReport};
pub use threat::{nearest_threat, Threat};
