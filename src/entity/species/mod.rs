//! Per-species state and step behavior
//!
//! Every `update_*` function copies its agent out of the roster, runs one
//! step against the shared world, then writes the agent back. An agent
//! killed by an earlier updater in the same step is simply skipped.

pub mod apex_beast;
pub mod defender;
pub mod guardian;
pub mod hostile;
pub mod pet;
pub mod settler;
pub mod wanderer;

pub use apex_beast::{update_beast, ApexBeast, BeastState};
pub use defender::{update_defender, DefenderConstruct};
pub use guardian::{update_guardian, GuardianConstruct};
pub use hostile::{update_hostile, HostileCreature};
pub use pet::{update_pet, Pet, PetKind};
pub use settler::{update_settler, RoleKind, Settler, SettlerRole};
pub use wanderer::{update_wanderer, NeutralWanderer, WandererRole, WandererState};
