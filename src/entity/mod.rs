//! Agents that move and act on the world surface

pub mod species;

pub use species::{
    ApexBeast, DefenderConstruct, GuardianConstruct, HostileCreature, NeutralWanderer, Pet,
    PetKind, RoleKind, Settler, SettlerRole,
};
