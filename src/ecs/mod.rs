//! Entity storage: the world aggregate and its typed rosters

pub mod roster;
pub mod world;

pub use roster::Roster;
pub use world::{
    BeastId, DefenderId, DwellingId, FarmId, GuardianId, HostileId, MarketId, MineId, PetId,
    ResourceId, SettlementId, SettlerId, ShopId, WandererId, World,
};
