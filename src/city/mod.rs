//! City layer - structures, construction triggers and the economy

pub mod building;
pub mod construction;
pub mod economy;

pub use building::{Dwelling, Farm, GameShop, Market, Mine, MiniSettlement};
pub use construction::{
    build_game_shops, ensure_mine, ensure_mini_settlement, try_build_dwelling, try_build_market,
    try_place_farm, upgrade_dwelling,
};
pub use economy::Treasury;
