//! World - owns every species and structure collection
//!
//! Behavior routines receive `&mut World` and mutate whatever they touch
//! (damage, resource pickup, construction). There is no ambient global state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotmap::new_key_type;

use crate::city::building::{Dwelling, Farm, GameShop, Market, Mine, MiniSettlement};
use crate::city::economy::Treasury;
use crate::core::config::SimulationConfig;
use crate::core::types::{Tick, Vec2, Viewport};
use crate::ecs::roster::Roster;
use crate::entity::species::apex_beast::ApexBeast;
use crate::entity::species::defender::DefenderConstruct;
use crate::entity::species::guardian::GuardianConstruct;
use crate::entity::species::hostile::HostileCreature;
use crate::entity::species::pet::{Pet, PetKind};
use crate::entity::species::settler::{RoleKind, Settler, SettlerRole};
use crate::entity::species::wanderer::{NeutralWanderer, WandererRole};
use crate::simulation::resource::{Material, ResourceNode};
use crate::world::terrain::{Terrain, WorldShape};
use crate::world::theme::WorldTheme;

new_key_type! {
    pub struct SettlerId;
    pub struct HostileId;
    pub struct BeastId;
    pub struct WandererId;
    pub struct DefenderId;
    pub struct GuardianId;
    pub struct ResourceId;
    pub struct DwellingId;
    pub struct FarmId;
    pub struct MarketId;
    pub struct ShopId;
    pub struct MineId;
    pub struct SettlementId;
    pub struct PetId;
}

/// The simulation state containing all entities and structures
pub struct World {
    pub current_tick: Tick,
    pub viewport: Viewport,
    pub shape: WorldShape,
    pub theme: WorldTheme,
    pub config: SimulationConfig,
    /// Random number generator (deterministic per seed)
    pub rng: ChaCha8Rng,
    pub treasury: Treasury,

    pub settlers: Roster<SettlerId, Settler>,
    pub hostiles: Roster<HostileId, HostileCreature>,
    pub beasts: Roster<BeastId, ApexBeast>,
    pub wanderers: Roster<WandererId, NeutralWanderer>,
    pub defenders: Roster<DefenderId, DefenderConstruct>,
    pub guardians: Roster<GuardianId, GuardianConstruct>,
    pub pets: Roster<PetId, Pet>,

    pub resources: Roster<ResourceId, ResourceNode>,
    pub dwellings: Roster<DwellingId, Dwelling>,
    pub farms: Roster<FarmId, Farm>,
    pub markets: Roster<MarketId, Market>,
    pub shops: Roster<ShopId, GameShop>,
    pub mines: Roster<MineId, Mine>,
    pub settlements: Roster<SettlementId, MiniSettlement>,

    /// The mini-settlement is founded at most once per run
    pub settlement_founded: bool,
}

impl World {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            current_tick: 0,
            viewport: config.viewport(),
            shape: config.world_shape,
            theme: WorldTheme::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            treasury: Treasury::default(),
            settlers: Roster::new(),
            hostiles: Roster::new(),
            beasts: Roster::new(),
            wanderers: Roster::new(),
            defenders: Roster::new(),
            guardians: Roster::new(),
            pets: Roster::new(),
            resources: Roster::new(),
            dwellings: Roster::new(),
            farms: Roster::new(),
            markets: Roster::new(),
            shops: Roster::new(),
            mines: Roster::new(),
            settlements: Roster::new(),
            settlement_founded: false,
        }
    }

    /// Terrain classifier for the current shape and viewport
    pub fn terrain(&self) -> Terrain {
        Terrain::new(self.shape, self.viewport)
    }

    /// Clear every collection and zero the economy
    ///
    /// Shape, theme, viewport and the RNG stream are kept.
    pub fn reset(&mut self) {
        self.settlers.clear();
        self.hostiles.clear();
        self.beasts.clear();
        self.wanderers.clear();
        self.defenders.clear();
        self.guardians.clear();
        self.pets.clear();
        self.resources.clear();
        self.dwellings.clear();
        self.farms.clear();
        self.markets.clear();
        self.shops.clear();
        self.mines.clear();
        self.settlements.clear();
        self.settlement_founded = false;
        self.treasury.reset();
        self.current_tick = 0;
    }

    /// Total live agents plus structures, resources excluded
    pub fn entity_count(&self) -> usize {
        self.settlers.len()
            + self.hostiles.len()
            + self.beasts.len()
            + self.wanderers.len()
            + self.defenders.len()
            + self.guardians.len()
            + self.pets.len()
            + self.dwellings.len()
            + self.farms.len()
            + self.markets.len()
            + self.shops.len()
            + self.mines.len()
            + self.settlements.len()
    }

    pub fn count_role(&self, kind: RoleKind) -> usize {
        self.settlers
            .values()
            .filter(|s| s.role.kind() == kind)
            .count()
    }

    // === SPAWNING ===

    pub fn add_settler(&mut self, position: Vec2, role: RoleKind) -> SettlerId {
        let phase = self.rng.gen::<f32>();
        self.settlers
            .insert(Settler::new(position, SettlerRole::from_kind(role), phase))
    }

    pub fn add_hostile(&mut self, position: Vec2) -> HostileId {
        self.hostiles.insert(HostileCreature::new(position))
    }

    pub fn add_beast(&mut self, position: Vec2) -> BeastId {
        self.beasts.insert(ApexBeast::new(position))
    }

    /// Wanderer with a rolled role (60% miner)
    pub fn add_wanderer(&mut self, position: Vec2) -> WandererId {
        let role = WandererRole::roll(&mut self.rng);
        self.add_wanderer_with_role(position, role)
    }

    pub fn add_wanderer_with_role(&mut self, position: Vec2, role: WandererRole) -> WandererId {
        self.wanderers.insert(NeutralWanderer::new(position, role))
    }

    pub fn add_defender(&mut self, position: Vec2) -> DefenderId {
        self.defenders.insert(DefenderConstruct::new(position))
    }

    pub fn add_guardian(&mut self, position: Vec2) -> GuardianId {
        let seed = self.rng.gen::<f32>() * 1000.0;
        self.guardians.insert(GuardianConstruct::new(position, seed))
    }

    pub fn add_pet(&mut self, position: Vec2, kind: PetKind) -> PetId {
        self.pets.insert(Pet::new(position, kind))
    }

    pub fn add_resource(&mut self, position: Vec2, material: Material) -> ResourceId {
        self.resources.insert(ResourceNode::new(position, material))
    }

    pub fn add_dwelling(&mut self, position: Vec2) -> DwellingId {
        self.dwellings.insert(Dwelling::new(position))
    }

    pub fn add_farm(&mut self, position: Vec2) -> FarmId {
        self.farms.insert(Farm::new(position))
    }

    pub fn add_market(&mut self, position: Vec2) -> MarketId {
        self.markets.insert(Market::new(position))
    }

    pub fn add_shop(&mut self, position: Vec2) -> ShopId {
        self.shops.insert(GameShop::new(position))
    }

    pub fn add_mine(&mut self, position: Vec2) -> MineId {
        self.mines.insert(Mine::new(position))
    }

    // === MINI-SETTLEMENT DRAGGING ===

    /// Topmost mini-settlement whose hitbox contains `point`
    pub fn settlement_at(&self, point: Vec2) -> Option<SettlementId> {
        self.settlements
            .iter()
            .filter(|(_, s)| s.hit(point))
            .last()
            .map(|(id, _)| id)
    }

    /// Move a mini-settlement, keeping it fully on screen
    pub fn move_settlement(&mut self, id: SettlementId, to: Vec2) -> bool {
        let viewport = self.viewport;
        match self.settlements.get_mut(id) {
            Some(settlement) => {
                settlement.position = MiniSettlement::clamp_to(viewport, to);
                true
            }
            None => false,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
