//! Simulation driving: resources, the step, the clock and its boundaries

pub mod clock;
pub mod events;
pub mod resource;
pub mod snapshot;
pub mod spawn;
pub mod tick;

pub use clock::{Simulation, SimulationClock};
pub use events::{EntityKind, SimulationEvent};
pub use resource::{Armament, ArmorTier, Material, ResourceNode};
pub use snapshot::{RenderEntity, WorldSnapshot};
pub use spawn::{spawn_at, SpawnMode, Spawned};
pub use tick::run_simulation_step;
