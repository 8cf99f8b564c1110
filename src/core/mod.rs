pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{Result, SandboxError};
pub use types::{Tick, Vec2, Viewport};
