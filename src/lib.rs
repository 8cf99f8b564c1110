//! Life Sandbox - multi-species agent simulation on a 2D surface
//!
//! Settlers gather, build and trade while hostile creatures, apex beasts,
//! neutral wanderers and protective constructs act on the same shared world.
//! Rendering and input live outside this crate: hosts drive a
//! [`simulation::Simulation`] frame by frame and read a
//! [`simulation::WorldSnapshot`] back.

pub mod city;
pub mod combat;
pub mod command;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;
pub mod spatial;
pub mod world;
