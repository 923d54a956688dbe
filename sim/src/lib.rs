//! Swarm Sim - drone swarm defense engine
//!
//! A tick-driven ECS simulation of friendly drones defending ground assets
//! against a hostile swarm, under live communication and jamming switches.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod maps;
pub mod rng;
pub mod systems;
pub mod world;

pub use api::SimWorld;
pub use clock::{Clock, ManualClock, SimClock, SystemClock};
pub use components::*;
pub use config::{DamageTable, Formation, RunFlags, ScenarioConfig, SimConfig, SpeedTable, ThreatWeights};
pub use error::SimError;
pub use maps::{AssetSpec, MapLibrary, MapPreset};
pub use rng::SimRng;
pub use systems::*;
pub use world::{AssetSnapshot, DroneSnapshot, Snapshot};
