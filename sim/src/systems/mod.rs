//! ECS systems and the decision logic they drive.
//!
//! ## Tick order
//!
//! One tick is a single chained schedule. Nothing runs in parallel: each step
//! sees the state the previous one left behind.
//!
//! 1. `effect_aging_system` - age and cull cosmetic effects
//! 2. `jam_reset_system` - clear every hostile's jam flag
//! 3. `friendly_update_system` - friendlies in roster order
//! 4. `hostile_update_system` - hostiles in roster order
//! 5. `casualty_system` - remove everything at zero health
//! 6. `stats_publish_system` - rate-limited statistics
//!
//! The pure decision helpers (`threat`, `formation`, `rescue`, `movement`,
//! `combat`) take plain views and are tested without a world.

pub mod combat;
pub mod effects;
pub mod formation;
pub mod friendly;
pub mod hostile;
pub mod jamming;
pub mod lifecycle;
pub mod movement;
pub mod rescue;
pub mod serialization;
pub mod stats;
pub mod threat;
pub mod view;

pub use effects::{effect_aging_system, Effect, EffectBuffer, EffectKind};
pub use friendly::{friendly_update_system, FriendlyMode, FriendlyPlan};
pub use hostile::{hostile_update_system, HostileFire, HostilePlan};
pub use jamming::jam_reset_system;
pub use lifecycle::{casualty_system, AssetArchive, Counters, DestroyedAsset, IdAllocator, SimTick};
pub use serialization::*;
pub use stats::{stats_publish_system, DroneTelemetry, SimStatus, StatsPublisher, StatsSnapshot};
