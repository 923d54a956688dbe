//! Simulation tuning and scenario configuration.
//!
//! `SimConfig` holds every tunable the systems read. It deserializes with
//! `#[serde(default)]`, so a JSON override only needs the keys it changes.
//! `ScenarioConfig` is the per-run setup consumed by `SimWorld::initialize`,
//! and `RunFlags` carries the two switches that are consulted live each tick.

use crate::components::{Allegiance, DroneKind};
use crate::error::SimError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Named geometric pattern friendlies patrol in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formation {
    #[default]
    Circle,
    Arrowhead,
    Spearhead,
    DoubleFile,
    ExtendedLine,
}

impl Formation {
    pub fn name(&self) -> &'static str {
        match self {
            Formation::Circle => "circle",
            Formation::Arrowhead => "arrowhead",
            Formation::Spearhead => "spearhead",
            Formation::DoubleFile => "double-file",
            Formation::ExtendedLine => "extended-line",
        }
    }
}

/// Cruise speed in units per tick, by allegiance and airframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    pub friendly_interceptor: f32,
    pub friendly_bomber: f32,
    pub hostile_interceptor: f32,
    pub hostile_bomber: f32,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            friendly_interceptor: 2.5,
            friendly_bomber: 1.5,
            hostile_interceptor: 1.5,
            hostile_bomber: 0.8,
        }
    }
}

impl SpeedTable {
    pub fn speed(&self, side: Allegiance, kind: DroneKind) -> f32 {
        match (side, kind) {
            (Allegiance::Friendly, DroneKind::Interceptor) => self.friendly_interceptor,
            (Allegiance::Friendly, DroneKind::Bomber) => self.friendly_bomber,
            (Allegiance::Hostile, DroneKind::Interceptor) => self.hostile_interceptor,
            (Allegiance::Hostile, DroneKind::Bomber) => self.hostile_bomber,
        }
    }
}

/// Damage dealt per successful shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTable {
    /// Friendly interceptor against any hostile (the base value).
    pub friendly_interceptor: f32,
    /// Friendly bomber against any hostile.
    pub friendly_bomber: f32,
    /// Hostile interceptor defending itself against a friendly.
    pub hostile_interceptor_vs_drone: f32,
    pub hostile_bomber_vs_drone: f32,
    pub hostile_interceptor_vs_asset: f32,
    pub hostile_bomber_vs_asset: f32,
}

impl Default for DamageTable {
    fn default() -> Self {
        Self {
            friendly_interceptor: 10.0,
            friendly_bomber: 100.0,
            hostile_interceptor_vs_drone: 2.0,
            hostile_bomber_vs_drone: 20.0,
            hostile_interceptor_vs_asset: 5.0,
            hostile_bomber_vs_asset: 40.0,
        }
    }
}

/// Weights of the friendly threat score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatWeights {
    /// Flat bonus for a hostile inside the threatening range of any asset.
    pub critical_bonus: f32,
    /// Multiplied by the priority of the nearest asset when critical.
    pub priority_weight: f32,
    /// Bonus for hostile interceptors while friendly bombers are airborne.
    pub interceptor_bonus_with_bombers: f32,
    /// Penalty for hostile bombers while friendly bombers are airborne.
    pub bomber_penalty_with_bombers: f32,
    /// Bonus for hostile bombers when no friendly bomber is airborne.
    pub bomber_bonus: f32,
    /// Applied to every hostile.
    pub ground_attack_bonus: f32,
    /// Divided by the distance to the hostile.
    pub proximity_weight: f32,
    /// Per other friendly already targeting the hostile (communication only).
    pub saturation_penalty: f32,
}

impl Default for ThreatWeights {
    fn default() -> Self {
        Self {
            critical_bonus: 1000.0,
            priority_weight: 50.0,
            interceptor_bonus_with_bombers: 400.0,
            bomber_penalty_with_bombers: 300.0,
            bomber_bonus: 250.0,
            ground_attack_bonus: 100.0,
            proximity_weight: 5000.0,
            saturation_penalty: 200.0,
        }
    }
}

/// Configuration for simulation tuning.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Map extent used for spawn placement.
    pub world_width: f32,
    pub world_height: f32,
    /// Height of the band along the top edge where hostiles appear.
    pub hostile_spawn_band: f32,
    /// Random spread applied around spawn slots.
    pub spawn_jitter: f32,

    /// Maximum distance at which any drone can damage another entity.
    pub firing_range: f32,
    /// Radius around an asset inside which a hostile counts as a threat.
    pub threat_range: f32,
    /// Radius around a friendly inside which hostiles are jammed.
    pub jamming_range: f32,
    /// A friendly engages a non-critical target closer than this regardless of saturation.
    pub engage_distance: f32,
    /// Share of the roster allowed to pile onto one non-critical target.
    pub engage_ratio: f32,
    /// Minimum wall-clock interval between two shots of one drone.
    pub fire_cooldown_ms: u64,

    /// Distance from the swarm centroid past which a friendly marks itself lost.
    pub lost_distance: f32,
    /// Distance at which a squadmate reconnects a lost friendly.
    pub reconnect_radius: f32,
    /// Speed multiplier for rescue flights.
    pub rescue_speed_factor: f32,

    pub separation_radius: f32,
    pub separation_strength: f32,
    /// Drones closer than this to their slot stop steering toward it.
    pub snap_tolerance: f32,
    pub formation_spacing: f32,
    pub orbit_radius: f32,
    /// Angle (radians) the circle formation advances each tick.
    pub orbit_step: f32,
    pub defensive_radius: f32,

    /// Chance an autonomous drone heads for the nearest asset instead of a hostile.
    pub autonomous_asset_bias: f32,
    /// Amplitude of the idle wander when nothing else applies.
    pub idle_jitter: f32,

    /// Hostile speed multiplier while jammed.
    pub jammed_speed_factor: f32,
    /// Damage applied to a jammed hostile each tick, per jamming friendly.
    pub jamming_damage: f32,
    /// Hostiles chase friendlies closer than this when no asset is in range.
    pub hostile_pursuit_range: f32,
    /// Fraction of the firing range hostiles close to before holding on an asset.
    pub hostile_standoff: f32,

    /// Minimum wall-clock interval between two stats publishes.
    pub stats_interval_ms: u64,
    /// Lifetimes of cosmetic effects, in ticks.
    pub hit_effect_ticks: u32,
    pub explosion_effect_ticks: u32,

    pub speeds: SpeedTable,
    pub damage: DamageTable,
    pub threat: ThreatWeights,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 1200.0,
            world_height: 800.0,
            hostile_spawn_band: 100.0,
            spawn_jitter: 20.0,
            firing_range: 80.0,
            threat_range: 150.0,
            jamming_range: 100.0,
            engage_distance: 250.0,
            engage_ratio: 0.3,
            fire_cooldown_ms: 500,
            lost_distance: 300.0,
            reconnect_radius: 40.0,
            rescue_speed_factor: 0.6,
            separation_radius: 25.0,
            separation_strength: 1.5,
            snap_tolerance: 5.0,
            formation_spacing: 40.0,
            orbit_radius: 120.0,
            orbit_step: 0.005,
            defensive_radius: 90.0,
            autonomous_asset_bias: 0.9,
            idle_jitter: 0.5,
            jammed_speed_factor: 0.2,
            jamming_damage: 0.05,
            hostile_pursuit_range: 160.0,
            hostile_standoff: 0.8,
            stats_interval_ms: 250,
            hit_effect_ticks: 12,
            explosion_effect_ticks: 40,
            speeds: SpeedTable::default(),
            damage: DamageTable::default(),
            threat: ThreatWeights::default(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(SimError::InvalidConfig)
    }
}

/// Per-run setup: which map, how many drones, which formation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Id of a preset in the map library.
    pub map: String,
    /// Friendly interceptors.
    pub friendly_count: u32,
    /// Hostile interceptors.
    pub hostile_count: u32,
    pub friendly_bomber_count: u32,
    pub hostile_bomber_count: u32,
    pub formation: Formation,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            map: "city".to_string(),
            friendly_count: 12,
            hostile_count: 15,
            friendly_bomber_count: 0,
            hostile_bomber_count: 3,
            formation: Formation::Circle,
        }
    }
}

impl ScenarioConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(SimError::InvalidConfig)
    }
}

/// Switches consulted live every tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFlags {
    pub communication: bool,
    pub jamming: bool,
}

impl Default for RunFlags {
    fn default() -> Self {
        Self {
            communication: true,
            jamming: true,
        }
    }
}
