//! Snapshot types.
//!
//! The `Snapshot` struct is the serializable view of the simulation that a
//! display host consumes. It is read-only: nothing in it feeds back into the
//! engine.

use crate::components::*;
use crate::error::SimError;
use crate::systems::effects::{Effect, EffectBuffer};
use crate::systems::lifecycle::{AssetArchive, DestroyedAsset};
use crate::systems::stats::{StatsPublisher, StatsSnapshot};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Full state of one drone for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneSnapshot {
    pub id: u32,
    pub allegiance: Allegiance,
    pub kind: DroneKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub health: f32,
    pub health_max: f32,
    pub target_id: Option<u32>,
    pub is_engaging: bool,
    pub is_jammed: bool,
    pub is_lost: bool,
    /// Recent positions, newest first.
    pub trail: Vec<(f32, f32)>,
    pub jamming: Vec<u32>,
}

/// A live ground asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    pub id: u32,
    pub label: String,
    pub kind: AssetKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub priority: f32,
    pub health: f32,
    pub health_max: f32,
}

/// Complete simulation state for a display host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Friendlies then hostiles, each in roster order.
    pub drones: Vec<DroneSnapshot>,
    pub assets: Vec<AssetSnapshot>,
    pub destroyed_assets: Vec<DestroyedAsset>,
    pub effects: Vec<Effect>,
    /// Most recently published statistics, if any.
    pub stats: Option<StatsSnapshot>,
}

type DroneRow = (
    &'static DroneId,
    &'static DroneKind,
    &'static Position,
    &'static Velocity,
    &'static Health,
    &'static Targeting,
    &'static Trail,
    &'static Jammed,
    &'static JammingTargets,
    &'static LostMark,
    Has<Hostile>,
);

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64) -> Self {
        let mut drones = Vec::new();
        let mut query = world.query_filtered::<DroneRow, Or<(With<Friendly>, With<Hostile>)>>();
        for (id, kind, pos, vel, health, targeting, trail, jammed, jamming, lost, hostile) in query.iter(world) {
            drones.push(DroneSnapshot {
                id: id.0,
                allegiance: if hostile { Allegiance::Hostile } else { Allegiance::Friendly },
                kind: *kind,
                x: pos.x,
                y: pos.y,
                vx: vel.vx,
                vy: vel.vy,
                health: health.current,
                health_max: health.max,
                target_id: targeting.target.map(|t| t.0),
                is_engaging: targeting.engaging,
                is_jammed: jammed.0,
                is_lost: lost.is_lost(),
                trail: trail.iter().map(|p| (p.x, p.y)).collect(),
                jamming: jamming.0.iter().map(|t| t.0).collect(),
            });
        }
        drones.sort_by_key(|d| (d.allegiance == Allegiance::Hostile, d.id));

        let mut assets = Vec::new();
        let mut asset_query = world.query_filtered::<(&AssetId, &AssetInfo, &Position, &Health), With<GroundAsset>>();
        for (id, info, pos, health) in asset_query.iter(world) {
            assets.push(AssetSnapshot {
                id: id.0,
                label: info.label.clone(),
                kind: info.kind,
                x: pos.x,
                y: pos.y,
                size: info.size,
                priority: info.priority,
                health: health.current,
                health_max: health.max,
            });
        }
        assets.sort_by_key(|a| a.id);

        let destroyed_assets = world
            .get_resource::<AssetArchive>()
            .map(|a| a.destroyed.clone())
            .unwrap_or_default();
        let effects = world
            .get_resource::<EffectBuffer>()
            .map(|b| b.iter().copied().collect())
            .unwrap_or_default();
        let stats = world
            .get_resource::<StatsPublisher>()
            .and_then(|p| p.latest.clone());

        Self {
            tick,
            drones,
            assets,
            destroyed_assets,
            effects,
            stats,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string(self).map_err(SimError::Snapshot)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(SimError::Snapshot)
    }

    pub fn friendlies(&self) -> impl Iterator<Item = &DroneSnapshot> {
        self.drones.iter().filter(|d| d.allegiance == Allegiance::Friendly)
    }

    pub fn hostiles(&self) -> impl Iterator<Item = &DroneSnapshot> {
        self.drones.iter().filter(|d| d.allegiance == Allegiance::Hostile)
    }
}
