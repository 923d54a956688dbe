//! Entity lifecycle - tick counter, id allocation and the casualty partition.
//!
//! Casualties are only ever removed here, at the end of the tick in which
//! their health reached zero. Each removal leaves an explosion effect and
//! bumps the matching counter. Destroyed assets move to the archive.

use crate::components::*;
use crate::config::SimConfig;
use crate::systems::effects::EffectBuffer;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Global simulation tick counter.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Next free drone id per allegiance.
#[derive(Resource, Debug, Clone, Default)]
pub struct IdAllocator {
    next_friendly: u32,
    next_hostile: u32,
}

impl IdAllocator {
    pub fn next(&mut self, side: Allegiance) -> u32 {
        let slot = match side {
            Allegiance::Friendly => &mut self.next_friendly,
            Allegiance::Hostile => &mut self.next_hostile,
        };
        let id = *slot;
        *slot += 1;
        id
    }
}

/// Running totals for the current run.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub friendly_losses: u32,
    pub hostiles_eliminated: u32,
    pub assets_destroyed: u32,
    pub hostiles_spawned: u32,
    pub assets_spawned: u32,
}

/// A ground asset that has been destroyed. Kept for display and integrity math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestroyedAsset {
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

/// Archive of destroyed assets, in order of destruction.
#[derive(Resource, Debug, Clone, Default)]
pub struct AssetArchive {
    pub destroyed: Vec<DestroyedAsset>,
}

impl AssetArchive {
    pub fn total_max_health(&self) -> f32 {
        self.destroyed.iter().map(|a| a.health_max).sum()
    }
}

/// Tick step 5: remove everything at or below zero health.
#[allow(clippy::too_many_arguments)]
pub fn casualty_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut counters: ResMut<Counters>,
    mut archive: ResMut<AssetArchive>,
    mut effects: ResMut<EffectBuffer>,
    friendlies: Query<(Entity, &DroneId, &Position, &Health), With<Friendly>>,
    hostiles: Query<(Entity, &DroneId, &Position, &Health), (With<Hostile>, Without<Friendly>)>,
    assets: Query<(Entity, &AssetId, &AssetInfo, &Position, &Health), With<GroundAsset>>,
    mut targeting: Query<&mut Targeting, With<Friendly>>,
) {
    let explosion_ticks = config.explosion_effect_ticks;

    for (entity, id, pos, health) in friendlies.iter() {
        if health.is_alive() {
            continue;
        }
        commands.entity(entity).despawn();
        effects.push_explosion(*pos, explosion_ticks);
        counters.friendly_losses += 1;
        tracing::debug!(drone = id.0, "friendly drone lost");
    }

    let mut removed_hostiles = HashSet::new();
    for (entity, id, pos, health) in hostiles.iter() {
        if health.is_alive() {
            continue;
        }
        commands.entity(entity).despawn();
        effects.push_explosion(*pos, explosion_ticks);
        counters.hostiles_eliminated += 1;
        removed_hostiles.insert(*id);
        tracing::debug!(drone = id.0, "hostile drone eliminated");
    }

    for (entity, id, info, pos, health) in assets.iter() {
        if health.is_alive() {
            continue;
        }
        archive.destroyed.push(DestroyedAsset {
            id: id.0,
            label: info.label.clone(),
            kind: info.kind,
            x: pos.x,
            y: pos.y,
            size: info.size,
            priority: info.priority,
            health: 0.0,
            health_max: health.max,
        });
        commands.entity(entity).despawn();
        effects.push_explosion(*pos, explosion_ticks);
        counters.assets_destroyed += 1;
        tracing::debug!(asset = id.0, label = %info.label, "ground asset destroyed");
    }

    // No friendly may keep pointing at a removed hostile.
    if !removed_hostiles.is_empty() {
        for mut t in targeting.iter_mut() {
            if t.target.is_some_and(|id| removed_hostiles.contains(&id)) {
                t.clear();
            }
        }
    }
}
