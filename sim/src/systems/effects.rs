//! Cosmetic effect events (hits and explosions) for the display layer.
//!
//! The engine only records where and when an effect happened; drawing is
//! somebody else's job. Effects age one step per tick and expire.

use crate::components::Position;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Hit,
    Explosion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub x: f32,
    pub y: f32,
    /// Ticks since the effect was emitted.
    pub age: u32,
    /// Ticks the effect stays alive.
    pub lifetime: u32,
}

impl Effect {
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Resource buffering live effects.
#[derive(Resource, Debug, Clone, Default)]
pub struct EffectBuffer {
    effects: Vec<Effect>,
}

impl EffectBuffer {
    pub fn push(&mut self, kind: EffectKind, pos: Position, lifetime: u32) {
        self.effects.push(Effect {
            kind,
            x: pos.x,
            y: pos.y,
            age: 0,
            lifetime,
        });
    }

    pub fn push_hit(&mut self, pos: Position, lifetime: u32) {
        self.push(EffectKind::Hit, pos, lifetime);
    }

    pub fn push_explosion(&mut self, pos: Position, lifetime: u32) {
        self.push(EffectKind::Explosion, pos, lifetime);
    }

    /// Advance every effect by one tick and drop the expired ones.
    pub fn age(&mut self) {
        for effect in &mut self.effects {
            effect.age += 1;
        }
        self.effects.retain(|e| !e.is_expired());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Tick step 1: age and cull effects.
pub fn effect_aging_system(mut buffer: ResMut<EffectBuffer>) {
    buffer.age();
}
