//! Map presets: ordered lists of ground assets to defend.
//!
//! Presets are static input data. The engine ships three built-in maps and
//! lets the host register its own (parsed from JSON or built in code).

use crate::components::{AssetKind, Position};
use crate::error::SimError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// One ground asset as described by a map preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub label: String,
    pub kind: AssetKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub priority: f32,
    pub health: f32,
}

impl AssetSpec {
    pub fn new(label: &str, kind: AssetKind, x: f32, y: f32, priority: f32, health: f32) -> Self {
        Self {
            label: label.to_string(),
            kind,
            x,
            y,
            size: 30.0,
            priority,
            health,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A named, ordered asset roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPreset {
    pub id: String,
    pub name: String,
    pub assets: Vec<AssetSpec>,
}

impl MapPreset {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(SimError::InvalidConfig)
    }

    /// Dense downtown block with a command post at its heart.
    pub fn city() -> Self {
        Self {
            id: "city".to_string(),
            name: "City Center".to_string(),
            assets: vec![
                AssetSpec::new("Command Post", AssetKind::Command, 600.0, 620.0, 3.0, 500.0).with_size(40.0),
                AssetSpec::new("Power Plant", AssetKind::Power, 420.0, 660.0, 2.5, 400.0).with_size(36.0),
                AssetSpec::new("Hospital", AssetKind::Building, 780.0, 660.0, 2.0, 300.0),
                AssetSpec::new("Radar Tower", AssetKind::Radar, 600.0, 730.0, 1.5, 200.0).with_size(20.0),
                AssetSpec::new("Fuel Depot", AssetKind::Depot, 300.0, 720.0, 1.0, 250.0),
            ],
        }
    }

    /// Spread-out airfield with hangars along the runway.
    pub fn airbase() -> Self {
        Self {
            id: "airbase".to_string(),
            name: "Forward Airbase".to_string(),
            assets: vec![
                AssetSpec::new("Control Tower", AssetKind::Command, 600.0, 600.0, 3.0, 400.0),
                AssetSpec::new("Hangar A", AssetKind::Hangar, 380.0, 680.0, 2.0, 350.0).with_size(50.0),
                AssetSpec::new("Hangar B", AssetKind::Hangar, 820.0, 680.0, 2.0, 350.0).with_size(50.0),
                AssetSpec::new("Early Warning Radar", AssetKind::Radar, 600.0, 740.0, 2.5, 200.0).with_size(20.0),
            ],
        }
    }

    /// Waterfront with depots strung along the quay.
    pub fn harbor() -> Self {
        Self {
            id: "harbor".to_string(),
            name: "Harbor District".to_string(),
            assets: vec![
                AssetSpec::new("Harbor Master", AssetKind::Command, 560.0, 640.0, 2.5, 350.0),
                AssetSpec::new("Fuel Terminal", AssetKind::Depot, 260.0, 700.0, 2.0, 300.0).with_size(45.0),
                AssetSpec::new("Container Yard", AssetKind::Depot, 900.0, 700.0, 1.5, 300.0).with_size(45.0),
            ],
        }
    }
}

/// Registry of available map presets, keyed by id.
#[derive(Resource, Debug, Clone)]
pub struct MapLibrary {
    presets: Vec<MapPreset>,
}

impl Default for MapLibrary {
    fn default() -> Self {
        Self {
            presets: vec![MapPreset::city(), MapPreset::airbase(), MapPreset::harbor()],
        }
    }
}

impl MapLibrary {
    pub fn empty() -> Self {
        Self { presets: Vec::new() }
    }

    /// Add a preset, replacing any existing preset with the same id.
    pub fn register(&mut self, preset: MapPreset) {
        if let Some(existing) = self.presets.iter_mut().find(|p| p.id == preset.id) {
            *existing = preset;
        } else {
            self.presets.push(preset);
        }
    }

    pub fn get(&self, id: &str) -> Result<&MapPreset, SimError> {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| SimError::UnknownMap(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.id.as_str())
    }
}
