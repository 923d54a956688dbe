//! Public API for the simulation.
//!
//! `SimWorld` is the interface a display host (or any other client) drives:
//! initialize a scenario, call `tick` once per frame with the live
//! communication and jamming switches, and read snapshots back.
//!
//! ## Tick model
//!
//! There is no time accumulator. Every `tick` call runs exactly one chained
//! pass of the schedule (see `systems` for the step order). Fire cooldowns and
//! the stats publish rate are measured on the injected `SimClock`, so the
//! effective fire rate depends on how often the host ticks.

use crate::clock::SimClock;
use crate::components::*;
use crate::config::{Formation, RunFlags, ScenarioConfig, SimConfig};
use crate::error::SimError;
use crate::maps::{MapLibrary, MapPreset};
use crate::rng::SimRng;
use crate::systems::formation::slot_position;
use crate::systems::*;
use crate::world::Snapshot;
use bevy_ecs::prelude::*;

/// The main simulation world container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Initializing (and re-initializing) a scenario
/// - Stepping the simulation forward
/// - Extracting state snapshots and statistics
pub struct SimWorld {
    world: World,
    schedule: Schedule,
}

impl SimWorld {
    /// Create an empty simulation world with default tuning.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create an empty simulation world with custom tuning.
    pub fn with_config(config: SimConfig) -> Self {
        Self::with_parts(config, SimRng::from_entropy(), SimClock::default())
    }

    /// Create a world with an explicit random source and clock.
    pub fn with_parts(config: SimConfig, rng: SimRng, clock: SimClock) -> Self {
        let mut world = World::new();

        world.insert_resource(config);
        world.insert_resource(rng);
        world.insert_resource(clock);
        world.insert_resource(MapLibrary::default());
        world.insert_resource(ScenarioConfig::default());
        Self::reset_run_state(&mut world);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                effect_aging_system,
                jam_reset_system,
                friendly_update_system,
                hostile_update_system,
                casualty_system,
                stats_publish_system,
            )
                .chain(),
        );

        Self { world, schedule }
    }

    fn reset_run_state(world: &mut World) {
        world.insert_resource(RunFlags::default());
        world.insert_resource(SimTick::default());
        world.insert_resource(IdAllocator::default());
        world.insert_resource(Counters::default());
        world.insert_resource(AssetArchive::default());
        world.insert_resource(EffectBuffer::default());
        world.insert_resource(StatsPublisher::default());
    }

    /// Replace the current run with a fresh one built from `scenario`.
    ///
    /// Fails only when the map is unknown, in which case the current run is
    /// left untouched.
    pub fn initialize(&mut self, scenario: &ScenarioConfig) -> Result<(), SimError> {
        let preset = self.world.resource::<MapLibrary>().get(&scenario.map)?.clone();

        self.world.clear_entities();
        Self::reset_run_state(&mut self.world);
        self.world.insert_resource(scenario.clone());

        for spec in &preset.assets {
            let id = self.world.resource::<Counters>().assets_spawned;
            self.world.spawn(AssetBundle {
                id: AssetId(id),
                info: AssetInfo {
                    label: spec.label.clone(),
                    kind: spec.kind,
                    size: spec.size,
                    priority: spec.priority,
                },
                position: spec.position(),
                health: Health::new(spec.health),
                marker: GroundAsset,
            });
            self.world.resource_mut::<Counters>().assets_spawned += 1;
        }

        let friendly_kinds = std::iter::repeat(DroneKind::Interceptor)
            .take(scenario.friendly_count as usize)
            .chain(std::iter::repeat(DroneKind::Bomber).take(scenario.friendly_bomber_count as usize));
        let roster_size = (scenario.friendly_count + scenario.friendly_bomber_count) as usize;
        let anchor = Position::centroid(&preset.assets.iter().map(|a| a.position()).collect::<Vec<_>>())
            .unwrap_or_else(|| Self::fallback_anchor(self.config()));
        for (index, kind) in friendly_kinds.enumerate() {
            let pos = self.friendly_spawn_point(&anchor, scenario.formation, index, roster_size);
            self.spawn_drone(Allegiance::Friendly, kind, pos);
        }

        let hostile_kinds = std::iter::repeat(DroneKind::Interceptor)
            .take(scenario.hostile_count as usize)
            .chain(std::iter::repeat(DroneKind::Bomber).take(scenario.hostile_bomber_count as usize));
        for kind in hostile_kinds {
            let pos = self.hostile_spawn_point();
            self.spawn_drone(Allegiance::Hostile, kind, pos);
        }

        tracing::info!(
            map = %preset.id,
            assets = preset.assets.len(),
            friendlies = roster_size,
            hostiles = scenario.hostile_count + scenario.hostile_bomber_count,
            formation = scenario.formation.name(),
            "scenario initialized"
        );
        Ok(())
    }

    /// Formation slot around the asset centroid, plus spawn jitter.
    fn friendly_spawn_point(
        &mut self,
        anchor: &Position,
        formation: Formation,
        index: usize,
        roster_size: usize,
    ) -> Position {
        let config = self.world.resource::<SimConfig>().clone();
        let slot = slot_position(anchor, formation, index, roster_size, 0.0, &config);
        let mut rng = self.world.resource_mut::<SimRng>();
        slot.offset(rng.jitter(config.spawn_jitter), rng.jitter(config.spawn_jitter))
    }

    /// Random point in the hostile spawn band along the far edge.
    fn hostile_spawn_point(&mut self) -> Position {
        let config = self.world.resource::<SimConfig>().clone();
        let mut rng = self.world.resource_mut::<SimRng>();
        Position::new(
            rng.range(config.world_width * 0.05, config.world_width * 0.95),
            rng.range(0.0, config.hostile_spawn_band),
        )
    }

    fn fallback_anchor(config: &SimConfig) -> Position {
        Position::new(config.world_width / 2.0, config.world_height * 0.75)
    }

    fn spawn_drone(&mut self, side: Allegiance, kind: DroneKind, pos: Position) -> DroneId {
        let id = self.world.resource_mut::<IdAllocator>().next(side);
        let bundle = DroneBundle::new(id, kind, pos);
        match side {
            Allegiance::Friendly => {
                self.world.spawn((bundle, Friendly));
            }
            Allegiance::Hostile => {
                self.world.spawn((bundle, Hostile));
                self.world.resource_mut::<Counters>().hostiles_spawned += 1;
            }
        }
        DroneId(id)
    }

    /// Add one bomber to a side mid-run.
    ///
    /// Friendly bombers appear near the live asset centroid, hostile bombers on
    /// the spawn edge.
    pub fn add_bomber(&mut self, side: Allegiance) -> DroneId {
        let pos = match side {
            Allegiance::Friendly => {
                let config = self.world.resource::<SimConfig>().clone();
                let mut assets = self.world.query_filtered::<&Position, With<GroundAsset>>();
                let anchor = Position::centroid(assets.iter(&self.world))
                    .unwrap_or_else(|| Self::fallback_anchor(&config));
                let mut rng = self.world.resource_mut::<SimRng>();
                anchor.offset(rng.jitter(config.spawn_jitter), rng.jitter(config.spawn_jitter))
            }
            Allegiance::Hostile => self.hostile_spawn_point(),
        };
        let id = self.spawn_drone(side, DroneKind::Bomber, pos);
        tracing::debug!(?side, drone = id.0, x = pos.x, y = pos.y, "bomber added");
        id
    }

    /// Advance the simulation by one tick with the given live switches.
    pub fn tick(&mut self, communication: bool, jamming: bool) {
        self.world.insert_resource(RunFlags {
            communication,
            jamming,
        });
        self.world.resource_mut::<SimTick>().increment();
        self.schedule.run(&mut self.world);
    }

    /// Add (or replace) a map preset usable by `initialize`.
    pub fn register_map(&mut self, preset: MapPreset) {
        self.world.resource_mut::<MapLibrary>().register(preset);
    }

    /// Latest published statistics; `None` before the first tick.
    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.world
            .get_resource::<StatsPublisher>()
            .and_then(|p| p.latest.as_ref())
    }

    /// How many statistics snapshots have been published this run.
    pub fn publish_count(&self) -> u64 {
        self.world
            .get_resource::<StatsPublisher>()
            .map(|p| p.publish_count)
            .unwrap_or(0)
    }

    pub fn status(&self) -> SimStatus {
        self.stats().map(|s| s.status).unwrap_or_default()
    }

    pub fn counters(&self) -> &Counters {
        self.world.resource::<Counters>()
    }

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&mut self) -> Snapshot {
        let tick = self.current_tick();
        Snapshot::from_world(&mut self.world, tick)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> Result<String, SimError> {
        self.snapshot().to_json()
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.world.get_resource::<SimTick>().map(|t| t.0).unwrap_or(0)
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        self.world.resource::<ScenarioConfig>()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}
