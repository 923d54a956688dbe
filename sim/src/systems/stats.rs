//! Aggregate statistics - tick step 6.
//!
//! Snapshots are published at a bounded rate measured on the injected clock.
//! A change in the elimination count always forces a publish so downstream
//! counters never lag behind a kill.

use crate::clock::SimClock;
use crate::components::*;
use crate::config::SimConfig;
use crate::systems::lifecycle::{AssetArchive, Counters};
use crate::systems::threat::threats_in_range;
use crate::systems::view::AssetView;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimStatus {
    #[default]
    Running,
    /// Every hostile that was spawned has been eliminated.
    Defended,
    /// Every ground asset has been destroyed.
    Overrun,
}

/// Display record for one drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneTelemetry {
    pub id: u32,
    pub allegiance: Allegiance,
    pub kind: DroneKind,
    pub x: f32,
    pub y: f32,
    pub target_id: Option<u32>,
    pub health: f32,
    pub health_max: f32,
    pub is_engaging: bool,
    pub is_jammed: bool,
    pub is_lost: bool,
}

/// Published statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub engaged_count: u32,
    pub threats_in_range: u32,
    pub eliminated_total: u32,
    pub integrity_percent: f32,
    pub friendly_losses: u32,
    pub assets_destroyed: u32,
    pub live_friendlies: u32,
    pub live_hostiles: u32,
    pub status: SimStatus,
    pub drones: Vec<DroneTelemetry>,
}

/// Rate limiter and holder for the latest published snapshot.
#[derive(Resource, Debug, Clone, Default)]
pub struct StatsPublisher {
    pub latest: Option<StatsSnapshot>,
    pub last_published_ms: u64,
    pub published_eliminations: u32,
    pub publish_count: u64,
}

impl StatsPublisher {
    /// Whether a snapshot is due at `now_ms`.
    pub fn is_due(&self, now_ms: u64, interval_ms: u64, eliminations: u32) -> bool {
        self.latest.is_none()
            || eliminations != self.published_eliminations
            || now_ms.saturating_sub(self.last_published_ms) >= interval_ms
    }
}

/// Integrity of the defended base as a percentage of total asset health.
///
/// Destroyed assets count with zero health against their full maximum. With no
/// assets at all the base is reported intact.
pub fn integrity_percent(live: &[(f32, f32)], archive: &AssetArchive) -> f32 {
    let current: f32 = live.iter().map(|(health, _)| health).sum();
    let max: f32 = live.iter().map(|(_, max)| max).sum::<f32>() + archive.total_max_health();
    if max <= 0.0 {
        100.0
    } else {
        current / max * 100.0
    }
}

/// Outcome given what was spawned and what is left. Overrun wins a tie.
pub fn run_status(counters: &Counters, live_hostiles: usize, live_assets: usize) -> SimStatus {
    if counters.assets_spawned > 0 && live_assets == 0 {
        SimStatus::Overrun
    } else if counters.hostiles_spawned > 0 && live_hostiles == 0 {
        SimStatus::Defended
    } else {
        SimStatus::Running
    }
}

type FriendlyStats = (
    &'static DroneId,
    &'static DroneKind,
    &'static Position,
    &'static Health,
    &'static Targeting,
    &'static LostMark,
);
type HostileStats = (
    &'static DroneId,
    &'static DroneKind,
    &'static Position,
    &'static Health,
    &'static Jammed,
);

/// Tick step 6: publish a stats snapshot when one is due.
#[allow(clippy::too_many_arguments)]
pub fn stats_publish_system(
    config: Res<SimConfig>,
    clock: Res<SimClock>,
    counters: Res<Counters>,
    archive: Res<AssetArchive>,
    mut publisher: ResMut<StatsPublisher>,
    friendlies: Query<FriendlyStats, With<Friendly>>,
    hostiles: Query<HostileStats, (With<Hostile>, Without<Friendly>)>,
    assets: Query<(Entity, &AssetId, &AssetInfo, &Position, &Health), With<GroundAsset>>,
) {
    let now_ms = clock.now_ms();
    if !publisher.is_due(now_ms, config.stats_interval_ms, counters.hostiles_eliminated) {
        return;
    }

    let asset_views: Vec<AssetView> = assets
        .iter()
        .map(|(entity, id, info, pos, health)| AssetView {
            entity,
            id: *id,
            position: *pos,
            priority: info.priority,
            health: health.current,
        })
        .collect();
    let asset_health: Vec<(f32, f32)> = assets.iter().map(|(.., h)| (h.current, h.max)).collect();

    let mut drones = Vec::new();
    let mut engaged_count = 0;
    for (id, kind, pos, health, targeting, lost) in friendlies.iter() {
        if targeting.engaging && targeting.target.is_some() {
            engaged_count += 1;
        }
        drones.push(DroneTelemetry {
            id: id.0,
            allegiance: Allegiance::Friendly,
            kind: *kind,
            x: pos.x,
            y: pos.y,
            target_id: targeting.target.map(|t| t.0),
            health: health.current,
            health_max: health.max,
            is_engaging: targeting.engaging,
            is_jammed: false,
            is_lost: lost.is_lost(),
        });
    }

    for (id, kind, pos, health, jammed) in hostiles.iter() {
        drones.push(DroneTelemetry {
            id: id.0,
            allegiance: Allegiance::Hostile,
            kind: *kind,
            x: pos.x,
            y: pos.y,
            target_id: None,
            health: health.current,
            health_max: health.max,
            is_engaging: false,
            is_jammed: jammed.0,
            is_lost: false,
        });
    }
    drones.sort_by_key(|d| (d.allegiance == Allegiance::Hostile, d.id));

    let threats = threats_in_range(hostiles.iter().map(|(_, _, pos, ..)| pos), &asset_views, config.threat_range);
    let live_friendlies = friendlies.iter().count();
    let live_hostiles = hostiles.iter().count();
    let status = run_status(&counters, live_hostiles, asset_views.len());

    let snapshot = StatsSnapshot {
        engaged_count,
        threats_in_range: threats as u32,
        eliminated_total: counters.hostiles_eliminated,
        integrity_percent: integrity_percent(&asset_health, &archive),
        friendly_losses: counters.friendly_losses,
        assets_destroyed: counters.assets_destroyed,
        live_friendlies: live_friendlies as u32,
        live_hostiles: live_hostiles as u32,
        status,
        drones,
    };

    let previous = publisher.latest.as_ref().map(|s| s.status);
    if previous.is_some_and(|p| p != status) {
        tracing::info!(?status, eliminated = counters.hostiles_eliminated, "run outcome changed");
    }
    tracing::trace!(
        engaged = snapshot.engaged_count,
        threats = snapshot.threats_in_range,
        integrity = snapshot.integrity_percent,
        "stats published"
    );

    publisher.latest = Some(snapshot);
    publisher.last_published_ms = now_ms;
    publisher.published_eliminations = counters.hostiles_eliminated;
    publisher.publish_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::systems::lifecycle::DestroyedAsset;

    #[test]
    fn test_integrity_counts_destroyed_assets() {
        let mut archive = AssetArchive::default();
        assert_eq!(integrity_percent(&[], &archive), 100.0);

        archive.destroyed.push(DestroyedAsset {
            id: 0,
            label: "Depot".into(),
            kind: AssetKind::Depot,
            x: 0.0,
            y: 0.0,
            size: 30.0,
            priority: 1.0,
            health: 0.0,
            health_max: 100.0,
        });
        let pct = integrity_percent(&[(50.0, 100.0)], &archive);
        assert!((pct - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_status_overrun_beats_defended() {
        let counters = Counters {
            hostiles_spawned: 3,
            assets_spawned: 2,
            ..Default::default()
        };
        assert_eq!(run_status(&counters, 3, 2), SimStatus::Running);
        assert_eq!(run_status(&counters, 0, 2), SimStatus::Defended);
        assert_eq!(run_status(&counters, 0, 0), SimStatus::Overrun);
        assert_eq!(run_status(&Counters::default(), 0, 0), SimStatus::Running);
    }

    fn setup(clock: &ManualClock) -> (World, Schedule) {
        let mut world = World::new();
        world.insert_resource(SimConfig::default());
        world.insert_resource(SimClock::new(clock.clone()));
        world.insert_resource(Counters::default());
        world.insert_resource(AssetArchive::default());
        world.insert_resource(StatsPublisher::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(stats_publish_system);
        (world, schedule)
    }

    #[test]
    fn test_publishes_at_bounded_rate_but_flushes_eliminations() {
        let clock = ManualClock::new(1_000);
        let (mut world, mut schedule) = setup(&clock);

        schedule.run(&mut world);
        assert_eq!(world.resource::<StatsPublisher>().publish_count, 1);

        clock.advance(100);
        schedule.run(&mut world);
        assert_eq!(world.resource::<StatsPublisher>().publish_count, 1);

        world.resource_mut::<Counters>().hostiles_eliminated += 1;
        schedule.run(&mut world);
        let publisher = world.resource::<StatsPublisher>();
        assert_eq!(publisher.publish_count, 2);
        assert_eq!(publisher.latest.as_ref().unwrap().eliminated_total, 1);

        clock.advance(250);
        schedule.run(&mut world);
        assert_eq!(world.resource::<StatsPublisher>().publish_count, 3);
    }

    #[test]
    fn test_snapshot_contents() {
        let clock = ManualClock::new(0);
        let (mut world, mut schedule) = setup(&clock);

        world.spawn(AssetBundle {
            id: AssetId(0),
            position: Position::new(100.0, 100.0),
            health: Health::new(200.0),
            ..Default::default()
        });
        let mut engaged = DroneBundle::new(1, DroneKind::Interceptor, Position::new(0.0, 0.0));
        engaged.targeting = Targeting {
            target: Some(DroneId(0)),
            engaging: true,
        };
        world.spawn((engaged, Friendly));
        let mut lost = DroneBundle::new(0, DroneKind::Bomber, Position::new(900.0, 0.0));
        lost.lost_mark = LostMark(Some(Position::new(900.0, 0.0)));
        world.spawn((lost, Friendly));
        let mut near = DroneBundle::new(0, DroneKind::Interceptor, Position::new(120.0, 120.0));
        near.jammed = Jammed(true);
        world.spawn((near, Hostile));
        world.spawn((DroneBundle::new(1, DroneKind::Bomber, Position::new(800.0, 0.0)), Hostile));

        schedule.run(&mut world);

        let stats = world.resource::<StatsPublisher>().latest.clone().unwrap();
        assert_eq!(stats.engaged_count, 1);
        assert_eq!(stats.threats_in_range, 1);
        assert_eq!(stats.integrity_percent, 100.0);
        assert_eq!(stats.live_friendlies, 2);
        assert_eq!(stats.live_hostiles, 2);
        assert_eq!(stats.status, SimStatus::Running);

        let order: Vec<_> = stats.drones.iter().map(|d| (d.allegiance, d.id)).collect();
        assert_eq!(
            order,
            vec![
                (Allegiance::Friendly, 0),
                (Allegiance::Friendly, 1),
                (Allegiance::Hostile, 0),
                (Allegiance::Hostile, 1),
            ]
        );
        assert!(stats.drones[0].is_lost);
        assert_eq!(stats.drones[1].target_id, Some(0));
        assert!(stats.drones[2].is_jammed);
        assert_eq!(stats.drones[3].health_max, 150.0);
    }
}
