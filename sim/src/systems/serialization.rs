//! Serialization utilities for simulation state.

use crate::error::SimError;
use crate::world::Snapshot;

/// Serialize a snapshot to JSON bytes.
pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<Vec<u8>, SimError> {
    serde_json::to_vec(snapshot).map_err(SimError::Snapshot)
}

/// Serialize a snapshot to a JSON string.
pub fn snapshot_to_json_string(snapshot: &Snapshot) -> Result<String, SimError> {
    snapshot.to_json()
}

/// Deserialize a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<Snapshot, SimError> {
    serde_json::from_slice(data).map_err(SimError::Snapshot)
}

/// Deserialize a snapshot from a JSON string.
pub fn snapshot_from_json_string(data: &str) -> Result<Snapshot, SimError> {
    serde_json::from_str(data).map_err(SimError::Snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Allegiance, DroneKind};
    use crate::systems::stats::{SimStatus, StatsSnapshot};
    use crate::world::DroneSnapshot;

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = Snapshot {
            tick: 42,
            drones: vec![DroneSnapshot {
                id: 1,
                allegiance: Allegiance::Friendly,
                kind: DroneKind::Interceptor,
                x: 10.0,
                y: 20.0,
                vx: 1.0,
                vy: 0.0,
                health: 100.0,
                health_max: 100.0,
                target_id: Some(4),
                is_engaging: true,
                is_jammed: false,
                is_lost: false,
                trail: vec![(9.0, 20.0)],
                jamming: vec![4],
            }],
            stats: Some(StatsSnapshot {
                engaged_count: 1,
                threats_in_range: 0,
                eliminated_total: 2,
                integrity_percent: 87.5,
                friendly_losses: 0,
                assets_destroyed: 0,
                live_friendlies: 1,
                live_hostiles: 1,
                status: SimStatus::Running,
                drones: vec![],
            }),
            ..Default::default()
        };

        let json = snapshot_to_json_string(&snapshot).unwrap();
        let restored = snapshot_from_json_string(&json).unwrap();
        assert_eq!(restored, snapshot);

        let bytes = snapshot_to_json(&snapshot).unwrap();
        assert_eq!(snapshot_from_json(&bytes).unwrap().tick, 42);
    }

    #[test]
    fn test_garbage_is_a_snapshot_error() {
        let err = snapshot_from_json_string("{not json").unwrap_err();
        assert!(matches!(err, SimError::Snapshot(_)));
    }
}
