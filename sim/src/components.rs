//! ECS Components for the swarm defense simulation.
//!
//! Components are pure data containers attached to entities.
//! All engagement logic lives in systems that query these components.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of past positions kept in a drone's trail.
pub const TRAIL_CAPACITY: usize = 10;

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D position on the map (x = east/west, y = north/south, y grows downward).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit vector pointing from `self` toward `other`, or zero if they coincide.
    pub fn direction_to(&self, other: &Position) -> (f32, f32) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < 0.0001 {
            (0.0, 0.0)
        } else {
            (dx / dist, dy / dist)
        }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Arithmetic mean of a set of positions, `None` when empty.
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Position>) -> Option<Position> {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0usize;
        for p in points {
            sum_x += p.x;
            sum_y += p.y;
            count += 1;
        }
        if count == 0 {
            None
        } else {
            Some(Position::new(sum_x / count as f32, sum_y / count as f32))
        }
    }
}

/// Per-tick displacement vector. Positions advance by exactly this much each tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

impl Velocity {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    /// Velocity of magnitude `speed` pointing from `from` toward `to`.
    pub fn toward(from: &Position, to: &Position, speed: f32) -> Self {
        let (ux, uy) = from.direction_to(to);
        Self::new(ux * speed, uy * speed)
    }

    pub fn magnitude(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Identifier of a drone, unique within its allegiance.
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DroneId(pub u32);

/// Which swarm a drone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allegiance {
    Friendly,
    Hostile,
}

/// Marker for drones of the defending swarm.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Friendly;

/// Marker for drones of the attacking swarm.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hostile;

/// Airframe category.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneKind {
    #[default]
    Interceptor,
    Bomber,
}

impl DroneKind {
    pub fn max_health(&self) -> f32 {
        match self {
            DroneKind::Interceptor => 100.0,
            DroneKind::Bomber => 150.0,
        }
    }
}

// ============================================================================
// COMBAT COMPONENTS
// ============================================================================

/// Structural integrity of a drone or asset. Only ever goes down.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Engagement state of a drone.
///
/// `target` is a by-id reference into the live hostile set. It is re-resolved
/// every tick and cleared as soon as the referent is gone.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Targeting {
    pub target: Option<DroneId>,
    pub engaging: bool,
}

impl Targeting {
    pub fn clear(&mut self) {
        self.target = None;
        self.engaging = false;
    }
}

/// Wall-clock rate limiter for firing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireControl {
    pub last_fired_at_ms: Option<u64>,
}

impl FireControl {
    pub fn is_ready(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_fired_at_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
        }
    }

    /// Consume the cooldown if it has elapsed. Returns whether the shot goes out.
    pub fn try_fire(&mut self, now_ms: u64, cooldown_ms: u64) -> bool {
        if self.is_ready(now_ms, cooldown_ms) {
            self.last_fired_at_ms = Some(now_ms);
            true
        } else {
            false
        }
    }
}

/// Ring of the most recent positions, newest first.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Position>,
}

impl Trail {
    pub fn record(&mut self, pos: Position) {
        self.points.push_front(pos);
        self.points.truncate(TRAIL_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn newest(&self) -> Option<&Position> {
        self.points.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.points.iter()
    }
}

// ============================================================================
// ELECTRONIC WARFARE / COMMS COMPONENTS
// ============================================================================

/// Set on hostiles that sit inside a friendly jamming bubble this tick.
/// Cleared at the start of every tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jammed(pub bool);

/// Hostiles a friendly drone is suppressing this tick.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JammingTargets(pub Vec<DroneId>);

/// Last known position of a friendly that drifted away from the swarm.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LostMark(pub Option<Position>);

impl LostMark {
    pub fn is_lost(&self) -> bool {
        self.0.is_some()
    }
}

// ============================================================================
// GROUND ASSET COMPONENTS
// ============================================================================

/// Marker for defended ground assets.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GroundAsset;

/// Identifier of a ground asset.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u32);

/// Category of a ground asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Building,
    Radar,
    Hangar,
    Depot,
    Command,
    Power,
}

/// Static description of a ground asset.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub label: String,
    pub kind: AssetKind,
    pub size: f32,
    /// Weight used by threat scoring.
    pub priority: f32,
}

impl Default for AssetInfo {
    fn default() -> Self {
        Self {
            label: String::new(),
            kind: AssetKind::Building,
            size: 30.0,
            priority: 1.0,
        }
    }
}

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning a complete drone entity (allegiance marker added separately).
#[derive(Bundle, Default)]
pub struct DroneBundle {
    pub id: DroneId,
    pub kind: DroneKind,
    pub position: Position,
    pub velocity: Velocity,
    pub health: Health,
    pub targeting: Targeting,
    pub trail: Trail,
    pub fire_control: FireControl,
    pub jammed: Jammed,
    pub jamming_targets: JammingTargets,
    pub lost_mark: LostMark,
}

impl DroneBundle {
    pub fn new(id: u32, kind: DroneKind, position: Position) -> Self {
        Self {
            id: DroneId(id),
            kind,
            position,
            health: Health::new(kind.max_health()),
            ..Default::default()
        }
    }
}

/// Bundle for spawning a ground asset.
#[derive(Bundle, Default)]
pub struct AssetBundle {
    pub id: AssetId,
    pub info: AssetInfo,
    pub position: Position,
    pub health: Health,
    pub marker: GroundAsset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_never_increases_or_goes_negative() {
        let mut health = Health::new(100.0);
        health.damage(30.0);
        assert_eq!(health.current, 70.0);
        health.damage(-50.0);
        assert_eq!(health.current, 70.0);
        health.damage(500.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_trail_keeps_newest_first_and_caps() {
        let mut trail = Trail::default();
        for i in 0..15 {
            trail.record(Position::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_CAPACITY);
        assert_eq!(trail.newest().map(|p| p.x), Some(14.0));
        assert_eq!(trail.iter().last().map(|p| p.x), Some(5.0));
    }

    #[test]
    fn test_fire_control_cooldown() {
        let mut fire = FireControl::default();
        assert!(fire.try_fire(1_000, 500));
        assert!(!fire.try_fire(1_200, 500));
        assert!(fire.try_fire(1_500, 500));
    }

    #[test]
    fn test_centroid() {
        let points = [Position::new(0.0, 0.0), Position::new(10.0, 20.0)];
        let c = Position::centroid(points.iter()).unwrap();
        assert!((c.x - 5.0).abs() < 0.001);
        assert!((c.y - 10.0).abs() < 0.001);
        assert!(Position::centroid(std::iter::empty::<&Position>()).is_none());
    }

    #[test]
    fn test_bomber_bundle_uses_bomber_health() {
        let bundle = DroneBundle::new(3, DroneKind::Bomber, Position::new(1.0, 2.0));
        assert_eq!(bundle.health.max, 150.0);
        assert_eq!(bundle.id, DroneId(3));
    }
}
