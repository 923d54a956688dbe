//! Read-only views of live entities and the query shapes the update systems share.
//!
//! Drone updates mutate the world one drone at a time, so every decision is
//! taken against a fresh copy of the current state. These views are that copy.

use crate::components::*;
use bevy_ecs::prelude::*;

/// Mutable access to every friendly drone.
pub type FriendlyData = (
    Entity,
    &'static DroneId,
    &'static DroneKind,
    &'static mut Position,
    &'static mut Velocity,
    &'static mut Health,
    &'static mut Targeting,
    &'static mut Trail,
    &'static mut FireControl,
    &'static mut LostMark,
    &'static mut JammingTargets,
);
pub type FriendlyQuery<'w, 's> = Query<'w, 's, FriendlyData, With<Friendly>>;

/// Mutable access to every hostile drone.
pub type HostileData = (
    Entity,
    &'static DroneId,
    &'static DroneKind,
    &'static mut Position,
    &'static mut Velocity,
    &'static mut Health,
    &'static mut Trail,
    &'static mut FireControl,
    &'static mut Jammed,
);
pub type HostileQuery<'w, 's> = Query<'w, 's, HostileData, (With<Hostile>, Without<Friendly>)>;

/// Mutable access to every ground asset.
pub type AssetData = (
    Entity,
    &'static AssetId,
    &'static AssetInfo,
    &'static Position,
    &'static mut Health,
);
pub type AssetQuery<'w, 's> =
    Query<'w, 's, AssetData, (With<GroundAsset>, Without<Friendly>, Without<Hostile>)>;

/// Copy of one drone's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneView {
    pub entity: Entity,
    pub id: DroneId,
    pub kind: DroneKind,
    pub position: Position,
    pub health: f32,
    pub target: Option<DroneId>,
    pub engaging: bool,
    pub lost_mark: Option<Position>,
    pub jammed: bool,
}

impl DroneView {
    pub fn new(entity: Entity, id: u32, kind: DroneKind, position: Position) -> Self {
        Self {
            entity,
            id: DroneId(id),
            kind,
            position,
            health: kind.max_health(),
            target: None,
            engaging: false,
            lost_mark: None,
            jammed: false,
        }
    }

    pub fn distance_to(&self, pos: &Position) -> f32 {
        self.position.distance_to(pos)
    }
}

/// Copy of one ground asset's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetView {
    pub entity: Entity,
    pub id: AssetId,
    pub position: Position,
    pub priority: f32,
    pub health: f32,
}

/// Live friendlies in roster order (ascending id).
pub fn friendly_views(query: &FriendlyQuery) -> Vec<DroneView> {
    let mut views: Vec<DroneView> = query
        .iter()
        .filter(|(_, _, _, _, _, health, ..)| health.is_alive())
        .map(|(entity, id, kind, pos, _, health, targeting, _, _, lost, _)| DroneView {
            entity,
            id: *id,
            kind: *kind,
            position: *pos,
            health: health.current,
            target: targeting.target,
            engaging: targeting.engaging,
            lost_mark: lost.0,
            jammed: false,
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

/// Live hostiles in roster order (ascending id).
pub fn hostile_views(query: &HostileQuery) -> Vec<DroneView> {
    let mut views: Vec<DroneView> = query
        .iter()
        .filter(|(_, _, _, _, _, health, ..)| health.is_alive())
        .map(|(entity, id, kind, pos, _, health, _, _, jammed)| DroneView {
            entity,
            id: *id,
            kind: *kind,
            position: *pos,
            health: health.current,
            target: None,
            engaging: false,
            lost_mark: None,
            jammed: jammed.0,
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

/// Live assets in roster order (ascending id).
pub fn asset_views(query: &AssetQuery) -> Vec<AssetView> {
    let mut views: Vec<AssetView> = query
        .iter()
        .filter(|(_, _, _, _, health)| health.is_alive())
        .map(|(entity, id, info, pos, health)| AssetView {
            entity,
            id: *id,
            position: *pos,
            priority: info.priority,
            health: health.current,
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

/// Centroid of the live assets, `None` when every asset is gone.
pub fn asset_centroid(assets: &[AssetView]) -> Option<Position> {
    Position::centroid(assets.iter().map(|a| &a.position))
}

/// Closest asset to `pos`; ties go to the earlier asset.
pub fn nearest_asset<'a>(pos: &Position, assets: &'a [AssetView]) -> Option<(&'a AssetView, f32)> {
    nearest_by(assets.iter(), |a| pos.distance_to(&a.position))
}

/// Closest drone to `pos`; ties go to the earlier drone.
pub fn nearest_drone<'a>(pos: &Position, drones: &'a [DroneView]) -> Option<(&'a DroneView, f32)> {
    nearest_by(drones.iter(), |d| pos.distance_to(&d.position))
}

fn nearest_by<'a, T>(
    items: impl Iterator<Item = &'a T>,
    distance: impl Fn(&T) -> f32,
) -> Option<(&'a T, f32)> {
    let mut best: Option<(&'a T, f32)> = None;
    for item in items {
        let dist = distance(item);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((item, dist));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: u32, x: f32, y: f32) -> AssetView {
        AssetView {
            entity: Entity::from_raw(100 + id),
            id: AssetId(id),
            position: Position::new(x, y),
            priority: 1.0,
            health: 100.0,
        }
    }

    #[test]
    fn test_nearest_asset_prefers_first_on_tie() {
        let assets = [asset(0, 10.0, 0.0), asset(1, -10.0, 0.0), asset(2, 50.0, 0.0)];
        let (nearest, dist) = nearest_asset(&Position::new(0.0, 0.0), &assets).unwrap();
        assert_eq!(nearest.id, AssetId(0));
        assert!((dist - 10.0).abs() < 0.001);
        assert!(nearest_asset(&Position::default(), &[]).is_none());
    }

    #[test]
    fn test_views_skip_dead_and_sort_by_id() {
        let mut world = World::new();
        world.spawn((DroneBundle::new(5, DroneKind::Interceptor, Position::new(1.0, 0.0)), Friendly));
        world.spawn((DroneBundle::new(2, DroneKind::Bomber, Position::new(2.0, 0.0)), Friendly));
        let mut dead = DroneBundle::new(3, DroneKind::Interceptor, Position::new(3.0, 0.0));
        dead.health.damage(1000.0);
        world.spawn((dead, Friendly));

        let mut state = bevy_ecs::system::SystemState::<FriendlyQuery>::new(&mut world);
        let query = state.get_mut(&mut world);
        let views = friendly_views(&query);
        let ids: Vec<_> = views.iter().map(|v| v.id.0).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(views[0].kind, DroneKind::Bomber);
    }
}
