//! Electronic jamming.
//!
//! Jamming is not sticky. Every hostile's flag is cleared at the start of a
//! tick, and each friendly re-marks the hostiles inside its bubble during its
//! own update. A jammed hostile cannot fire and crawls at a fraction of its
//! speed for the rest of that tick, and takes a little damage per jammer.

use crate::components::*;
use crate::systems::view::DroneView;
use bevy_ecs::prelude::*;

/// Tick step 2: forget last tick's jamming.
pub fn jam_reset_system(mut query: Query<&mut Jammed, With<Hostile>>) {
    for mut jammed in query.iter_mut() {
        if jammed.0 {
            jammed.0 = false;
        }
    }
}

/// Live hostiles inside `range` of `pos`, in roster order.
pub fn hostiles_in_jamming_range(pos: &Position, hostiles: &[DroneView], range: f32) -> Vec<DroneView> {
    hostiles
        .iter()
        .filter(|h| h.health > 0.0 && h.distance_to(pos) <= range)
        .copied()
        .collect()
}

/// Apply one jammer's effect to a hostile.
pub fn apply_jamming(jammed: &mut Jammed, health: &mut Health, damage: f32) {
    jammed.0 = true;
    health.damage(damage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jam_flags_reset_each_tick() {
        let mut world = World::new();
        let hostile = world
            .spawn((DroneBundle::new(0, DroneKind::Interceptor, Position::default()), Hostile))
            .id();
        world.get_mut::<Jammed>(hostile).unwrap().0 = true;

        let mut schedule = Schedule::default();
        schedule.add_systems(jam_reset_system);
        schedule.run(&mut world);

        assert!(!world.get::<Jammed>(hostile).unwrap().0);
    }

    #[test]
    fn test_range_filter() {
        let near = DroneView::new(Entity::from_raw(1), 1, DroneKind::Bomber, Position::new(50.0, 0.0));
        let far = DroneView::new(Entity::from_raw(2), 2, DroneKind::Bomber, Position::new(150.0, 0.0));
        let hits = hostiles_in_jamming_range(&Position::default(), &[near, far], 100.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, DroneId(1));
    }

    #[test]
    fn test_apply_jamming_marks_and_damages() {
        let mut jammed = Jammed::default();
        let mut health = Health::new(100.0);
        apply_jamming(&mut jammed, &mut health, 0.5);
        assert!(jammed.0);
        assert!((health.current - 99.5).abs() < 1e-4);
    }
}
