//! Lost-drone detection and the squad rescue/reconnect protocol.
//!
//! Only runs while communication is up. A friendly that strays farther than
//! `lost_distance` from the swarm centroid records where it was. Squadmates
//! that see a lost neighbor either reconnect it (when close enough) or fly
//! toward the recorded position. One rescue action per drone per tick.

use crate::components::*;
use crate::systems::view::DroneView;

/// What a friendly does for its lost squadmates this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescueAction {
    /// Neighbor is close enough: clear its lost mark.
    Reconnect { neighbor: DroneId },
    /// Fly toward the neighbor's last known position.
    MoveToward { neighbor: DroneId, mark: Position },
}

/// Position to record if `me` has just strayed from the swarm.
pub fn lost_mark_for(me: &DroneView, swarm_centroid: Option<Position>, lost_distance: f32) -> Option<Position> {
    if me.lost_mark.is_some() {
        return None;
    }
    let centroid = swarm_centroid?;
    if me.distance_to(&centroid) > lost_distance {
        Some(me.position)
    } else {
        None
    }
}

/// First lost squadmate in roster order decides the action.
pub fn rescue_action(me: &DroneView, friendlies: &[DroneView], reconnect_radius: f32) -> Option<RescueAction> {
    let lost = friendlies
        .iter()
        .filter(|f| f.id != me.id)
        .find_map(|f| f.lost_mark.map(|mark| (f, mark)))?;
    let (neighbor, mark) = lost;

    if me.distance_to(&neighbor.position) <= reconnect_radius {
        Some(RescueAction::Reconnect { neighbor: neighbor.id })
    } else {
        Some(RescueAction::MoveToward {
            neighbor: neighbor.id,
            mark,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    fn drone(id: u32, x: f32, y: f32) -> DroneView {
        DroneView::new(Entity::from_raw(id), id, DroneKind::Interceptor, Position::new(x, y))
    }

    #[test]
    fn test_marks_only_once_when_far() {
        let mut me = drone(0, 500.0, 0.0);
        let centroid = Some(Position::new(0.0, 0.0));
        assert_eq!(lost_mark_for(&me, centroid, 300.0), Some(Position::new(500.0, 0.0)));

        me.lost_mark = Some(Position::new(400.0, 0.0));
        assert_eq!(lost_mark_for(&me, centroid, 300.0), None);

        let near = drone(1, 100.0, 0.0);
        assert_eq!(lost_mark_for(&near, centroid, 300.0), None);
        assert_eq!(lost_mark_for(&near, None, 300.0), None);
    }

    #[test]
    fn test_rescue_reconnects_or_flies_to_mark() {
        let me = drone(0, 0.0, 0.0);
        let mut lost = drone(1, 30.0, 0.0);
        lost.lost_mark = Some(Position::new(400.0, 0.0));

        assert_eq!(
            rescue_action(&me, &[me, lost], 40.0),
            Some(RescueAction::Reconnect { neighbor: DroneId(1) })
        );

        lost.position = Position::new(380.0, 0.0);
        assert_eq!(
            rescue_action(&me, &[me, lost], 40.0),
            Some(RescueAction::MoveToward {
                neighbor: DroneId(1),
                mark: Position::new(400.0, 0.0)
            })
        );
    }

    #[test]
    fn test_own_mark_is_not_a_rescue() {
        let mut me = drone(0, 0.0, 0.0);
        me.lost_mark = Some(Position::new(0.0, 0.0));
        let other = drone(1, 10.0, 0.0);
        assert_eq!(rescue_action(&me, &[me, other], 40.0), None);
    }
}
