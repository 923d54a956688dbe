//! Movement helpers - explicit per-tick integration and steering.
//!
//! There is no sub-stepping: a drone's velocity is its displacement for the
//! tick, and position advances by exactly that amount.

use crate::components::*;

/// Apply one tick of velocity to a position.
#[inline]
pub fn integrate(pos: &mut Position, vel: &Velocity) {
    pos.x += vel.vx;
    pos.y += vel.vy;
}

/// Head for `goal` at `speed`, or hold once within `snap_tolerance` of it.
pub fn steer_to(from: &Position, goal: &Position, speed: f32, snap_tolerance: f32) -> Velocity {
    if from.distance_to(goal) <= snap_tolerance {
        Velocity::default()
    } else {
        Velocity::toward(from, goal, speed)
    }
}
