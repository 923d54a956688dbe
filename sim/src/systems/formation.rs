//! Formation slot geometry and flocking separation for friendly drones.
//!
//! Slots are offsets from the asset centroid, derived from a drone's index in
//! the friendly roster and the roster size. The y axis grows toward the
//! defended ground, so "forward" (toward the hostile spawn edge) is -y.

use crate::components::*;
use crate::config::{Formation, SimConfig};
use crate::systems::view::DroneView;
use std::f32::consts::TAU;

/// Offset of slot `index` in a roster of `roster_size` for `formation`.
///
/// `orbit_phase` only matters for `Circle`, which rotates as it advances.
pub fn slot_offset(
    formation: Formation,
    index: usize,
    roster_size: usize,
    spacing: f32,
    orbit_radius: f32,
    orbit_phase: f32,
) -> (f32, f32) {
    let roster = roster_size.max(1);
    let i = index as f32;

    match formation {
        Formation::Circle => {
            let angle = (i / roster as f32) * TAU + orbit_phase;
            (angle.cos() * orbit_radius, angle.sin() * orbit_radius)
        }
        Formation::Arrowhead => {
            if index == 0 {
                return (0.0, -spacing);
            }
            // 1 left, 2 right, 3 left (second row), ...
            let row = ((index + 1) / 2) as f32;
            let side = if index % 2 == 1 { -1.0 } else { 1.0 };
            (side * row * spacing, -spacing + row * spacing)
        }
        Formation::Spearhead => {
            let row = triangular_row(index);
            let first_in_row = row * (row + 1) / 2;
            let col = (index - first_in_row) as f32;
            let row = row as f32;
            ((col - row / 2.0) * spacing, -spacing + row * spacing)
        }
        Formation::DoubleFile => {
            let row = (index / 2) as f32;
            let rows = ((roster + 1) / 2) as f32;
            let side = if index % 2 == 0 { -0.5 } else { 0.5 };
            (side * spacing, (row - (rows - 1.0) / 2.0) * spacing)
        }
        Formation::ExtendedLine => ((i - roster_size as f32 / 2.0) * spacing, 0.0),
    }
}

/// Row of `index` in a triangular packing (row r holds r + 1 slots).
fn triangular_row(index: usize) -> usize {
    let mut row = (((8 * index + 1) as f64).sqrt() as usize).saturating_sub(1) / 2;
    // Float rounding near perfect squares.
    while (row + 1) * (row + 2) / 2 <= index {
        row += 1;
    }
    while row > 0 && row * (row + 1) / 2 > index {
        row -= 1;
    }
    row
}

/// World position of the slot for `index`, anchored on the asset centroid.
pub fn slot_position(
    centroid: &Position,
    formation: Formation,
    index: usize,
    roster_size: usize,
    orbit_phase: f32,
    config: &SimConfig,
) -> Position {
    let (dx, dy) = slot_offset(
        formation,
        index,
        roster_size,
        config.formation_spacing,
        config.orbit_radius,
        orbit_phase,
    );
    centroid.offset(dx, dy)
}

/// Defensive perimeter post for a drone that declined an engagement.
pub fn defensive_position(centroid: &Position, index: usize, roster_size: usize, radius: f32) -> Position {
    let angle = (index as f32 / roster_size.max(1) as f32) * TAU;
    centroid.offset(angle.cos() * radius, angle.sin() * radius)
}

/// Positional push away from every other friendly inside the separation radius.
///
/// Each neighbor contributes `strength * overlap` along the line between the
/// two drones, where `overlap` is the fraction of the radius they intrude.
pub fn separation_correction(
    me: DroneId,
    position: &Position,
    neighbors: &[DroneView],
    radius: f32,
    strength: f32,
) -> (f32, f32) {
    if radius <= 0.0 {
        return (0.0, 0.0);
    }
    let mut push_x = 0.0;
    let mut push_y = 0.0;
    for other in neighbors.iter().filter(|n| n.id != me) {
        let dx = position.x - other.position.x;
        let dy = position.y - other.position.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > 0.001 && dist < radius {
            let overlap = (radius - dist) / radius;
            push_x += (dx / dist) * overlap * strength;
            push_y += (dy / dist) * overlap * strength;
        }
    }
    (push_x, push_y)
}
