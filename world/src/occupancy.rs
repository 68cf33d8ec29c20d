//! Occupancy snapshot builder used by the world crate.

use snake_core::{mapping, Occupant, OccupancySnapshot};

use crate::World;

/// Rebuilds the occupancy grid from scratch.
///
/// Body segments, the apple and the head are mapped onto cells and their
/// flags are combined, so overlapping occupants stay visible. Entities whose
/// position falls outside the board are dropped.
pub(crate) fn build(world: &World) -> OccupancySnapshot {
    let size = world.boundary;
    let mut snapshot = OccupancySnapshot::empty(size);

    for segment in &world.segments {
        if let Some(cell) = mapping::cell_at(segment.position, size) {
            snapshot.mark(cell, Occupant::Body);
        }
    }

    if let Some(apple) = world.apple {
        if let Some(cell) = mapping::cell_at(apple.position, size) {
            snapshot.mark(cell, Occupant::Apple);
        }
    }

    if let Some(cell) = mapping::cell_at(world.head.position, size) {
        snapshot.mark(cell, Occupant::Head);
    }

    snapshot
}
