#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering system that turns player input into the head's velocity.

use log::trace;
use snake_core::{
    mapping, Command, Direction, HeadSnapshot, InputState, Occupant, OccupancySnapshot,
    SegmentView, Velocity,
};

/// Reports whether moving the head toward `direction` would reverse it into
/// its own neck.
///
/// A neighbouring body cell is only the neck when a segment on it travelled
/// the exact opposite way; any other segment there is a crossing part of the
/// body and does not block the turn. When the head is not on the board no
/// turn is allowed.
#[must_use]
pub fn is_reversal(
    direction: Direction,
    snapshot: &OccupancySnapshot,
    segments: &SegmentView,
) -> bool {
    let Some(head_cell) = snapshot.head_cell() else {
        return true;
    };
    let size = snapshot.size();
    let Some(neighbour) = head_cell.step(direction, size) else {
        return false;
    };
    if !snapshot.flags(neighbour).contains(Occupant::Body) {
        return false;
    }

    segments.iter().any(|segment| {
        segment.direction == direction.opposite()
            && mapping::cell_at(segment.position, size) == Some(neighbour)
    })
}

/// Pure system that emits velocity changes for the head.
#[derive(Debug, Default)]
pub struct Steering;

impl Steering {
    /// Applies the last pressed direction to the head's velocity.
    ///
    /// Motion is axis-aligned at the head's base speed, scaled while
    /// speed-up is held. A reversal into the neck leaves the velocity as it
    /// was.
    pub fn handle(
        &self,
        input: InputState,
        head: &HeadSnapshot,
        snapshot: &OccupancySnapshot,
        segments: &SegmentView,
        out: &mut Vec<Command>,
    ) {
        let Some(direction) = input.last_direction else {
            return;
        };

        if is_reversal(direction, snapshot, segments) {
            trace!("ignoring reversal toward {direction:?}");
            return;
        }

        let speed = if input.speed_up_held {
            head.speed * head.speed_up_factor
        } else {
            head.speed
        };
        let velocity = Velocity::along(direction, speed);
        if velocity != head.velocity {
            out.push(Command::SetVelocity { velocity });
        }
    }
}
