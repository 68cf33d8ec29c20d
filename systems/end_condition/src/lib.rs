#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Win and loss detection.

use snake_core::{
    mapping, ContractViolation, GameStatus, HeadSnapshot, Occupant, OccupancySnapshot,
    SegmentView,
};
use snake_system_trailing::infer_tail;

/// Reports whether the snake covers the entire board: no cell is empty and
/// no cell holds only the apple.
#[must_use]
pub fn is_success(snapshot: &OccupancySnapshot) -> bool {
    snapshot
        .iter()
        .all(|(_, flags)| !flags.is_empty() && !flags.is_only(Occupant::Apple))
}

/// Reports whether the head left the board or ran into its own body.
///
/// The head may share a cell with the tail, because the tail vacates that
/// cell while trailing on the same tick. Only the first head-and-body cell in
/// row-major order is examined.
pub fn is_failure(
    head: &HeadSnapshot,
    snapshot: &OccupancySnapshot,
    segments: &SegmentView,
) -> Result<bool, ContractViolation> {
    let size = snapshot.size();
    if !size.contains_position(head.position) {
        return Ok(true);
    }

    let Some((cell, _)) = snapshot.iter().find(|(_, flags)| flags.is_collision()) else {
        return Ok(false);
    };

    let tail = infer_tail(segments, size)?;
    let tail_cell = segments
        .iter()
        .find(|segment| segment.id == tail)
        .and_then(|segment| mapping::cell_at(segment.position, size));
    Ok(tail_cell != Some(cell))
}

/// Resolves the status of the game from the current state.
///
/// Success is checked before failure.
pub fn evaluate(
    head: &HeadSnapshot,
    snapshot: &OccupancySnapshot,
    segments: &SegmentView,
) -> Result<GameStatus, ContractViolation> {
    if is_success(snapshot) {
        return Ok(GameStatus::Won);
    }
    if is_failure(head, snapshot, segments)? {
        return Ok(GameStatus::Lost);
    }
    Ok(GameStatus::Running)
}
