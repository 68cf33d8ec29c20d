#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Trailing system that grows or shrinks the snake's body as the head moves.
//!
//! Segments carry no links to their neighbours. The tail is recovered by
//! projecting every segment one cell along its own travel direction: each
//! projection claims the cell the next segment (or the head) occupies, so the
//! only segment whose cell nobody claims is the end of the chain.

use log::{debug, trace};
use snake_core::{
    mapping, CellCoord, Command, ContractViolation, Direction, GridSize, OccupancySnapshot,
    Position, SegmentId, SegmentView,
};

/// Identifies the tail of the body.
///
/// The view must not be empty. Projections that leave the board claim
/// nothing. Finding no unclaimed segment, or more than one, means the stored
/// directions do not describe a single chain.
pub fn infer_tail(segments: &SegmentView, size: GridSize) -> Result<SegmentId, ContractViolation> {
    let links: Vec<Link> = segments
        .iter()
        .map(|segment| Link {
            position: segment.position,
            direction: segment.direction,
        })
        .collect();
    let index = unclaimed_link(&links, size)?;
    segments
        .iter()
        .nth(index)
        .map(|segment| segment.id)
        .ok_or(ContractViolation::MissingTail)
}

/// Pure system that turns head displacement into segment commands.
#[derive(Debug, Default)]
pub struct Trailing;

impl Trailing {
    /// Compares the head's cell across two snapshots and emits the segment
    /// commands that make the body follow.
    ///
    /// Nothing happens while the head stays inside its cell. Once it crosses
    /// into a neighbouring cell a segment is laid on the vacated cell, tagged
    /// with the travel direction, and unless `ate_apple` is set the tail is
    /// removed so the length stays constant. An empty body only grows when
    /// the apple was eaten.
    pub fn handle(
        &self,
        previous: &OccupancySnapshot,
        current: &OccupancySnapshot,
        segments: &SegmentView,
        ate_apple: bool,
        out: &mut Vec<Command>,
    ) -> Result<(), ContractViolation> {
        if previous == current {
            return Ok(());
        }

        let from = previous
            .head_cell()
            .ok_or(ContractViolation::HeadOffGrid)?;
        let to = current.head_cell().ok_or(ContractViolation::HeadOffGrid)?;
        if from == to {
            return Ok(());
        }

        let direction =
            Direction::between(from, to).ok_or(ContractViolation::NonUnitDisplacement { from, to })?;
        // A single-cell step leaves the vacated cell directly behind the head.
        let neck = from;
        trace!("head travelled {direction:?} from {from} to {to}");

        if segments.is_empty() {
            if ate_apple {
                out.push(Command::SpawnSegment {
                    cell: neck,
                    direction,
                });
            }
            return Ok(());
        }

        // The tail is resolved before the neck joins the chain: once the head
        // has stepped onto the tail's cell, the new neck would claim it.
        let tail = if ate_apple {
            None
        } else {
            Some(infer_tail(segments, current.size())?)
        };

        out.push(Command::SpawnSegment {
            cell: neck,
            direction,
        });
        if let Some(tail) = tail {
            debug!("moving tail {} to neck {neck}", tail.get());
            out.push(Command::DespawnSegment { segment: tail });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Link {
    position: Position,
    direction: Direction,
}

fn unclaimed_link(links: &[Link], size: GridSize) -> Result<usize, ContractViolation> {
    let claimed: Vec<CellCoord> = links
        .iter()
        .filter_map(|link| mapping::cell_at(link.position.offset(link.direction, 1.0), size))
        .collect();

    let mut unclaimed = links.iter().enumerate().filter(|(_, link)| {
        mapping::cell_at(link.position, size).map_or(true, |cell| !claimed.contains(&cell))
    });

    let Some((index, _)) = unclaimed.next() else {
        return Err(ContractViolation::MissingTail);
    };
    let extra = unclaimed.count();
    if extra > 0 {
        return Err(ContractViolation::AmbiguousTail { count: extra + 1 });
    }
    Ok(index)
}
