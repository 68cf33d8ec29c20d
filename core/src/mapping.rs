//! Mapping between continuous world positions and discrete grid cells.
//!
//! World space places the origin at the bottom-left corner of the board with
//! `y` growing upward, while grid rows are counted from the top. A position
//! lying exactly on a cell edge belongs to the cell on the right of (or
//! above) that edge.

use crate::{CellCoord, GridSize, Position};

/// Maps a position onto signed `(column, row)` indices.
///
/// The indices are not bounds-checked; positions outside the board yield
/// negative or oversized indices. A board with a single row always maps to
/// row zero.
#[must_use]
pub fn to_index(position: Position, rows: u32) -> (i64, i64) {
    let column = edge_index(position.x) - 1;
    let row = if rows == 1 {
        0
    } else {
        i64::from(rows) - edge_index(position.y)
    };
    (column, row)
}

/// Returns the centre of the cell in world space.
#[must_use]
pub fn to_position(cell: CellCoord, rows: u32) -> Position {
    Position::new(
        cell.column() as f32 + 0.5,
        rows as f32 - cell.row() as f32 - 0.5,
    )
}

/// Maps a position onto the cell containing it, or `None` when the position
/// falls outside the board.
#[must_use]
pub fn cell_at(position: Position, size: GridSize) -> Option<CellCoord> {
    let (column, row) = to_index(position, size.rows());
    let column = u32::try_from(column).ok()?;
    let row = u32::try_from(row).ok()?;
    let cell = CellCoord::new(column, row);
    size.contains(cell).then_some(cell)
}

// Ceiling of the coordinate, pushed one further when the coordinate sits
// exactly on an integer so edges resolve to the next cell.
fn edge_index(value: f32) -> i64 {
    let ceiling = value.ceil();
    if ceiling == value {
        ceiling as i64 + 1
    } else {
        ceiling as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_centres_round_trip() {
        let size = GridSize::new(4, 5);
        for row in 0..size.rows() {
            for column in 0..size.columns() {
                let cell = CellCoord::new(column, row);
                let position = to_position(cell, size.rows());
                assert_eq!(
                    to_index(position, size.rows()),
                    (i64::from(column), i64::from(row))
                );
                assert_eq!(cell_at(position, size), Some(cell));
            }
        }
    }

    #[test]
    fn row_zero_is_the_top_of_the_board() {
        let position = to_position(CellCoord::new(0, 0), 5);
        assert_eq!(position, Position::new(0.5, 4.5));
    }

    #[test]
    fn edges_belong_to_the_next_cell() {
        assert_eq!(to_index(Position::new(1.0, 0.0), 3), (1, 2));
        assert_eq!(to_index(Position::new(0.999, 0.999), 3), (0, 2));
        assert_eq!(to_index(Position::new(2.0, 3.0), 3), (2, -1));
    }

    #[test]
    fn positions_off_the_board_have_no_cell() {
        let size = GridSize::new(3, 3);
        assert_eq!(to_index(Position::new(-0.5, 1.5), 3), (-1, 1));
        assert_eq!(cell_at(Position::new(-0.5, 1.5), size), None);
        assert_eq!(cell_at(Position::new(1.5, 3.5), size), None);
        assert_eq!(cell_at(Position::new(3.0, 1.5), size), None);
    }

    #[test]
    fn single_row_board_forces_row_zero() {
        assert_eq!(to_index(Position::new(1.5, 0.5), 1).1, 0);
        assert_eq!(to_index(Position::new(1.5, 7.5), 1).1, 0);
    }
}
