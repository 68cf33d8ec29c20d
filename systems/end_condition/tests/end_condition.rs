use snake_core::{CellCoord, Direction, GameStatus};
use snake_system_end_condition::{evaluate, is_failure};
use snake_world::{query, Setup, World};

fn failure(world: &World) -> bool {
    is_failure(
        &query::head(world),
        &query::occupancy(world),
        &query::segment_view(world),
    )
    .expect("body forms a single chain")
}

#[test]
fn head_on_the_tail_cell_is_allowed() {
    let world = World::new(
        Setup::new(5, 5, CellCoord::new(1, 1))
            .with_segment(CellCoord::new(1, 1), Direction::Right)
            .with_segment(CellCoord::new(2, 1), Direction::Down)
            .with_segment(CellCoord::new(2, 2), Direction::Left),
    );

    assert!(!failure(&world));
}

#[test]
fn head_on_any_other_body_cell_is_a_loss() {
    let world = World::new(
        Setup::new(5, 5, CellCoord::new(1, 1))
            .with_segment(CellCoord::new(0, 1), Direction::Right)
            .with_segment(CellCoord::new(1, 1), Direction::Right)
            .with_segment(CellCoord::new(2, 1), Direction::Down)
            .with_segment(CellCoord::new(2, 2), Direction::Left),
    );

    assert!(failure(&world));
    assert_eq!(
        evaluate(
            &query::head(&world),
            &query::occupancy(&world),
            &query::segment_view(&world),
        ),
        Ok(GameStatus::Lost)
    );
}

#[test]
fn win_takes_precedence_over_loss() {
    // The head sits on a body cell that is not the tail, yet nothing is empty.
    let world = World::new(
        Setup::new(2, 1, CellCoord::new(1, 0))
            .with_segment(CellCoord::new(0, 0), Direction::Right)
            .with_segment(CellCoord::new(1, 0), Direction::Right),
    );

    assert_eq!(
        evaluate(
            &query::head(&world),
            &query::occupancy(&world),
            &query::segment_view(&world),
        ),
        Ok(GameStatus::Won)
    );
}
