use std::time::Duration;

use snake_core::{CellCoord, Command, ContractViolation, Direction, Event, Velocity};
use snake_system_trailing::{infer_tail, Trailing};
use snake_world::{self as world, query, Setup, World};

fn move_head(world: &mut World, direction: Direction, cells: f32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SetVelocity {
            velocity: Velocity::along(direction, cells),
        },
        &mut events,
    );
    world::apply(
        world,
        Command::IntegrateMotion {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
}

fn run_trailing(world: &mut World, previous: &snake_core::OccupancySnapshot, ate_apple: bool) -> Vec<Event> {
    let current = query::occupancy(world);
    let segments = query::segment_view(world);
    let mut commands = Vec::new();
    Trailing
        .handle(previous, &current, &segments, ate_apple, &mut commands)
        .expect("trailing succeeds");

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn three_segment_world() -> World {
    World::new(
        Setup::new(6, 3, CellCoord::new(3, 1))
            .with_segment(CellCoord::new(0, 1), Direction::Right)
            .with_segment(CellCoord::new(1, 1), Direction::Right)
            .with_segment(CellCoord::new(2, 1), Direction::Right),
    )
}

#[test]
fn partial_cell_motion_changes_nothing() {
    let mut world = three_segment_world();
    let previous = query::occupancy(&world);
    move_head(&mut world, Direction::Right, 0.4);

    let events = run_trailing(&mut world, &previous, false);

    assert!(events.is_empty());
    assert_eq!(query::score(&world), 3);
}

#[test]
fn crossing_a_cell_moves_the_tail_to_the_neck() {
    let mut world = three_segment_world();
    let previous = query::occupancy(&world);
    move_head(&mut world, Direction::Right, 1.0);

    let events = run_trailing(&mut world, &previous, false);

    assert_eq!(query::score(&world), 3);
    assert!(events.contains(&Event::SegmentSpawned {
        segment: snake_core::SegmentId::new(3),
        cell: CellCoord::new(3, 1),
        direction: Direction::Right,
    }));
    let cells: Vec<_> = query::segment_view(&world)
        .iter()
        .map(|segment| snake_core::mapping::cell_at(segment.position, query::boundary(&world)))
        .collect();
    assert!(!cells.contains(&Some(CellCoord::new(0, 1))));
    assert!(cells.contains(&Some(CellCoord::new(3, 1))));
}

#[test]
fn eating_grows_by_exactly_one_segment() {
    let mut world = three_segment_world();
    let previous = query::occupancy(&world);
    move_head(&mut world, Direction::Right, 1.0);

    let events = run_trailing(&mut world, &previous, true);

    assert_eq!(query::score(&world), 4);
    assert_eq!(events.len(), 1);
}

#[test]
fn empty_body_grows_behind_the_head_only_when_fed() {
    let mut world = World::new(Setup::new(5, 5, CellCoord::new(2, 2)));
    let previous = query::occupancy(&world);
    move_head(&mut world, Direction::Up, 1.0);

    let unfed = run_trailing(&mut world, &previous, false);
    assert!(unfed.is_empty());

    let fed = run_trailing(&mut world, &previous, true);
    assert_eq!(
        fed,
        vec![Event::SegmentSpawned {
            segment: snake_core::SegmentId::new(0),
            cell: CellCoord::new(2, 2),
            direction: Direction::Up,
        }]
    );
}

#[test]
fn turning_body_keeps_a_single_tail() {
    let mut world = three_segment_world();
    let mut previous = query::occupancy(&world);

    for direction in [Direction::Right, Direction::Down, Direction::Left] {
        move_head(&mut world, direction, 1.0);
        let _ = run_trailing(&mut world, &previous, false);
        previous = query::occupancy(&world);
        assert_eq!(query::score(&world), 3);
        assert!(infer_tail(&query::segment_view(&world), query::boundary(&world)).is_ok());
    }
}

#[test]
fn jumping_two_cells_is_a_contract_violation() {
    let mut world = three_segment_world();
    let previous = query::occupancy(&world);
    move_head(&mut world, Direction::Right, 2.0);

    let current = query::occupancy(&world);
    let mut commands = Vec::new();
    let result = Trailing.handle(
        &previous,
        &current,
        &query::segment_view(&world),
        false,
        &mut commands,
    );

    assert_eq!(
        result,
        Err(ContractViolation::NonUnitDisplacement {
            from: CellCoord::new(3, 1),
            to: CellCoord::new(5, 1),
        })
    );
    assert!(commands.is_empty());
}
