#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the snake engine.
//!
//! The world is the entity store the gameplay systems operate on. It holds
//! exactly one head, one boundary and one input state as plain fields, an
//! arena of body segments ordered by creation, and at most one apple.

mod occupancy;

use snake_core::{
    mapping, CellCoord, Command, Direction, Event, GridSize, InputState, Position, SegmentId,
    Velocity,
};

const DEFAULT_SPEED: f32 = 1.0;
const DEFAULT_SPEED_UP_FACTOR: f32 = 1.0;

/// Initial board layout supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    columns: u32,
    rows: u32,
    head: CellCoord,
    speed: f32,
    speed_up_factor: f32,
    apple: Option<CellCoord>,
    body: Vec<(CellCoord, Direction)>,
}

impl Setup {
    /// Creates a setup for a `columns x rows` board with the head centred on
    /// the provided cell, no apple and an empty body.
    #[must_use]
    pub fn new(columns: u32, rows: u32, head: CellCoord) -> Self {
        Self {
            columns,
            rows,
            head,
            speed: DEFAULT_SPEED,
            speed_up_factor: DEFAULT_SPEED_UP_FACTOR,
            apple: None,
            body: Vec::new(),
        }
    }

    /// Sets the head's base speed in cells per second.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the multiplier applied while speed-up is held.
    #[must_use]
    pub fn with_speed_up_factor(mut self, factor: f32) -> Self {
        self.speed_up_factor = factor;
        self
    }

    /// Places the apple on the provided cell.
    #[must_use]
    pub fn with_apple(mut self, cell: CellCoord) -> Self {
        self.apple = Some(cell);
        self
    }

    /// Appends a body segment occupying `cell` that last travelled `direction`.
    #[must_use]
    pub fn with_segment(mut self, cell: CellCoord, direction: Direction) -> Self {
        self.body.push((cell, direction));
        self
    }
}

/// Represents the authoritative snake world state.
#[derive(Debug)]
pub struct World {
    boundary: GridSize,
    head: Head,
    segments: Vec<Segment>,
    apple: Option<Apple>,
    input: InputState,
    next_segment_id: u32,
}

impl World {
    /// Creates a new world from the provided setup.
    #[must_use]
    pub fn new(setup: Setup) -> Self {
        let boundary = GridSize::new(setup.columns, setup.rows);
        let rows = boundary.rows();
        let mut world = Self {
            boundary,
            head: Head {
                position: mapping::to_position(setup.head, rows),
                velocity: Velocity::ZERO,
                speed: setup.speed,
                speed_up_factor: setup.speed_up_factor,
            },
            segments: Vec::with_capacity(setup.body.len()),
            apple: setup.apple.map(|cell| Apple {
                position: mapping::to_position(cell, rows),
            }),
            input: InputState::default(),
            next_segment_id: 0,
        };
        for (cell, direction) in setup.body {
            let _ = world.spawn_segment(cell, direction);
        }
        world
    }

    fn spawn_segment(&mut self, cell: CellCoord, direction: Direction) -> SegmentId {
        let id = SegmentId::new(self.next_segment_id);
        self.next_segment_id = self.next_segment_id.saturating_add(1);
        self.segments.push(Segment {
            id,
            position: mapping::to_position(cell, self.boundary.rows()),
            direction,
        });
        id
    }

    fn segment_index(&self, segment: SegmentId) -> Option<usize> {
        self.segments.iter().position(|candidate| candidate.id == segment)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::IntegrateMotion { dt } => {
            let seconds = dt.as_secs_f32();
            let from = world.head.position;
            let to = Position::new(
                from.x + world.head.velocity.x * seconds,
                from.y + world.head.velocity.y * seconds,
            );
            if to != from {
                world.head.position = to;
                out_events.push(Event::HeadMoved { from, to });
            }
        }
        Command::SetVelocity { velocity } => {
            world.head.velocity = velocity;
            out_events.push(Event::VelocityChanged { velocity });
        }
        Command::PressDirection { direction } => {
            world.input.last_direction = Some(direction);
            out_events.push(Event::DirectionPressed { direction });
        }
        Command::SetSpeedUp { held } => {
            if world.input.speed_up_held != held {
                world.input.speed_up_held = held;
                out_events.push(Event::SpeedUpChanged { held });
            }
        }
        Command::SpawnSegment { cell, direction } => {
            let segment = world.spawn_segment(cell, direction);
            out_events.push(Event::SegmentSpawned {
                segment,
                cell,
                direction,
            });
        }
        Command::DespawnSegment { segment } => {
            if let Some(index) = world.segment_index(segment) {
                let removed = world.segments.remove(index);
                out_events.push(Event::SegmentDespawned {
                    segment,
                    position: removed.position,
                });
            }
        }
        Command::SpawnApple { cell } => {
            if world.apple.is_none() {
                world.apple = Some(Apple {
                    position: mapping::to_position(cell, world.boundary.rows()),
                });
                out_events.push(Event::AppleSpawned { cell });
            }
        }
        Command::RelocateApple { cell } => {
            let rows = world.boundary.rows();
            if let Some(apple) = world.apple.as_mut() {
                apple.position = mapping::to_position(cell, rows);
                out_events.push(Event::AppleRelocated { cell });
            }
        }
        Command::DespawnApple => {
            if world.apple.take().is_some() {
                out_events.push(Event::AppleDespawned);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snake_core::{
        AppleSnapshot, GridSize, HeadSnapshot, InputState, OccupancySnapshot, SegmentSnapshot,
        SegmentView,
    };

    use super::World;

    /// Dimensions of the board.
    #[must_use]
    pub fn boundary(world: &World) -> GridSize {
        world.boundary
    }

    /// Captures the head's position, velocity and speed settings.
    #[must_use]
    pub fn head(world: &World) -> HeadSnapshot {
        HeadSnapshot {
            position: world.head.position,
            velocity: world.head.velocity,
            speed: world.head.speed,
            speed_up_factor: world.head.speed_up_factor,
        }
    }

    /// Captures a read-only view of the body segments.
    #[must_use]
    pub fn segment_view(world: &World) -> SegmentView {
        SegmentView::from_snapshots(
            world
                .segments
                .iter()
                .map(|segment| SegmentSnapshot {
                    id: segment.id,
                    position: segment.position,
                    direction: segment.direction,
                })
                .collect(),
        )
    }

    /// Captures the apple, if one exists.
    #[must_use]
    pub fn apple(world: &World) -> Option<AppleSnapshot> {
        world.apple.map(|apple| AppleSnapshot {
            position: apple.position,
        })
    }

    /// Current player input.
    #[must_use]
    pub fn input(world: &World) -> InputState {
        world.input
    }

    /// Score of the running game, equal to the number of body segments.
    #[must_use]
    pub fn score(world: &World) -> usize {
        world.segments.len()
    }

    /// Reports whether the speed-up modifier is held.
    #[must_use]
    pub fn is_speeding_up(world: &World) -> bool {
        world.input.speed_up_held
    }

    /// Rebuilds the occupancy grid from the live entity positions.
    #[must_use]
    pub fn occupancy(world: &World) -> OccupancySnapshot {
        super::occupancy::build(world)
    }
}

#[derive(Clone, Copy, Debug)]
struct Head {
    position: Position,
    velocity: Velocity,
    speed: f32,
    speed_up_factor: f32,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    id: SegmentId,
    position: Position,
    direction: Direction,
}

#[derive(Clone, Copy, Debug)]
struct Apple {
    position: Position,
}
