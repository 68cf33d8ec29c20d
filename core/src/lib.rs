#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake gameplay engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! changed. Systems read immutable snapshots such as [`OccupancySnapshot`] and
//! [`SegmentView`] and respond exclusively with new command batches.
//!
//! The snake's body carries no successor or predecessor links. Every segment
//! records only its position and the direction it last travelled, so chain
//! structure (which segment is the tail, which one is the neck) is inferred
//! from the occupancy grid on every tick.

use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    time::Duration,
};

use serde::{Deserialize, Serialize};

pub mod mapping;

/// Cardinal travel directions available to the snake.
///
/// `Up` points toward increasing world `y`, which is toward decreasing grid
/// row indices because row zero is the top of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward the top of the board.
    Up,
    /// Movement toward the bottom of the board.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset of the direction expressed in world space.
    #[must_use]
    pub const fn world_offset(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, 1.0),
            Self::Down => (0.0, -1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }

    /// Resolves the direction of a single-cell step between two cells.
    ///
    /// Returns `None` unless exactly one axis differs and it differs by
    /// exactly one cell.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if to.row() > from.row() {
            Some(Self::Down)
        } else {
            Some(Self::Up)
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the top row of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring cell in the provided direction, if it lies
    /// within the grid.
    #[must_use]
    pub fn step(self, direction: Direction, size: GridSize) -> Option<Self> {
        let neighbour = match direction {
            Direction::Up => Self::new(self.column, self.row.checked_sub(1)?),
            Direction::Down => Self::new(self.column, self.row.checked_add(1)?),
            Direction::Left => Self::new(self.column.checked_sub(1)?, self.row),
            Direction::Right => Self::new(self.column.checked_add(1)?, self.row),
        };
        size.contains(neighbour).then_some(neighbour)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dimensions of the board measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new board size.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies within the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether a continuous position lies within
    /// `[0, columns) x [0, rows)`.
    #[must_use]
    pub fn contains_position(&self, position: Position) -> bool {
        position.x >= 0.0
            && position.x < self.columns as f32
            && position.y >= 0.0
            && position.y < self.rows as f32
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cell_at(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        let column = u32::try_from(index % width).unwrap_or(u32::MAX);
        let row = u32::try_from(index / width).unwrap_or(u32::MAX);
        CellCoord::new(column, row)
    }
}

/// Continuous world-space position. `y` increases upward.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate measured in cells.
    pub x: f32,
    /// Vertical coordinate measured in cells.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the position displaced `distance` units along `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.world_offset();
        Self::new(self.x + dx * distance, self.y + dy * distance)
    }
}

/// World-space velocity of the head measured in cells per second.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Velocity {
    /// Velocity of a stationary head.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new velocity.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` along a single axis; the other axis is zero.
    #[must_use]
    pub fn along(direction: Direction, speed: f32) -> Self {
        let (dx, dy) = direction.world_offset();
        Self::new(dx * speed, dy * speed)
    }
}

/// Unique identifier assigned to a body segment.
///
/// Identifiers grow with creation order and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(u32);

impl SegmentId {
    /// Creates a new segment identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of occupant that can be recorded in a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// The snake's head.
    Head,
    /// Any body segment.
    Body,
    /// The apple.
    Apple,
}

/// Set of occupants recorded in a single cell.
///
/// Overlaps such as head and body, or head and apple, are meaningful signals
/// consumed by the gameplay systems rather than malfunctions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CellFlags {
    head: bool,
    body: bool,
    apple: bool,
}

impl CellFlags {
    /// Flag set describing an unoccupied cell.
    pub const EMPTY: Self = Self {
        head: false,
        body: false,
        apple: false,
    };

    /// Flag set holding exactly one occupant.
    #[must_use]
    pub const fn only(occupant: Occupant) -> Self {
        Self::EMPTY.with(occupant)
    }

    /// Returns a copy of the set with the occupant added.
    #[must_use]
    pub const fn with(self, occupant: Occupant) -> Self {
        match occupant {
            Occupant::Head => Self { head: true, ..self },
            Occupant::Body => Self { body: true, ..self },
            Occupant::Apple => Self {
                apple: true,
                ..self
            },
        }
    }

    /// Adds the occupant to the set.
    pub fn insert(&mut self, occupant: Occupant) {
        *self = self.with(occupant);
    }

    /// Reports whether the occupant is recorded in the set.
    #[must_use]
    pub const fn contains(&self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Head => self.head,
            Occupant::Body => self.body,
            Occupant::Apple => self.apple,
        }
    }

    /// Reports whether the set holds the occupant and nothing else.
    #[must_use]
    pub fn is_only(&self, occupant: Occupant) -> bool {
        *self == Self::only(occupant)
    }

    /// Reports whether no occupant is recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.head && !self.body && !self.apple
    }

    /// Reports whether the head shares the cell with a body segment.
    #[must_use]
    pub const fn is_collision(&self) -> bool {
        self.head && self.body
    }

    fn glyph(self) -> char {
        match (self.head, self.body, self.apple) {
            (false, false, false) => '.',
            (true, false, false) => 'H',
            (false, true, false) => 'o',
            (false, false, true) => '@',
            (true, true, false) => 'X',
            (true, false, true) => '*',
            (false, true, true) => '%',
            (true, true, true) => '#',
        }
    }
}

impl BitOr for CellFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            head: self.head || rhs.head,
            body: self.body || rhs.body,
            apple: self.apple || rhs.apple,
        }
    }
}

impl BitOrAssign for CellFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// Dense occupancy grid rebuilt from live entity positions every tick.
///
/// Cells are stored in row-major order starting at the top-left cell, which
/// is also the order every scan over the grid observes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancySnapshot {
    size: GridSize,
    cells: Vec<CellFlags>,
}

impl OccupancySnapshot {
    /// Creates a snapshot with every cell empty.
    #[must_use]
    pub fn empty(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![CellFlags::EMPTY; size.cell_count()],
        }
    }

    /// Dimensions of the captured board.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Records an occupant in the cell. Cells outside the board are ignored.
    pub fn mark(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some(slot) = self
            .size
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
        {
            slot.insert(occupant);
        }
    }

    /// Returns the flags recorded for the cell, or an empty set when the cell
    /// lies outside the board.
    #[must_use]
    pub fn flags(&self, cell: CellCoord) -> CellFlags {
        self.size
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellFlags::EMPTY)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellFlags)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, flags)| (self.size.cell_at(index), *flags))
    }

    /// First cell, in row-major order, that records the head.
    #[must_use]
    pub fn head_cell(&self) -> Option<CellCoord> {
        self.iter()
            .find(|(_, flags)| flags.contains(Occupant::Head))
            .map(|(cell, _)| cell)
    }
}

impl fmt::Display for OccupancySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.size.columns()).unwrap_or(0);
        if width == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(width) {
            for flags in row {
                write!(f, "{}", flags.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Immutable representation of the head's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadSnapshot {
    /// Continuous position of the head.
    pub position: Position,
    /// Current velocity of the head.
    pub velocity: Velocity,
    /// Base speed in cells per second.
    pub speed: f32,
    /// Multiplier applied to the speed while speed-up is held.
    pub speed_up_factor: f32,
}

/// Immutable representation of a single body segment used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSnapshot {
    /// Identifier assigned to the segment by the world.
    pub id: SegmentId,
    /// Continuous position of the segment.
    pub position: Position,
    /// Direction the segment travelled when it was laid down.
    pub direction: Direction,
}

/// Read-only snapshot describing every body segment.
#[derive(Clone, Debug, Default)]
pub struct SegmentView {
    snapshots: Vec<SegmentSnapshot>,
}

impl SegmentView {
    /// Creates a new segment view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SegmentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured segments in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SegmentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the apple used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppleSnapshot {
    /// Continuous position of the apple.
    pub position: Position,
}

/// Player input recorded by the edge-triggered input setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InputState {
    /// Most recently pressed movement direction, if any.
    pub last_direction: Option<Direction>,
    /// Whether the speed-up modifier is currently held.
    pub speed_up_held: bool,
}

/// Lifecycle of a single game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    /// Ticks advance the game.
    #[default]
    Running,
    /// The snake covers the entire board. Terminal.
    Won,
    /// The head left the board or crossed its own body. Terminal.
    Lost,
}

impl GameStatus {
    /// Reports whether the status absorbs every further tick.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Broken invariants detected while advancing a tick.
///
/// None of these are recoverable: they signal that state established outside
/// the gameplay systems is inconsistent, and the tick that found them must not
/// be retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    /// The head moved by something other than a single cell along one axis.
    #[error("head moved from {from} to {to}, which is not a single-cell step")]
    NonUnitDisplacement {
        /// Cell occupied by the head on the previous tick.
        from: CellCoord,
        /// Cell occupied by the head on the current tick.
        to: CellCoord,
    },
    /// Every body segment is claimed by another segment's projection.
    #[error("no body segment qualifies as the tail")]
    MissingTail,
    /// More than one body segment is unclaimed by the projections.
    #[error("{count} body segments qualify as the tail")]
    AmbiguousTail {
        /// Number of unclaimed segments.
        count: usize,
    },
    /// The head is absent from an occupancy snapshot that must contain it.
    #[error("head is not on the board")]
    HeadOffGrid,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Integrates the head's velocity over the elapsed time.
    IntegrateMotion {
        /// Duration of simulated time that elapsed.
        dt: Duration,
    },
    /// Replaces the head's velocity.
    SetVelocity {
        /// Velocity the head should adopt.
        velocity: Velocity,
    },
    /// Records a movement key press.
    PressDirection {
        /// Direction that was pressed.
        direction: Direction,
    },
    /// Records a press or release of the speed-up modifier.
    SetSpeedUp {
        /// Whether the modifier is held after the edge.
        held: bool,
    },
    /// Creates a body segment centred on the cell.
    SpawnSegment {
        /// Cell the segment occupies.
        cell: CellCoord,
        /// Direction the segment travelled.
        direction: Direction,
    },
    /// Destroys a body segment.
    DespawnSegment {
        /// Identifier of the segment to remove.
        segment: SegmentId,
    },
    /// Creates the apple when none exists.
    SpawnApple {
        /// Cell the apple occupies.
        cell: CellCoord,
    },
    /// Moves the existing apple.
    RelocateApple {
        /// Cell the apple moves to.
        cell: CellCoord,
    },
    /// Destroys the apple.
    DespawnApple,
}

/// Events reported by the world and the orchestrator after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The head's position was integrated.
    HeadMoved {
        /// Position before integration.
        from: Position,
        /// Position after integration.
        to: Position,
    },
    /// The head adopted a new velocity.
    VelocityChanged {
        /// Velocity now in effect.
        velocity: Velocity,
    },
    /// A movement key press was recorded.
    DirectionPressed {
        /// Direction that was pressed.
        direction: Direction,
    },
    /// The speed-up modifier changed state.
    SpeedUpChanged {
        /// Whether the modifier is held.
        held: bool,
    },
    /// A body segment was created.
    SegmentSpawned {
        /// Identifier allocated by the world.
        segment: SegmentId,
        /// Cell the segment occupies.
        cell: CellCoord,
        /// Direction the segment travelled.
        direction: Direction,
    },
    /// A body segment was destroyed.
    SegmentDespawned {
        /// Identifier of the removed segment.
        segment: SegmentId,
        /// Position the segment occupied.
        position: Position,
    },
    /// The apple was created.
    AppleSpawned {
        /// Cell the apple occupies.
        cell: CellCoord,
    },
    /// The apple moved.
    AppleRelocated {
        /// Cell the apple now occupies.
        cell: CellCoord,
    },
    /// The apple was destroyed.
    AppleDespawned,
    /// The head consumed the apple.
    AppleEaten {
        /// Cell where the apple was consumed.
        cell: CellCoord,
    },
    /// The game reached a terminal status.
    StatusChanged {
        /// Status now in effect.
        status: GameStatus,
    },
}
