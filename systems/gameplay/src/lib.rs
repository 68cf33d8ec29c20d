#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestrator that sequences the gameplay systems.
//!
//! Each call to [`Gameplay::advance`] runs one tick to completion:
//!
//! 1. evaluate win and loss on the state left by the previous tick;
//! 2. detect apple consumption, trail the body, respawn the apple;
//! 3. steer the head from the player's input;
//! 4. retain the occupancy snapshot as the baseline for the next tick;
//! 5. destroy any body segment sharing a cell with the head.
//!
//! The order is load-bearing. The retained snapshot must include this tick's
//! trailing but must be captured before the next motion step, otherwise the
//! displacement seen by the trailing system on the following tick is wrong.

use log::{debug, error, info};
use rand::Rng;
use snake_core::{
    mapping, CellCoord, Command, ContractViolation, Event, GameStatus, OccupancySnapshot,
};
use snake_system_apple::{AppleManager, AppleScan};
use snake_system_end_condition::evaluate;
use snake_system_steering::Steering;
use snake_system_trailing::Trailing;
use snake_world::{self as world, query, World};

/// Drives the gameplay systems once per external tick.
#[derive(Debug)]
pub struct Gameplay<R> {
    status: GameStatus,
    fault: Option<ContractViolation>,
    previous: OccupancySnapshot,
    apple: AppleManager,
    steering: Steering,
    trailing: Trailing,
    rng: R,
    commands: Vec<Command>,
}

impl<R> Gameplay<R>
where
    R: Rng,
{
    /// Creates an orchestrator for the world, capturing its current occupancy
    /// as the baseline for the first tick.
    #[must_use]
    pub fn new(world: &World, rng: R) -> Self {
        Self {
            status: GameStatus::Running,
            fault: None,
            previous: query::occupancy(world),
            apple: AppleManager,
            steering: Steering,
            trailing: Trailing,
            rng,
            commands: Vec::new(),
        }
    }

    /// Status reached after the most recent tick.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Occupancy snapshot retained from the most recent tick.
    #[must_use]
    pub fn previous_snapshot(&self) -> &OccupancySnapshot {
        &self.previous
    }

    /// Advances the game by one tick.
    ///
    /// Once the game is won or lost every further call returns the terminal
    /// status without touching the world. A contract violation aborts the tick
    /// and is returned again by every later call; the world must be considered
    /// corrupt from that point on.
    pub fn advance(
        &mut self,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> Result<GameStatus, ContractViolation> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        if self.status.is_terminal() {
            return Ok(self.status);
        }

        match self.tick(world, out_events) {
            Ok(status) => Ok(status),
            Err(fault) => {
                error!("aborting tick: {fault}");
                self.fault = Some(fault);
                Err(fault)
            }
        }
    }

    fn tick(
        &mut self,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> Result<GameStatus, ContractViolation> {
        let snapshot = query::occupancy(world);
        let status = evaluate(
            &query::head(world),
            &snapshot,
            &query::segment_view(world),
        )?;
        if status.is_terminal() {
            info!("game over: {status:?} with score {}", query::score(world));
            self.status = status;
            out_events.push(Event::StatusChanged { status });
            return Ok(status);
        }

        self.feed_and_trail(world, &snapshot, out_events)?;
        self.steer(world, out_events);
        self.previous = query::occupancy(world);
        self.sweep_collisions(world, out_events);

        Ok(GameStatus::Running)
    }

    fn feed_and_trail(
        &mut self,
        world: &mut World,
        snapshot: &OccupancySnapshot,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ContractViolation> {
        let mut scan = AppleScan::scan(snapshot);

        self.trailing.handle(
            &self.previous,
            snapshot,
            &query::segment_view(world),
            scan.eaten(),
            &mut self.commands,
        )?;
        self.flush(world, out_events);

        let Some(cell) = scan.eaten_at() else {
            return Ok(());
        };
        debug!("apple eaten at {cell}");
        out_events.push(Event::AppleEaten { cell });

        self.respawn_apple(world, scan.candidates(), out_events);
        if scan.discard_conflicts(&query::occupancy(world)) {
            self.respawn_apple(world, scan.candidates(), out_events);
        }
        Ok(())
    }

    fn respawn_apple(
        &mut self,
        world: &mut World,
        candidates: &[CellCoord],
        out_events: &mut Vec<Event>,
    ) {
        self.apple.respawn(
            candidates,
            query::apple(world).as_ref(),
            &mut self.rng,
            &mut self.commands,
        );
        self.flush(world, out_events);
    }

    fn steer(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        self.steering.handle(
            query::input(world),
            &query::head(world),
            &query::occupancy(world),
            &query::segment_view(world),
            &mut self.commands,
        );
        self.flush(world, out_events);
    }

    // Runs regardless of the loss check and does not consult the tail.
    fn sweep_collisions(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        let size = self.previous.size();
        let segments = query::segment_view(world);
        for (cell, flags) in self.previous.iter() {
            if !flags.is_collision() {
                continue;
            }
            for segment in segments.iter() {
                if mapping::cell_at(segment.position, size) == Some(cell) {
                    debug!("removing segment {} colliding at {cell}", segment.id.get());
                    self.commands.push(Command::DespawnSegment {
                        segment: segment.id,
                    });
                }
            }
        }
        self.flush(world, out_events);
    }

    fn flush(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(world, command, out_events);
        }
    }
}
