#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Apple system responsible for detecting consumption and respawning the apple.
//!
//! Respawn candidates are collected before the body trails, so the cell the
//! head just vacated may still be listed even though a new segment is about
//! to be laid on it. After trailing, [`AppleScan::discard_conflicts`] removes
//! any candidate the apple landed on that is no longer free, and the respawn
//! runs a second time with the filtered list.

use log::debug;
use rand::Rng;
use snake_core::{AppleSnapshot, CellCoord, Command, Occupant, OccupancySnapshot};

/// Result of scanning an occupancy snapshot before trailing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppleScan {
    candidates: Vec<CellCoord>,
    eaten_at: Option<CellCoord>,
}

impl AppleScan {
    /// Collects the empty cells and detects whether the head sits on the apple.
    #[must_use]
    pub fn scan(snapshot: &OccupancySnapshot) -> Self {
        let mut candidates = Vec::new();
        let mut eaten_at = None;
        for (cell, flags) in snapshot.iter() {
            if flags.is_empty() {
                candidates.push(cell);
            } else if flags.contains(Occupant::Head) && flags.contains(Occupant::Apple) {
                eaten_at = Some(cell);
            }
        }
        Self {
            candidates,
            eaten_at,
        }
    }

    /// Cell where the head consumed the apple, if it did.
    #[must_use]
    pub const fn eaten_at(&self) -> Option<CellCoord> {
        self.eaten_at
    }

    /// Reports whether the apple was consumed.
    #[must_use]
    pub const fn eaten(&self) -> bool {
        self.eaten_at.is_some()
    }

    /// Cells that were empty when the scan ran, in row-major order.
    #[must_use]
    pub fn candidates(&self) -> &[CellCoord] {
        &self.candidates
    }

    /// Drops every candidate that now shows the apple together with any
    /// other occupant. Returns `true` when at least one candidate was dropped.
    pub fn discard_conflicts(&mut self, snapshot: &OccupancySnapshot) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|cell| {
            let flags = snapshot.flags(*cell);
            !(flags.contains(Occupant::Apple) && !flags.is_only(Occupant::Apple))
        });
        self.candidates.len() != before
    }
}

/// Pure system that emits apple relocation commands.
#[derive(Debug, Default)]
pub struct AppleManager;

impl AppleManager {
    /// Moves the apple to a uniformly chosen candidate, or destroys it when
    /// no candidate remains. An absent apple is never recreated.
    pub fn respawn<R>(
        &self,
        candidates: &[CellCoord],
        apple: Option<&AppleSnapshot>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        if apple.is_none() {
            return;
        }

        if candidates.is_empty() {
            debug!("board is full, removing the apple");
            out.push(Command::DespawnApple);
            return;
        }

        let cell = candidates[rng.gen_range(0..candidates.len())];
        debug!("respawning apple at {cell}");
        out.push(Command::RelocateApple { cell });
    }
}
