//! Path geometry: cell/progress conversion and move classification.
//!
//! Both sides traverse the same closed ring of cells but start at different
//! points and may run in opposite directions. A single player-relative
//! "progress" coordinate (0 = start, `board_size` = fully borne off) lets one
//! formula serve both sides, so nothing downstream branches on direction.
//!
//! All functions here are pure; the only inputs are a [`PathInfo`] snapshot
//! of the ruleset geometry and plain cell/pip values.

use serde::{Deserialize, Serialize};

use crate::core::{RulesConfig, Side};

/// Geometry of one side's path, captured from the ruleset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathInfo {
    /// Number of cells on the ring.
    pub board_size: usize,

    /// The side's start (head) cell, absolute.
    pub start: usize,

    /// Movement direction along the ring, +1 or -1.
    pub direction: i8,

    /// Cells in the side's home zone.
    pub home_size: usize,
}

/// Classification of a prospective move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveClass {
    /// Non-positive pips or out-of-range cell.
    Invalid,
    /// Lands on the contained absolute cell.
    Step(usize),
    /// Lands exactly on `board_size` progress: a clean bear-off.
    ExactBearOff,
    /// Exceeds `board_size` progress: only legal as an oversized bear-off.
    Overshoot,
}

impl PathInfo {
    /// Capture the path geometry for a side.
    #[must_use]
    pub fn for_side(config: &RulesConfig, side: Side) -> Self {
        Self {
            board_size: config.board_size,
            start: config.start_cells[side],
            direction: config.directions[side],
            home_size: config.home_size,
        }
    }

    /// Forward progress of an absolute cell: 0 at the start cell, wrapping
    /// into `[0, board_size)`.
    #[must_use]
    pub fn cell_to_progress(&self, cell: usize) -> usize {
        let size = self.board_size as i64;
        let raw = (cell as i64 - self.start as i64) * self.direction as i64;
        raw.rem_euclid(size) as usize
    }

    /// Inverse of [`cell_to_progress`](Self::cell_to_progress).
    #[must_use]
    pub fn progress_to_cell(&self, progress: usize) -> usize {
        let size = self.board_size as i64;
        let raw = self.start as i64 + self.direction as i64 * progress as i64;
        raw.rem_euclid(size) as usize
    }

    /// Whether a cell lies in this side's home zone.
    #[must_use]
    pub fn is_in_home(&self, cell: usize) -> bool {
        cell < self.board_size && self.cell_to_progress(cell) >= self.board_size - self.home_size
    }

    /// Absolute cells of the home zone, in increasing-progress order.
    #[must_use]
    pub fn home_cells(&self) -> Vec<usize> {
        (self.board_size - self.home_size..self.board_size)
            .map(|p| self.progress_to_cell(p))
            .collect()
    }

    /// Exact pip distance from a cell to off.
    #[must_use]
    pub fn pips_to_bear_off(&self, cell: usize) -> usize {
        self.board_size - self.cell_to_progress(cell)
    }

    /// Classify moving a stone at `from` by `pips`.
    #[must_use]
    pub fn classify(&self, from: usize, pips: u8) -> MoveClass {
        if pips == 0 || from >= self.board_size {
            return MoveClass::Invalid;
        }

        let target = self.cell_to_progress(from) + pips as usize;
        match target.cmp(&self.board_size) {
            std::cmp::Ordering::Less => MoveClass::Step(self.progress_to_cell(target)),
            std::cmp::Ordering::Equal => MoveClass::ExactBearOff,
            std::cmp::Ordering::Greater => MoveClass::Overshoot,
        }
    }
}

/// The absolute cell a die enters on from the bar, for the given side.
///
/// Entry doors are the **opponent's** home cells in reverse order: die 1
/// maps to the farthest opponent-home cell (the one the mover has the whole
/// path left to travel from), the maximum die to the nearest. Dies larger
/// than the door count have no entry cell.
#[must_use]
pub fn entry_cell(config: &RulesConfig, side: Side, die: u8) -> Option<usize> {
    let die = die as usize;
    if die == 0 || die > config.home_size {
        return None;
    }

    let opponent = PathInfo::for_side(config, side.opponent());
    let doors = opponent.home_cells();
    Some(doors[config.home_size - die])
}
