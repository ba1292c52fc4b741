//! Move representation and the move log.
//!
//! A `Move` is a tagged value with three kinds:
//! - `Step`: advance a stone from an absolute cell by a pip count
//! - `BearOff`: retire a stone from an absolute cell using a pip count
//! - `Enter`: bring a stone in from the bar using a pip count
//!
//! Moves are immutable and compare by tag + payload. The engine records one
//! `MoveRecord` per resolved move attempt; records are never mutated after
//! being appended.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::side::Side;

/// A single move a side can make.
///
/// ## Example
///
/// ```
/// use rust_nardy::core::Move;
///
/// let step = Move::Step { from: 3, pips: 4 };
/// assert_eq!(step.pips(), 4);
/// assert_eq!(step.from_cell(), Some(3));
///
/// let enter = Move::Enter { pips: 2 };
/// assert_eq!(enter.from_cell(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Advance a stone from `from` by `pips` cells along the mover's path.
    Step { from: usize, pips: u8 },

    /// Bear a stone off from `from` using a die of `pips`.
    BearOff { from: usize, pips: u8 },

    /// Enter a stone from the bar using a die of `pips`.
    Enter { pips: u8 },
}

impl Move {
    /// The die value this move consumes.
    #[must_use]
    pub fn pips(&self) -> u8 {
        match *self {
            Move::Step { pips, .. } | Move::BearOff { pips, .. } | Move::Enter { pips } => pips,
        }
    }

    /// The absolute origin cell, if the move has one (`Enter` does not).
    #[must_use]
    pub fn from_cell(&self) -> Option<usize> {
        match *self {
            Move::Step { from, .. } | Move::BearOff { from, .. } => Some(from),
            Move::Enter { .. } => None,
        }
    }
}

/// Outcome of applying a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Move applied; the match continues.
    Ok,
    /// A precondition failed; state is unchanged.
    Illegal,
    /// Move applied and it ended the match.
    Finished,
}

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A side bore off its last stone.
    Win,
    /// The turn limit was reached.
    Timeout,
    /// Neither side could make a legal move.
    NoMoves,
}

/// The dice outcome drawn for a turn, as seen by records and queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnOutcome {
    /// Label of the outcome drawn ("3-4", "6-6", ...). Empty for the
    /// neutral draw of an empty bag.
    pub label: String,

    /// Die values granted for the turn.
    pub pips: SmallVec<[u8; 4]>,
}

impl DrawnOutcome {
    /// The neutral draw: no label, no pips. Produced by an empty dice bag.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Whether this draw grants any pips.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pips.is_empty()
    }
}

/// One entry in the move log.
///
/// Appended once per resolved move attempt, never mutated. Carries enough
/// context to replay or display the attempt without the surrounding state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The side that moved (or attempted to).
    pub side: Side,

    /// The move attempted. `None` for terminal records that close a match
    /// without a move (timeout, stalemate).
    pub mv: Option<Move>,

    /// Absolute origin cell, when the move has one.
    pub from: Option<usize>,

    /// Absolute destination cell, when one is resolvable (`BearOff` has none).
    pub to: Option<usize>,

    /// Die value consumed.
    pub pips: u8,

    /// The outcome drawn for the turn this move belongs to.
    pub outcome: DrawnOutcome,

    /// Remaining dice after this move was applied.
    pub remaining: SmallVec<[u8; 4]>,

    /// How the application resolved.
    pub result: ApplyResult,

    /// Set when this move ended the match.
    pub end_reason: Option<EndReason>,

    /// Set when this move decided a winner.
    pub winner: Option<Side>,
}
