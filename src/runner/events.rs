//! Engine notifications.
//!
//! The session pushes events synchronously, in the order the state changes
//! occur, onto an internal queue the driver drains between calls. Nothing is
//! batched or reordered, so a driver replaying the queue sees exactly the
//! sequence of state transitions.
//!
//! Events carry identifiers (side, turn, record), not state snapshots: the
//! queue is drained between session calls, so [`Session::state`] is already
//! the snapshot matching the events just drained.
//!
//! [`Session::state`]: super::Session::state

use serde::{Deserialize, Serialize};

use crate::core::{EndReason, MoveRecord, Side};

/// A notification emitted by the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A match began (on creation or reset).
    MatchStarted,

    /// A turn began: dice have been drawn for `side`.
    TurnStarted { side: Side, turn: u32 },

    /// A move resolved; the record carries the full context.
    MoveApplied(MoveRecord),

    /// The match ended.
    MatchEnded { winner: Side, reason: EndReason },
}
