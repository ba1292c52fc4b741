//! # rust-nardy
//!
//! A rules engine for two-player tables-style race games (long nardy,
//! backgammon variants): stones race along a closed player-relative path,
//! can be hit to a bar, must re-enter before anything else, and are borne
//! off to win.
//!
//! ## Design Principles
//!
//! 1. **Configuration-Driven**: Board geometry, stone counts, blocking and
//!    hitting behavior, head-move limits, and dice-bag contents all come
//!    from [`RulesConfig`]. Nothing is hardcoded to a specific variant.
//!
//! 2. **Deterministic**: Every random stream (dice bags, bot strategies)
//!    derives from one session seed via context streams, so a match replays
//!    identically.
//!
//! 3. **No Ambient State**: Configuration and randomness are injected at
//!    construction. One [`Session`] per match; no globals, no scheduler,
//!    no I/O.
//!
//! ## Architecture
//!
//! - **Progress Coordinate**: one player-relative distance-from-start
//!   measure unifies path logic across both movement directions.
//!
//! - **Pure Legality, Re-Validating Application**: the move engine computes
//!   legal moves as a pure function and re-checks every precondition on
//!   apply, so illegal input is always a no-op.
//!
//! ## Modules
//!
//! - `core`: sides, ruleset configuration, RNG, moves, records
//! - `path`: cell/progress geometry and move classification
//! - `board`: the authoritative match state
//! - `engine`: legal-move generation and move application
//! - `dice`: weighted without-replacement dice bags
//! - `runner`: the per-match turn runner and its events
//! - `strategy`: pluggable bot move choice

pub mod board;
pub mod core;
pub mod dice;
pub mod engine;
pub mod path;
pub mod runner;
pub mod strategy;

// Re-export commonly used types
pub use crate::core::{
    ApplyResult, DiceOutcome, DrawnOutcome, EndReason, GameRng, HeadRule, Move, MoveRecord,
    RulesConfig, Side, SideMap,
};

pub use crate::board::{BoardState, Placement};
pub use crate::dice::{DiceBag, DrawMode};
pub use crate::path::{entry_cell, MoveClass, PathInfo};
pub use crate::runner::{EngineEvent, Session, SessionBuilder};
pub use crate::strategy::{Choice, DieCandidates, FirstMove, MoveStrategy, RandomMove};
