//! Move-choice strategies for bot-driven turns.
//!
//! The session proves legality before a strategy ever sees a move: the
//! candidate list only contains dice that have at least one legal move, and
//! every move in it is already validated. A strategy just picks.

use crate::board::BoardState;
use crate::core::Move;
use crate::core::GameRng;

/// One playable die with its legal moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DieCandidates {
    /// Index into the turn's remaining-dice list.
    pub die_index: usize,

    /// The die value.
    pub die: u8,

    /// Legal moves for that die. Never empty.
    pub moves: Vec<Move>,
}

/// A strategy's pick: a candidate entry and a move within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Choice {
    pub candidate: usize,
    pub mv: usize,
}

/// Pluggable bot move selection.
pub trait MoveStrategy {
    /// Pick a die and a move among the pre-validated candidates.
    ///
    /// `candidates` is never empty. Out-of-range indices in the returned
    /// choice are clamped by the session.
    fn choose(&mut self, state: &BoardState, candidates: &[DieCandidates]) -> Choice;
}

/// Deterministic baseline: first playable die, first legal move.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstMove;

impl MoveStrategy for FirstMove {
    fn choose(&mut self, _state: &BoardState, _candidates: &[DieCandidates]) -> Choice {
        Choice { candidate: 0, mv: 0 }
    }
}

/// Uniformly random choice over playable dice and their moves.
#[derive(Clone, Debug)]
pub struct RandomMove {
    rng: GameRng,
}

impl RandomMove {
    /// Create from a context stream so bot randomness never perturbs the
    /// dice streams.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    /// Convenience constructor from a session seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(GameRng::new(seed).for_context("strategy/random"))
    }
}

impl MoveStrategy for RandomMove {
    fn choose(&mut self, _state: &BoardState, candidates: &[DieCandidates]) -> Choice {
        let candidate = self.rng.gen_range_usize(0..candidates.len());
        let mv = self.rng.gen_range_usize(0..candidates[candidate].moves.len());
        Choice { candidate, mv }
    }
}
