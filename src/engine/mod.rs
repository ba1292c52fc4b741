//! Move engine: legality generation and state application.
//!
//! Both entry points are free functions over `(&RulesConfig, &BoardState)`:
//! [`legal_moves`] is pure, [`apply`] mutates but re-validates every
//! precondition first (defense in depth), so an `Illegal` result never
//! leaves a partially mutated state behind.
//!
//! Legality policy, in order:
//! 1. A finished match or a non-positive die yields nothing.
//! 2. Stones on the bar must re-enter before anything else; at most one
//!    `Enter` move exists per die.
//! 3. Moves off the head cell stop once the per-turn head allowance is used.
//! 4. Bear-offs require every stone home; an oversized die may only retire
//!    the rearmost stone.
//! 5. A destination is blocked by two or more opponent stones, by a lone
//!    opponent stone unless hitting is allowed, or by any opponent stone at
//!    all when the ruleset blocks outright.

use crate::board::BoardState;
use crate::core::{ApplyResult, Move, RulesConfig, Side};
use crate::path::{entry_cell, MoveClass, PathInfo};

/// Whether `side` may land on `cell` under the ruleset's blocking policy.
#[must_use]
pub fn cell_open(config: &RulesConfig, state: &BoardState, side: Side, cell: usize) -> bool {
    let opponents = state.stones_at(side.opponent(), cell);
    if opponents == 0 {
        return true;
    }
    if config.block_if_any_opponent {
        return false;
    }
    opponents == 1 && config.allow_hit_single_stone
}

/// Whether every one of `side`'s stones is in its home zone with none on
/// the bar: the gate for bearing off.
#[must_use]
pub fn all_in_home(config: &RulesConfig, state: &BoardState, side: Side) -> bool {
    if state.bar(side) > 0 {
        return false;
    }
    let info = PathInfo::for_side(config, side);
    state.occupied_cells(side).all(|cell| info.is_in_home(cell))
}

/// Whether no occupied cell of `side` is farther from off than `from`.
///
/// This is the oversized bear-off rule: the largest remaining die may retire
/// the rearmost stone even when it overshoots.
fn is_rearmost(config: &RulesConfig, state: &BoardState, side: Side, from: usize) -> bool {
    let info = PathInfo::for_side(config, side);
    let distance = info.pips_to_bear_off(from);
    state
        .occupied_cells(side)
        .all(|cell| info.pips_to_bear_off(cell) <= distance)
}

/// All legal moves for `side` with a die of `die`.
///
/// `head_used`/`head_limit` describe the current turn's head-move allowance;
/// pass `u32::MAX` as the limit when the head rule is disabled.
#[must_use]
pub fn legal_moves(
    config: &RulesConfig,
    state: &BoardState,
    side: Side,
    die: u8,
    head_used: u32,
    head_limit: u32,
) -> Vec<Move> {
    if state.is_finished() || die == 0 {
        return Vec::new();
    }

    // Bar precedence: re-entry is the only option while stones wait there.
    if state.bar(side) > 0 {
        return match entry_cell(config, side, die) {
            Some(cell) if cell_open(config, state, side, cell) => {
                vec![Move::Enter { pips: die }]
            }
            _ => Vec::new(),
        };
    }

    let info = PathInfo::for_side(config, side);
    let head = config.start_cell(side);
    let home_ready = all_in_home(config, state, side);
    let mut moves = Vec::new();

    for from in state.occupied_cells(side) {
        if from == head && head_used >= head_limit {
            continue;
        }

        match info.classify(from, die) {
            MoveClass::Invalid => {}
            MoveClass::Step(target) => {
                if cell_open(config, state, side, target) {
                    moves.push(Move::Step { from, pips: die });
                }
            }
            MoveClass::ExactBearOff => {
                if home_ready {
                    moves.push(Move::BearOff { from, pips: die });
                }
            }
            MoveClass::Overshoot => {
                if home_ready && is_rearmost(config, state, side, from) {
                    moves.push(Move::BearOff { from, pips: die });
                }
            }
        }
    }

    moves
}

/// The absolute destination cell of a move, when one is resolvable.
#[must_use]
pub fn destination(config: &RulesConfig, side: Side, mv: &Move) -> Option<usize> {
    match *mv {
        Move::Step { from, pips } => {
            match PathInfo::for_side(config, side).classify(from, pips) {
                MoveClass::Step(target) => Some(target),
                _ => None,
            }
        }
        Move::Enter { pips } => entry_cell(config, side, pips),
        Move::BearOff { .. } => None,
    }
}

/// Apply a move for `side`, mutating the state on success.
///
/// Every precondition is re-validated; any failure returns
/// [`ApplyResult::Illegal`] with the state untouched. Bearing off the last
/// stone finishes the match and returns [`ApplyResult::Finished`].
pub fn apply(config: &RulesConfig, state: &mut BoardState, side: Side, mv: &Move) -> ApplyResult {
    if state.is_finished() {
        return ApplyResult::Illegal;
    }

    match *mv {
        Move::Step { from, pips } => {
            if state.bar(side) > 0 || state.stones_at(side, from) == 0 {
                return ApplyResult::Illegal;
            }
            let target = match PathInfo::for_side(config, side).classify(from, pips) {
                MoveClass::Step(target) => target,
                _ => return ApplyResult::Illegal,
            };
            if !cell_open(config, state, side, target) {
                return ApplyResult::Illegal;
            }

            state.remove_stone(side, from);
            resolve_hit(state, side, target);
            state.add_stone(side, target);
            ApplyResult::Ok
        }

        Move::Enter { pips } => {
            if state.bar(side) == 0 {
                return ApplyResult::Illegal;
            }
            let target = match entry_cell(config, side, pips) {
                Some(cell) if cell_open(config, state, side, cell) => cell,
                _ => return ApplyResult::Illegal,
            };

            state.remove_from_bar(side, 1);
            resolve_hit(state, side, target);
            state.add_stone(side, target);
            ApplyResult::Ok
        }

        Move::BearOff { from, pips } => {
            if state.stones_at(side, from) == 0 || !all_in_home(config, state, side) {
                return ApplyResult::Illegal;
            }
            match PathInfo::for_side(config, side).classify(from, pips) {
                MoveClass::ExactBearOff => {}
                MoveClass::Overshoot if is_rearmost(config, state, side, from) => {}
                _ => return ApplyResult::Illegal,
            }

            state.remove_stone(side, from);
            state.add_borne_off(side);

            if state.borne_off(side) == state.stones_per_side() {
                state.finish(side);
                ApplyResult::Finished
            } else {
                ApplyResult::Ok
            }
        }
    }
}

/// Send a lone opponent stone on `target` to the bar.
///
/// Callers have already established the cell is open, so an opponent count
/// of exactly one here means a hit under the active ruleset.
fn resolve_hit(state: &mut BoardState, side: Side, target: usize) {
    let opponent = side.opponent();
    if state.stones_at(opponent, target) == 1 {
        state.remove_stone(opponent, target);
        state.add_to_bar(opponent, 1);
    }
}
