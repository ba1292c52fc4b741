//! Match state: the authoritative record of stone positions and turn flow.
//!
//! `BoardState` holds per-cell occupancy for each side, bar and borne-off
//! counts, and the turn bookkeeping. Mutators are narrow and fallible where
//! underflow is possible; the conservation invariant (board + bar + borne-off
//! == stones per side) holds for every reachable state.
//!
//! ## Precondition
//!
//! Once [`finish`](BoardState::finish) has been called, callers must check
//! [`is_finished`](BoardState::is_finished) before mutating occupancy. The
//! state does not self-enforce this; the move engine and session do.

use serde::{Deserialize, Serialize};

use crate::core::{RulesConfig, Side, SideMap};

/// A stone placement used to seed a custom starting layout.
///
/// `cell: None` places the stones on the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub side: Side,
    pub cell: Option<usize>,
    pub count: u32,
}

/// The mutable state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    stones_per_side: u32,
    occupancy: SideMap<Vec<u32>>,
    bar: SideMap<u32>,
    borne_off: SideMap<u32>,

    current_side: Side,
    turn_index: u32,
    turns_taken: SideMap<u32>,

    finished: bool,
    winner: Option<Side>,
}

impl BoardState {
    /// Create a state with the standard starting placement: every stone on
    /// its side's start cell.
    #[must_use]
    pub fn new(config: &RulesConfig) -> Self {
        let mut state = Self::empty(config);
        for side in Side::all() {
            state.occupancy[side][config.start_cell(side)] = config.stones_per_side;
        }
        state
    }

    /// Create a state from a custom layout.
    ///
    /// Stones the layout does not place are counted as already borne off,
    /// which keeps the conservation invariant intact for partial setups.
    /// Placements are clamped so a side never exceeds its stone total.
    #[must_use]
    pub fn with_layout(config: &RulesConfig, layout: &[Placement]) -> Self {
        let mut state = Self::empty(config);

        for placement in layout {
            let side = placement.side;
            let remaining =
                config.stones_per_side - state.total_on_board(side) - state.bar[side];
            let count = placement.count.min(remaining);

            match placement.cell {
                Some(cell) if cell < config.board_size => {
                    state.occupancy[side][cell] += count;
                }
                Some(_) => {}
                None => state.bar[side] += count,
            }
        }

        for side in Side::all() {
            state.borne_off[side] =
                config.stones_per_side - state.total_on_board(side) - state.bar[side];
        }

        state
    }

    fn empty(config: &RulesConfig) -> Self {
        Self {
            stones_per_side: config.stones_per_side,
            occupancy: SideMap::new(|_| vec![0; config.board_size]),
            bar: SideMap::with_value(0),
            borne_off: SideMap::with_value(0),
            current_side: Side::First,
            turn_index: 0,
            turns_taken: SideMap::with_value(0),
            finished: false,
            winner: None,
        }
    }

    // === Occupancy ===

    /// Stones `side` has on `cell`.
    #[must_use]
    pub fn stones_at(&self, side: Side, cell: usize) -> u32 {
        self.occupancy[side].get(cell).copied().unwrap_or(0)
    }

    /// Add one stone for `side` on `cell`.
    pub fn add_stone(&mut self, side: Side, cell: usize) {
        self.occupancy[side][cell] += 1;
    }

    /// Remove one stone for `side` from `cell`.
    ///
    /// Returns false (without mutating) if the cell is empty.
    pub fn remove_stone(&mut self, side: Side, cell: usize) -> bool {
        match self.occupancy[side].get_mut(cell) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Total stones `side` has on the board (excluding bar and borne-off).
    #[must_use]
    pub fn total_on_board(&self, side: Side) -> u32 {
        self.occupancy[side].iter().sum()
    }

    /// Absolute cells where `side` has at least one stone.
    pub fn occupied_cells(&self, side: Side) -> impl Iterator<Item = usize> + '_ {
        self.occupancy[side]
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(cell, _)| cell)
    }

    // === Bar ===

    /// Stones `side` has on the bar.
    #[must_use]
    pub fn bar(&self, side: Side) -> u32 {
        self.bar[side]
    }

    /// Put `n` stones on `side`'s bar.
    pub fn add_to_bar(&mut self, side: Side, n: u32) {
        self.bar[side] += n;
    }

    /// Take `n` stones off `side`'s bar.
    ///
    /// Returns false (without mutating) if fewer than `n` are there.
    pub fn remove_from_bar(&mut self, side: Side, n: u32) -> bool {
        if self.bar[side] < n {
            return false;
        }
        self.bar[side] -= n;
        true
    }

    // === Borne off ===

    /// Stones `side` has borne off.
    #[must_use]
    pub fn borne_off(&self, side: Side) -> u32 {
        self.borne_off[side]
    }

    /// Record one stone borne off for `side`.
    pub fn add_borne_off(&mut self, side: Side) {
        self.borne_off[side] += 1;
    }

    /// Stone total each side plays with.
    #[must_use]
    pub fn stones_per_side(&self) -> u32 {
        self.stones_per_side
    }

    // === Turn flow ===

    /// The side to move.
    #[must_use]
    pub fn current_side(&self) -> Side {
        self.current_side
    }

    /// 0-based count of turns started.
    #[must_use]
    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    /// Completed turns for `side` (drives first-turn allowances).
    #[must_use]
    pub fn turns_taken(&self, side: Side) -> u32 {
        self.turns_taken[side]
    }

    /// Close the current side's turn and hand play to the opponent.
    pub fn advance_turn(&mut self) {
        self.turns_taken[self.current_side] += 1;
        self.current_side = self.current_side.opponent();
        self.turn_index += 1;
    }

    // === Terminal state ===

    /// Whether the match has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The winner, once decided.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Mark the match finished with a winner.
    pub fn finish(&mut self, winner: Side) {
        self.finished = true;
        self.winner = Some(winner);
    }

    /// Reinitialize to the standard starting placement and clear all
    /// counters and terminal flags.
    pub fn reset(&mut self, config: &RulesConfig) {
        *self = Self::new(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RulesConfig {
        RulesConfig::default()
    }

    fn conserved(state: &BoardState, side: Side) -> bool {
        state.total_on_board(side) + state.bar(side) + state.borne_off(side)
            == state.stones_per_side()
    }

    #[test]
    fn test_new_places_all_stones_on_heads() {
        let cfg = config();
        let state = BoardState::new(&cfg);

        assert_eq!(state.stones_at(Side::First, 0), 15);
        assert_eq!(state.stones_at(Side::Second, 12), 15);
        assert!(conserved(&state, Side::First));
        assert!(conserved(&state, Side::Second));
    }

    #[test]
    fn test_remove_stone_underflow() {
        let cfg = config();
        let mut state = BoardState::new(&cfg);

        assert!(state.remove_stone(Side::First, 0));
        assert!(!state.remove_stone(Side::First, 5));
        assert_eq!(state.stones_at(Side::First, 0), 14);
    }

    #[test]
    fn test_bar_underflow() {
        let cfg = config();
        let mut state = BoardState::new(&cfg);

        state.add_to_bar(Side::Second, 2);
        assert!(!state.remove_from_bar(Side::Second, 3));
        assert_eq!(state.bar(Side::Second), 2);
        assert!(state.remove_from_bar(Side::Second, 2));
        assert_eq!(state.bar(Side::Second), 0);
    }

    #[test]
    fn test_advance_turn() {
        let cfg = config();
        let mut state = BoardState::new(&cfg);

        assert_eq!(state.current_side(), Side::First);
        assert_eq!(state.turn_index(), 0);

        state.advance_turn();

        assert_eq!(state.current_side(), Side::Second);
        assert_eq!(state.turn_index(), 1);
        assert_eq!(state.turns_taken(Side::First), 1);
        assert_eq!(state.turns_taken(Side::Second), 0);
    }

    #[test]
    fn test_finish_and_reset() {
        let cfg = config();
        let mut state = BoardState::new(&cfg);

        state.finish(Side::Second);
        assert!(state.is_finished());
        assert_eq!(state.winner(), Some(Side::Second));

        state.reset(&cfg);
        assert!(!state.is_finished());
        assert_eq!(state.winner(), None);
        assert_eq!(state.stones_at(Side::First, 0), 15);
    }

    #[test]
    fn test_layout_counts_missing_stones_as_borne_off() {
        let cfg = config();
        let state = BoardState::with_layout(
            &cfg,
            &[
                Placement { side: Side::First, cell: Some(20), count: 2 },
                Placement { side: Side::Second, cell: None, count: 1 },
                Placement { side: Side::Second, cell: Some(3), count: 4 },
            ],
        );

        assert_eq!(state.stones_at(Side::First, 20), 2);
        assert_eq!(state.borne_off(Side::First), 13);
        assert_eq!(state.bar(Side::Second), 1);
        assert_eq!(state.borne_off(Side::Second), 10);
        assert!(conserved(&state, Side::First));
        assert!(conserved(&state, Side::Second));
    }

    #[test]
    fn test_layout_clamps_overflow() {
        let cfg = config();
        let state = BoardState::with_layout(
            &cfg,
            &[Placement { side: Side::First, cell: Some(5), count: 99 }],
        );

        assert_eq!(state.stones_at(Side::First, 5), 15);
        assert!(conserved(&state, Side::First));
    }

    #[test]
    fn test_occupied_cells() {
        let cfg = config();
        let state = BoardState::with_layout(
            &cfg,
            &[
                Placement { side: Side::First, cell: Some(3), count: 1 },
                Placement { side: Side::First, cell: Some(7), count: 2 },
            ],
        );

        let cells: Vec<_> = state.occupied_cells(Side::First).collect();
        assert_eq!(cells, vec![3, 7]);
    }
}
