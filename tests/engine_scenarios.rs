//! Rule-edge scenarios exercised through the public engine API.

use rust_nardy::{
    engine, entry_cell, ApplyResult, BoardState, Move, PathInfo, Placement, RulesConfig, Side,
};

const NO_HEAD_CAP: u32 = u32::MAX;

fn hitting_config() -> RulesConfig {
    RulesConfig {
        allow_hit_single_stone: true,
        block_if_any_opponent: false,
        ..RulesConfig::default()
    }
}

fn place(side: Side, cell: usize, count: u32) -> Placement {
    Placement { side, cell: Some(cell), count }
}

fn on_bar(side: Side, count: u32) -> Placement {
    Placement { side, cell: None, count }
}

// =============================================================================
// Bear-off gating
// =============================================================================

#[test]
fn oversized_bear_off_blocked_while_farther_stone_exists() {
    let cfg = hitting_config();
    let info = PathInfo::for_side(&cfg, Side::First);

    // Stones 6 and 5 pips from off.
    let six_away = info.progress_to_cell(cfg.board_size - 6);
    let five_away = info.progress_to_cell(cfg.board_size - 5);
    let state = BoardState::with_layout(
        &cfg,
        &[place(Side::First, six_away, 1), place(Side::First, five_away, 1)],
    );

    let moves = engine::legal_moves(&cfg, &state, Side::First, 6, 0, NO_HEAD_CAP);

    // The exact bear-off from six pips is legal; the oversized one from five
    // pips is not, because a farther stone remains.
    assert!(moves.contains(&Move::BearOff { from: six_away, pips: 6 }));
    assert!(!moves.contains(&Move::BearOff { from: five_away, pips: 6 }));
}

#[test]
fn oversized_bear_off_allowed_for_lone_rearmost_stone() {
    let cfg = hitting_config();
    let info = PathInfo::for_side(&cfg, Side::First);

    let five_away = info.progress_to_cell(cfg.board_size - 5);
    let state = BoardState::with_layout(&cfg, &[place(Side::First, five_away, 1)]);

    let moves = engine::legal_moves(&cfg, &state, Side::First, 6, 0, NO_HEAD_CAP);
    assert_eq!(moves, vec![Move::BearOff { from: five_away, pips: 6 }]);
}

#[test]
fn no_bear_off_generated_outside_home() {
    let cfg = hitting_config();
    let state = BoardState::with_layout(
        &cfg,
        &[place(Side::First, 23, 2), place(Side::First, 0, 1)],
    );

    for die in 1..=6u8 {
        let moves = engine::legal_moves(&cfg, &state, Side::First, die, 0, NO_HEAD_CAP);
        assert!(
            moves.iter().all(|m| !matches!(m, Move::BearOff { .. })),
            "die {die} generated a bear-off with a stone outside home"
        );
    }
}

// =============================================================================
// Hitting
// =============================================================================

#[test]
fn hit_and_bar() {
    let cfg = hitting_config();

    // First sits 3 pips behind Second's lone stone.
    let mut state = BoardState::with_layout(
        &cfg,
        &[place(Side::First, 4, 1), place(Side::Second, 7, 1)],
    );

    let mv = Move::Step { from: 4, pips: 3 };
    assert!(engine::legal_moves(&cfg, &state, Side::First, 3, 0, NO_HEAD_CAP).contains(&mv));
    assert_eq!(engine::apply(&cfg, &mut state, Side::First, &mv), ApplyResult::Ok);

    assert_eq!(state.stones_at(Side::First, 7), 1);
    assert_eq!(state.stones_at(Side::Second, 7), 0);
    assert_eq!(state.bar(Side::Second), 1);
}

#[test]
fn stacked_opponents_never_hittable() {
    let cfg = hitting_config();
    let state = BoardState::with_layout(
        &cfg,
        &[place(Side::First, 4, 1), place(Side::Second, 7, 2)],
    );

    let moves = engine::legal_moves(&cfg, &state, Side::First, 3, 0, NO_HEAD_CAP);
    assert!(!moves.contains(&Move::Step { from: 4, pips: 3 }));
}

// =============================================================================
// Bar entry
// =============================================================================

#[test]
fn bar_precedence_over_all_other_moves() {
    let cfg = hitting_config();
    let state = BoardState::with_layout(
        &cfg,
        &[
            on_bar(Side::First, 1),
            place(Side::First, 2, 3),
            place(Side::First, 20, 2),
        ],
    );

    for die in 1..=6u8 {
        let moves = engine::legal_moves(&cfg, &state, Side::First, die, 0, NO_HEAD_CAP);
        assert!(
            moves.iter().all(|m| matches!(m, Move::Enter { .. })),
            "die {die} offered a non-entry move with a stone on the bar"
        );
    }
}

#[test]
fn all_entry_doors_blocked_means_no_moves() {
    let cfg = RulesConfig::default(); // blocking on

    let mut layout = vec![on_bar(Side::First, 1)];
    for die in 1..=cfg.home_size as u8 {
        let door = entry_cell(&cfg, Side::First, die).unwrap();
        layout.push(place(Side::Second, door, 2));
    }
    let state = BoardState::with_layout(&cfg, &layout);

    for die in 1..=cfg.home_size as u8 {
        assert!(
            engine::legal_moves(&cfg, &state, Side::First, die, 0, NO_HEAD_CAP).is_empty(),
            "die {die} found a move through a closed door"
        );
    }
}

#[test]
fn entry_mapping_extremes() {
    let cfg = hitting_config();

    for side in [Side::First, Side::Second] {
        let opponent = PathInfo::for_side(&cfg, side.opponent());

        let far = entry_cell(&cfg, side, 1).unwrap();
        assert_eq!(opponent.cell_to_progress(far), cfg.board_size - 1);

        let near = entry_cell(&cfg, side, cfg.home_size as u8).unwrap();
        assert_eq!(
            opponent.cell_to_progress(near),
            cfg.board_size - cfg.home_size
        );
    }
}

// =============================================================================
// Application safety
// =============================================================================

#[test]
fn illegal_applications_never_mutate() {
    let cfg = RulesConfig::default();
    let mut state = BoardState::new(&cfg);
    let before = state.clone();

    let attempts = [
        Move::Step { from: 10, pips: 2 },
        Move::Step { from: 0, pips: 0 },
        Move::BearOff { from: 0, pips: 6 },
        Move::Enter { pips: 4 },
    ];

    for mv in &attempts {
        assert_eq!(
            engine::apply(&cfg, &mut state, Side::First, mv),
            ApplyResult::Illegal
        );
        assert_eq!(state, before);
    }
}

#[test]
fn every_generated_move_applies_cleanly() {
    let cfg = hitting_config();
    let state = BoardState::with_layout(
        &cfg,
        &[
            place(Side::First, 0, 5),
            place(Side::First, 8, 2),
            place(Side::First, 20, 3),
            place(Side::Second, 12, 10),
            place(Side::Second, 15, 1),
        ],
    );

    for die in 1..=6u8 {
        for mv in engine::legal_moves(&cfg, &state, Side::First, die, 0, NO_HEAD_CAP) {
            let mut fresh = state.clone();
            let result = engine::apply(&cfg, &mut fresh, Side::First, &mv);
            assert_ne!(
                result,
                ApplyResult::Illegal,
                "generated move {mv:?} failed to apply"
            );
        }
    }
}
