//! Turn runner: one match, end to end.
//!
//! `Session` owns the match state, both dice bags, and the move log, and
//! drives the turn cycle: draw an outcome, offer legal moves per die, apply
//! the chosen move, advance when the dice run out or no move remains, and
//! finish on a win, a turn-limit timeout, or dice that grant no pips.
//!
//! Everything is synchronous and cooperative. A bot driver calls
//! [`tick`](Session::tick) repeatedly; a human driver calls
//! [`try_apply_human_move`](Session::try_apply_human_move) when input
//! arrives. Illegal human input is rejected as a no-op, never a panic.
//!
//! Notifications accumulate on an internal queue in state-change order;
//! drivers drain them with [`drain_events`](Session::drain_events).

mod events;

pub use events::EngineEvent;

use im::Vector;
use smallvec::SmallVec;

use crate::board::{BoardState, Placement};
use crate::core::{
    ApplyResult, DrawnOutcome, EndReason, GameRng, Move, MoveRecord, RulesConfig, Side, SideMap,
};
use crate::dice::{DiceBag, DrawMode};
use crate::engine;
use crate::strategy::{DieCandidates, MoveStrategy};

/// Builder for a [`Session`].
///
/// ## Example
///
/// ```
/// use rust_nardy::core::RulesConfig;
/// use rust_nardy::runner::SessionBuilder;
///
/// let session = SessionBuilder::new(RulesConfig::default())
///     .seed(42)
///     .build();
/// assert!(!session.is_finished());
/// ```
pub struct SessionBuilder {
    config: RulesConfig,
    seed: u64,
    draw_mode: DrawMode,
    layout: Option<Vec<Placement>>,
}

impl SessionBuilder {
    /// Start building a session for a ruleset.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            seed: 0,
            draw_mode: DrawMode::Shuffled,
            layout: None,
        }
    }

    /// Session seed; every random stream derives from it.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Dice-bag draw mode (shuffled by default).
    #[must_use]
    pub fn draw_mode(mut self, mode: DrawMode) -> Self {
        self.draw_mode = mode;
        self
    }

    /// Custom starting layout instead of the standard placement.
    #[must_use]
    pub fn layout(mut self, layout: &[Placement]) -> Self {
        self.layout = Some(layout.to_vec());
        self
    }

    /// Validate the config and start the match.
    #[must_use]
    pub fn build(self) -> Session {
        let config = self.config.validate();
        let state = match &self.layout {
            Some(layout) => BoardState::with_layout(&config, layout),
            None => BoardState::new(&config),
        };
        let bags = Session::build_bags(&config, self.seed, self.draw_mode);

        let mut session = Session {
            config,
            state,
            bags,
            seed: self.seed,
            draw_mode: self.draw_mode,
            log: Vector::new(),
            outcome: DrawnOutcome::neutral(),
            remaining: SmallVec::new(),
            used: SmallVec::new(),
            selected: None,
            head_used: 0,
            head_limit: 0,
            stalled_turns: 0,
            events: Vec::new(),
        };
        session.begin_match();
        session
    }
}

/// One running match.
pub struct Session {
    config: RulesConfig,
    state: BoardState,
    bags: SideMap<DiceBag>,
    seed: u64,
    draw_mode: DrawMode,

    log: Vector<MoveRecord>,

    // Current turn.
    outcome: DrawnOutcome,
    remaining: SmallVec<[u8; 4]>,
    used: SmallVec<[u8; 4]>,
    selected: Option<usize>,
    head_used: u32,
    head_limit: u32,

    /// Consecutive turns that began with no legal move.
    stalled_turns: u32,

    events: Vec<EngineEvent>,
}

impl Session {
    /// Consecutive neutral-draw turns before the match is declared dead.
    const STALL_LIMIT: u32 = 2;

    /// Create a session with the standard starting placement.
    #[must_use]
    pub fn new(config: RulesConfig, seed: u64) -> Self {
        SessionBuilder::new(config).seed(seed).build()
    }

    fn build_bags(config: &RulesConfig, seed: u64, mode: DrawMode) -> SideMap<DiceBag> {
        let root = GameRng::new(seed);
        SideMap::new(|side| {
            let context = match side {
                Side::First => "dice/first",
                Side::Second => "dice/second",
            };
            DiceBag::new(config.dice[side].clone(), mode, root.for_context(context))
        })
    }

    // === Commands ===

    /// Restart the match: standard placement, rebuilt dice streams, empty
    /// log. Fully reproducible for the same config and seed.
    pub fn reset(&mut self) {
        self.state.reset(&self.config);
        self.bags = Self::build_bags(&self.config, self.seed, self.draw_mode);
        self.log = Vector::new();
        self.events.clear();
        self.stalled_turns = 0;
        self.begin_match();
    }

    /// Advance the match by one bot decision.
    ///
    /// Applies one strategy-chosen move, or ends the turn when no remaining
    /// die has a legal move. Returns false if the match is already finished.
    pub fn tick(&mut self, strategy: &mut dyn MoveStrategy) -> bool {
        if self.state.is_finished() {
            return false;
        }

        let candidates = self.candidates();
        if candidates.is_empty() {
            self.end_turn();
            return true;
        }

        let choice = strategy.choose(&self.state, &candidates);
        let c = choice.candidate.min(candidates.len() - 1);
        let m = choice.mv.min(candidates[c].moves.len() - 1);
        let die_index = candidates[c].die_index;
        let mv = candidates[c].moves[m];

        self.apply_current(die_index, mv);
        true
    }

    /// Attempt a human-chosen move against the selected die.
    ///
    /// The move must consume the selected die (or the sole remaining one)
    /// and be in that die's legal set. Returns false, with no state change,
    /// otherwise.
    pub fn try_apply_human_move(&mut self, mv: Move) -> bool {
        if self.state.is_finished() {
            return false;
        }
        let Some(selected) = self.ensure_selected_die() else {
            return false;
        };

        let die = self.remaining[selected];
        if mv.pips() != die {
            return false;
        }

        let side = self.state.current_side();
        let legal = engine::legal_moves(
            &self.config,
            &self.state,
            side,
            die,
            self.head_used,
            self.head_limit,
        );
        if !legal.contains(&mv) {
            return false;
        }

        self.apply_current(selected, mv) != ApplyResult::Illegal
    }

    /// Select which remaining die the next human move consumes.
    pub fn select_die(&mut self, index: usize) -> bool {
        if index < self.remaining.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Resolve the selected die, defaulting to the sole remaining die.
    pub fn ensure_selected_die(&mut self) -> Option<usize> {
        match self.selected {
            Some(index) if index < self.remaining.len() => Some(index),
            _ if self.remaining.len() == 1 => {
                self.selected = Some(0);
                self.selected
            }
            _ => None,
        }
    }

    /// End the turn if no remaining die has a legal move.
    ///
    /// Returns true when the turn was ended.
    pub fn end_turn_if_no_moves(&mut self) -> bool {
        if self.state.is_finished() || self.has_any_legal_move() {
            return false;
        }
        self.end_turn();
        true
    }

    // === Queries ===

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// The validated ruleset in force.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Unconsumed die values for the current turn.
    #[must_use]
    pub fn remaining_dice(&self) -> &[u8] {
        &self.remaining
    }

    /// Die values already consumed this turn.
    #[must_use]
    pub fn used_dice(&self) -> &[u8] {
        &self.used
    }

    /// Index of the selected die within the remaining list.
    #[must_use]
    pub fn selected_die_index(&self) -> Option<usize> {
        self.selected
    }

    /// Value of the selected die.
    #[must_use]
    pub fn selected_die(&self) -> Option<u8> {
        self.selected.and_then(|i| self.remaining.get(i).copied())
    }

    /// The outcome drawn for the current turn.
    #[must_use]
    pub fn current_outcome(&self) -> &DrawnOutcome {
        &self.outcome
    }

    /// Head moves used this turn.
    #[must_use]
    pub fn head_moves_used(&self) -> u32 {
        self.head_used
    }

    /// This turn's head-move cap.
    #[must_use]
    pub fn head_move_limit(&self) -> u32 {
        self.head_limit
    }

    /// Draws left in a side's bag before its next rebuild.
    #[must_use]
    pub fn bag_remaining(&self, side: Side) -> usize {
        self.bags[side].remaining()
    }

    /// A side's bag population size per cycle.
    #[must_use]
    pub fn bag_total(&self, side: Side) -> usize {
        self.bags[side].total()
    }

    /// The full move log.
    #[must_use]
    pub fn log(&self) -> &Vector<MoveRecord> {
        &self.log
    }

    /// A single log entry.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&MoveRecord> {
        self.log.get(index)
    }

    /// Whether the match has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// The winner, once decided.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.state.winner()
    }

    /// Whether any remaining die has at least one legal move.
    #[must_use]
    pub fn has_any_legal_move(&self) -> bool {
        let side = self.state.current_side();
        self.remaining.iter().any(|&die| {
            !engine::legal_moves(
                &self.config,
                &self.state,
                side,
                die,
                self.head_used,
                self.head_limit,
            )
            .is_empty()
        })
    }

    /// Drain accumulated notifications in emission order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Turn cycle ===

    fn begin_match(&mut self) {
        self.events.push(EngineEvent::MatchStarted);
        self.begin_turn_cascade();
    }

    /// Draw the current side's outcome and set up the turn's dice state.
    fn begin_turn(&mut self) {
        let side = self.state.current_side();
        let draw = self.bags[side].draw();

        self.remaining = draw.pips.clone();
        self.used.clear();
        self.selected = if self.remaining.is_empty() {
            None
        } else {
            Some(0)
        };
        self.head_used = 0;
        self.head_limit = self.head_limit_for(side, &draw);
        self.outcome = draw;

        self.events.push(EngineEvent::TurnStarted {
            side,
            turn: self.state.turn_index(),
        });
    }

    fn head_limit_for(&self, side: Side, draw: &DrawnOutcome) -> u32 {
        if !self.config.head_rule.enabled {
            return u32::MAX;
        }
        if self.state.turns_taken(side) == 0 && draw.pips.len() >= 2 {
            if let Some(allowance) = self.config.head_allowance(draw.pips[0], draw.pips[1]) {
                return allowance;
            }
        }
        self.config.head_rule.default_limit
    }

    /// Begin turns until one has a legal move, the match dead-ends, or the
    /// turn limit hits. Implements the no-legal-move guard without unbounded
    /// recursion.
    ///
    /// A moveless turn with live dice is just an unlucky draw; the next draw
    /// may open the position again, so play cycles on toward the turn-limit
    /// timeout. Only draws granting no pips at all can dead-end a match:
    /// those cannot improve, so after `STALL_LIMIT` of them in a row the
    /// match ends with [`EndReason::NoMoves`].
    fn begin_turn_cascade(&mut self) {
        loop {
            self.begin_turn();
            if self.has_any_legal_move() {
                self.stalled_turns = 0;
                return;
            }

            if self.outcome.is_empty() {
                self.stalled_turns += 1;
                if self.stalled_turns >= Self::STALL_LIMIT {
                    self.force_finish(Side::First, EndReason::NoMoves);
                    return;
                }
            } else {
                self.stalled_turns = 0;
            }

            self.state.advance_turn();
            if self.reached_turn_limit() {
                self.force_finish(Side::First, EndReason::Timeout);
                return;
            }
        }
    }

    fn end_turn(&mut self) {
        self.state.advance_turn();
        if self.reached_turn_limit() {
            self.force_finish(Side::First, EndReason::Timeout);
            return;
        }
        self.begin_turn_cascade();
    }

    fn reached_turn_limit(&self) -> bool {
        self.state.turn_index() >= self.config.max_turns
    }

    /// Force-finish before any further dice are drawn.
    ///
    /// The fixed-side winner on timeout reproduces the reference behavior;
    /// no board-position tie-break is applied.
    fn force_finish(&mut self, winner: Side, reason: EndReason) {
        self.state.finish(winner);
        self.log.push_back(MoveRecord {
            side: self.state.current_side(),
            mv: None,
            from: None,
            to: None,
            pips: 0,
            outcome: self.outcome.clone(),
            remaining: self.remaining.clone(),
            result: ApplyResult::Finished,
            end_reason: Some(reason),
            winner: Some(winner),
        });
        self.events.push(EngineEvent::MatchEnded { winner, reason });
    }

    /// Playable dice with their legal moves, for the bot path.
    fn candidates(&self) -> Vec<DieCandidates> {
        let side = self.state.current_side();
        self.remaining
            .iter()
            .enumerate()
            .filter_map(|(die_index, &die)| {
                let moves = engine::legal_moves(
                    &self.config,
                    &self.state,
                    side,
                    die,
                    self.head_used,
                    self.head_limit,
                );
                (!moves.is_empty()).then_some(DieCandidates {
                    die_index,
                    die,
                    moves,
                })
            })
            .collect()
    }

    /// Apply a move, consume its die, log it, and advance the turn cycle.
    fn apply_current(&mut self, die_index: usize, mv: Move) -> ApplyResult {
        let side = self.state.current_side();
        let result = engine::apply(&self.config, &mut self.state, side, &mv);
        if result == ApplyResult::Illegal {
            return result;
        }

        let die = self.remaining.remove(die_index);
        self.used.push(die);
        self.selected = if self.remaining.is_empty() {
            None
        } else {
            Some(0)
        };

        if mv.from_cell() == Some(self.config.start_cell(side)) {
            self.head_used += 1;
        }

        let finished = result == ApplyResult::Finished;
        let record = MoveRecord {
            side,
            mv: Some(mv),
            from: mv.from_cell(),
            to: engine::destination(&self.config, side, &mv),
            pips: mv.pips(),
            outcome: self.outcome.clone(),
            remaining: self.remaining.clone(),
            result,
            end_reason: finished.then_some(EndReason::Win),
            winner: finished.then_some(side),
        };
        self.log.push_back(record.clone());
        self.events.push(EngineEvent::MoveApplied(record));

        if finished {
            self.events.push(EngineEvent::MatchEnded {
                winner: side,
                reason: EndReason::Win,
            });
        } else if self.remaining.is_empty() || !self.has_any_legal_move() {
            self.end_turn();
        }

        result
    }
}
