//! Ruleset configuration.
//!
//! The engine is configuration-driven: board geometry, stone counts,
//! blocking behavior, head-move limits, and dice-bag contents all come from
//! `RulesConfig`, provided by the embedding application at session creation.
//!
//! Configuration is designer-authored and must never crash a session:
//! `validate()` silently clamps out-of-range values to sane bounds instead
//! of surfacing faults. Sessions only ever see a validated config.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::side::{Side, SideMap};

/// One entry in a side's dice bag.
///
/// The bag population repeats each outcome `weight` times, so relative
/// weights control draw frequency. `pips` holds the die values the outcome
/// grants for the turn (a double grants four).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    /// Human-readable label ("3-4", "6-6", ...).
    pub label: String,

    /// Copies of this outcome in the bag population. Clamped to >= 1.
    pub weight: u32,

    /// Die values granted for the turn.
    pub pips: SmallVec<[u8; 4]>,
}

impl DiceOutcome {
    /// Create a new outcome.
    pub fn new(label: impl Into<String>, weight: u32, pips: &[u8]) -> Self {
        Self {
            label: label.into(),
            weight,
            pips: SmallVec::from_slice(pips),
        }
    }
}

/// Head-move restriction: how many moves per turn may leave the start cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRule {
    /// Whether the restriction applies at all.
    pub enabled: bool,

    /// Per-turn cap on moves originating from the head cell.
    pub default_limit: u32,

    /// First-turn allowances keyed by the unordered pair of dice rolled.
    ///
    /// Keys are stored sorted; use [`RulesConfig::head_allowance`] to look
    /// one up. Serialized as a sorted entry list, since JSON maps need
    /// string keys.
    #[serde(with = "first_turn_entries")]
    pub first_turn: FxHashMap<(u8, u8), u32>,
}

impl HeadRule {
    /// The classic rule: one head move per turn, with a larger allowance
    /// for the big doubles on a side's very first turn.
    #[must_use]
    pub fn classic() -> Self {
        let mut first_turn = FxHashMap::default();
        first_turn.insert((3, 3), 2);
        first_turn.insert((4, 4), 2);
        first_turn.insert((6, 6), 2);

        Self {
            enabled: true,
            default_limit: 1,
            first_turn,
        }
    }

    /// No restriction.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            default_limit: 0,
            first_turn: FxHashMap::default(),
        }
    }
}

/// Complete ruleset for one match.
///
/// Build one, then call [`validate`](Self::validate) before handing it to a
/// session. `Session::new` validates internally, so manual validation is
/// only needed when inspecting the corrected values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Number of cells on the closed path.
    pub board_size: usize,

    /// Cells in each side's home zone (also the entry-door count).
    pub home_size: usize,

    /// Stones each side races to bear off.
    pub stones_per_side: u32,

    /// Each side's start ("head") cell, absolute.
    pub start_cells: SideMap<usize>,

    /// Each side's movement direction along the path, +1 or -1.
    pub directions: SideMap<i8>,

    /// Landing on a lone opponent stone hits it to the bar.
    pub allow_hit_single_stone: bool,

    /// Any opponent presence blocks a cell (takes precedence over hitting).
    pub block_if_any_opponent: bool,

    /// Turn count at which the match is force-finished.
    pub max_turns: u32,

    /// Head-move restriction.
    pub head_rule: HeadRule,

    /// Dice-bag contents per side.
    pub dice: SideMap<Vec<DiceOutcome>>,
}

impl RulesConfig {
    /// The standard two-dice outcome set: every unordered pair of d6 faces,
    /// non-doubles weighted 2 (two orderings), doubles weighted 1 and
    /// granting four pips.
    #[must_use]
    pub fn standard_two_dice() -> Vec<DiceOutcome> {
        let mut outcomes = Vec::new();
        for a in 1..=6u8 {
            for b in a..=6u8 {
                if a == b {
                    outcomes.push(DiceOutcome::new(format!("{a}-{a}"), 1, &[a, a, a, a]));
                } else {
                    outcomes.push(DiceOutcome::new(format!("{a}-{b}"), 2, &[a, b]));
                }
            }
        }
        outcomes
    }

    /// Clamp every field to valid bounds and normalize derived data.
    ///
    /// Never fails: out-of-range values are corrected silently.
    #[must_use]
    pub fn validate(mut self) -> Self {
        self.board_size = self.board_size.clamp(4, 64);
        self.home_size = self.home_size.clamp(1, self.board_size / 2);
        self.stones_per_side = self.stones_per_side.clamp(1, 32);
        self.max_turns = self.max_turns.max(1);

        for side in Side::all() {
            self.start_cells[side] %= self.board_size;
            let dir = self.directions[side];
            self.directions[side] = if dir < 0 { -1 } else { 1 };

            for outcome in self.dice.get_mut(side) {
                outcome.weight = outcome.weight.max(1);
                outcome.pips.retain(|p| *p > 0);
            }
        }

        // Keys are looked up sorted; normalize entries authored either way.
        let normalized = self
            .head_rule
            .first_turn
            .drain()
            .map(|((a, b), limit)| (sort_pair(a, b), limit))
            .collect();
        self.head_rule.first_turn = normalized;

        self
    }

    /// First-turn head allowance for an unordered pair of dice, if any.
    #[must_use]
    pub fn head_allowance(&self, a: u8, b: u8) -> Option<u32> {
        self.head_rule.first_turn.get(&sort_pair(a, b)).copied()
    }

    /// A side's start cell.
    #[must_use]
    pub fn start_cell(&self, side: Side) -> usize {
        self.start_cells[side]
    }
}

impl Default for RulesConfig {
    /// The classic long-game layout: 24 cells, 6-cell homes, 15 stones,
    /// heads at opposite quarters, no hitting, full blocking, head rule on.
    fn default() -> Self {
        Self {
            board_size: 24,
            home_size: 6,
            stones_per_side: 15,
            start_cells: SideMap::new(|s| match s {
                Side::First => 0,
                Side::Second => 12,
            }),
            directions: SideMap::with_value(1),
            allow_hit_single_stone: false,
            block_if_any_opponent: true,
            max_turns: 400,
            head_rule: HeadRule::classic(),
            dice: SideMap::with_value(Self::standard_two_dice()),
        }
    }
}

fn sort_pair(a: u8, b: u8) -> (u8, u8) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

mod first_turn_entries {
    use rustc_hash::FxHashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &FxHashMap<(u8, u8), u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(u8, u8, u32)> =
            map.iter().map(|(&(a, b), &limit)| (a, b, limit)).collect();
        entries.sort_unstable();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FxHashMap<(u8, u8), u32>, D::Error> {
        let entries = Vec::<(u8, u8, u32)>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|(a, b, limit)| ((a, b), limit))
            .collect())
    }
}
