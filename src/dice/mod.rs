//! Weighted, without-replacement dice outcome generation.
//!
//! A `DiceBag` expands a side's outcome list into a population (each outcome
//! repeated `weight` times), then deals it out one draw at a time. When the
//! population is exhausted it is rebuilt and, in shuffled mode, reshuffled,
//! so short-term draw frequencies track the configured weights exactly.
//!
//! Sequential mode deals the population in definition order without
//! shuffling, which scripted tests rely on.

use serde::{Deserialize, Serialize};

use crate::core::{DiceOutcome, DrawnOutcome, GameRng};

/// How the bag orders its population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawMode {
    /// Unbiased reshuffle on every rebuild.
    Shuffled,
    /// Fixed repeating sequence in definition order.
    Sequential,
}

/// A weighted outcome pool drawn without replacement.
#[derive(Clone, Debug)]
pub struct DiceBag {
    outcomes: Vec<DiceOutcome>,
    /// Indices into `outcomes`, weight-expanded.
    population: Vec<usize>,
    cursor: usize,
    mode: DrawMode,
    rng: GameRng,
}

impl DiceBag {
    /// Build a bag from an outcome list.
    ///
    /// The population is built (and shuffled, in shuffled mode) eagerly so
    /// [`remaining`](Self::remaining) is meaningful before the first draw.
    #[must_use]
    pub fn new(outcomes: Vec<DiceOutcome>, mode: DrawMode, rng: GameRng) -> Self {
        let mut bag = Self {
            outcomes,
            population: Vec::new(),
            cursor: 0,
            mode,
            rng,
        };
        bag.rebuild();
        bag
    }

    /// Draw the next outcome, rebuilding the population when exhausted.
    ///
    /// An empty outcome configuration yields the neutral draw, never an
    /// error.
    pub fn draw(&mut self) -> DrawnOutcome {
        if self.population.is_empty() {
            return DrawnOutcome::neutral();
        }

        if self.cursor >= self.population.len() {
            self.rebuild();
        }

        let outcome = &self.outcomes[self.population[self.cursor]];
        self.cursor += 1;

        DrawnOutcome {
            label: outcome.label.clone(),
            pips: outcome.pips.clone(),
        }
    }

    /// Rebuild and reshuffle immediately, cursor back to zero.
    pub fn reset(&mut self) {
        self.rebuild();
    }

    /// Draws left before the next rebuild.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.population.len() - self.cursor
    }

    /// Population size per cycle (sum of weights).
    #[must_use]
    pub fn total(&self) -> usize {
        self.population.len()
    }

    fn rebuild(&mut self) {
        self.population.clear();
        for (index, outcome) in self.outcomes.iter().enumerate() {
            for _ in 0..outcome.weight.max(1) {
                self.population.push(index);
            }
        }

        if self.mode == DrawMode::Shuffled {
            self.rng.shuffle(&mut self.population);
        }

        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RulesConfig;

    fn rng() -> GameRng {
        GameRng::new(7).for_context("dice/test")
    }

    #[test]
    fn test_empty_config_draws_neutral() {
        let mut bag = DiceBag::new(vec![], DrawMode::Shuffled, rng());

        assert_eq!(bag.total(), 0);
        for _ in 0..5 {
            assert!(bag.draw().is_empty());
        }
    }

    #[test]
    fn test_sequential_repeats_definition_order() {
        let outcomes = vec![
            DiceOutcome::new("a", 1, &[1]),
            DiceOutcome::new("b", 2, &[2]),
        ];
        let mut bag = DiceBag::new(outcomes, DrawMode::Sequential, rng());

        let labels: Vec<_> = (0..6).map(|_| bag.draw().label).collect();
        assert_eq!(labels, vec!["a", "b", "b", "a", "b", "b"]);
    }

    #[test]
    fn test_weights_respected_per_cycle() {
        let outcomes = vec![
            DiceOutcome::new("rare", 1, &[1]),
            DiceOutcome::new("common", 5, &[2]),
        ];
        let mut bag = DiceBag::new(outcomes, DrawMode::Shuffled, rng());
        assert_eq!(bag.total(), 6);

        // One full cycle contains exactly the weighted counts.
        let mut rare = 0;
        let mut common = 0;
        for _ in 0..6 {
            match bag.draw().label.as_str() {
                "rare" => rare += 1,
                "common" => common += 1,
                other => panic!("unexpected label {other}"),
            }
        }
        assert_eq!(rare, 1);
        assert_eq!(common, 5);
    }

    #[test]
    fn test_remaining_counts_down_and_rebuilds() {
        let outcomes = vec![DiceOutcome::new("a", 2, &[3])];
        let mut bag = DiceBag::new(outcomes, DrawMode::Sequential, rng());

        assert_eq!(bag.remaining(), 2);
        let _ = bag.draw();
        assert_eq!(bag.remaining(), 1);
        let _ = bag.draw();
        assert_eq!(bag.remaining(), 0);

        // Next draw triggers a rebuild.
        let drawn = bag.draw();
        assert_eq!(drawn.label, "a");
        assert_eq!(bag.remaining(), 1);
    }

    #[test]
    fn test_reset_restores_full_population() {
        let mut bag = DiceBag::new(RulesConfig::standard_two_dice(), DrawMode::Shuffled, rng());
        let total = bag.total();

        let _ = bag.draw();
        let _ = bag.draw();
        assert_eq!(bag.remaining(), total - 2);

        bag.reset();
        assert_eq!(bag.remaining(), total);
    }

    #[test]
    fn test_shuffled_is_deterministic_per_seed() {
        let outcomes = RulesConfig::standard_two_dice();
        let mut bag1 = DiceBag::new(outcomes.clone(), DrawMode::Shuffled, rng());
        let mut bag2 = DiceBag::new(outcomes, DrawMode::Shuffled, rng());

        for _ in 0..50 {
            assert_eq!(bag1.draw(), bag2.draw());
        }
    }
}
