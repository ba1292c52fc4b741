//! Core types: sides, configuration, RNG, moves, and records.

pub mod config;
pub mod moves;
pub mod rng;
pub mod side;

pub use config::{DiceOutcome, HeadRule, RulesConfig};
pub use moves::{ApplyResult, DrawnOutcome, EndReason, Move, MoveRecord};
pub use rng::GameRng;
pub use side::{Side, SideMap};
