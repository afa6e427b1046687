//! Move legality, captures and win checks.
//!
//! `RuleEngine` is stateless; every call runs against a `GameState` the
//! caller has already locked.

pub mod engine;
pub mod outcome;

pub use engine::{RuleEngine, SIX};
pub use outcome::{Capture, MoveOutcome, MovePlan, MoveRejection, RollOutcome};
