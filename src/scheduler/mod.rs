//! Turn scheduling across concurrently running player actors.
//!
//! - `dice`: the shared die behind a mutex (the dice permit)
//! - `actor`: one thread per player, playing turns when granted
//! - `coordinator`: the round-robin that grants turns one at a time

pub mod actor;
pub mod coordinator;
pub mod dice;

pub use actor::{PlayerActor, TurnEvent, TurnReport, FORFEIT_SIXES};
pub use coordinator::{GameEnd, Seat, TurnCoordinator, TurnLog, TurnSignal};
pub use dice::{DiceSource, ScriptedDice, SharedDice};
