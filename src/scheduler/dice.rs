//! The shared die and its permit.
//!
//! All actors roll the same die. `SharedDice` wraps it in a mutex, which is
//! the dice permit: one roll at a time, in the order the coordinator grants
//! turns, so a seeded game replays identically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::GameRng;

/// Anything that yields die rolls.
pub trait DiceSource: Send {
    /// Next roll, normally in `1..=6`.
    fn roll(&mut self) -> u8;
}

impl DiceSource for GameRng {
    fn roll(&mut self) -> u8 {
        self.roll_die()
    }
}

/// Fixed roll sequence, repeated once exhausted.
///
/// ```
/// use ludo_race::scheduler::{DiceSource, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([6, 2]);
/// assert_eq!((dice.roll(), dice.roll(), dice.roll()), (6, 2, 6));
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    rolls: VecDeque<u8>,
}

impl ScriptedDice {
    /// # Panics
    /// Panics if `rolls` is empty.
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        let rolls: VecDeque<u8> = rolls.into_iter().collect();
        assert!(!rolls.is_empty(), "ScriptedDice needs at least one roll");
        Self { rolls }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let roll = self.rolls.pop_front().unwrap_or(1);
        self.rolls.push_back(roll);
        roll
    }
}

/// Cloneable handle to the one die all actors share.
#[derive(Clone)]
pub struct SharedDice {
    source: Arc<Mutex<Box<dyn DiceSource>>>,
}

impl SharedDice {
    pub fn new(source: impl DiceSource + 'static) -> Self {
        Self {
            source: Arc::new(Mutex::new(Box::new(source))),
        }
    }

    /// Take the permit, roll once, release.
    pub fn roll(&self) -> u8 {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        source.roll()
    }
}

impl std::fmt::Debug for SharedDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDice").finish_non_exhaustive()
    }
}
