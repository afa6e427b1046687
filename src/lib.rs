//! # ludo-race
//!
//! A four-player Ludo race where each player is its own thread.
//!
//! ## Design Principles
//!
//! 1. **One lock span per move**: the rule engine checks and commits a move
//!    under the same game lock, so a legality decision can never go stale.
//!
//! 2. **Turns are granted, not contended**: a single coordinator hands out
//!    one turn at a time over channels. Actors never wait on each other.
//!
//! 3. **Seeded and reproducible**: every roll comes from one seeded stream,
//!    drawn in the order turns are granted.
//!
//! ## Modules
//!
//! - `core`: Players, tokens, game state, snapshots, RNG, configuration
//! - `board`: Cells, terrain, the race track, occupancy
//! - `rules`: Movement legality, captures, home gating, win detection
//! - `scheduler`: Shared dice, player actors, turn coordinator
//! - `controller`: Game setup, thread launch, standings, render hooks

pub mod board;
pub mod controller;
pub mod core;
pub mod rules;
pub mod scheduler;

// Re-export commonly used types
pub use crate::core::{
    Color, ConfigError, GameConfig, GameError, GameRng, GameSnapshot, GameState, PlayerId, PlayerMap,
    PlayerState, SnapshotError, TeamId, TokenPos, TokenRef,
};

pub use crate::board::{Board, Cell, PathTable, TerrainGrid, TerrainKind, PATH_LENGTH};

pub use crate::rules::{MoveOutcome, MoveRejection, RuleEngine};

pub use crate::scheduler::{DiceSource, GameEnd, ScriptedDice, SharedDice, TurnEvent, TurnReport};

pub use crate::controller::{GameController, GameSummary, NullRenderer, Renderer, Standings, TextRenderer};
