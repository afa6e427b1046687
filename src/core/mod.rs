//! Core types: players, tokens, state, RNG, configuration and errors.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod token;

pub use config::{GameConfig, MAX_TOKENS};
pub use error::{ConfigError, GameError, SnapshotError};
pub use player::{Color, PlayerId, PlayerMap, TeamId, NUM_PLAYERS};
pub use rng::GameRng;
pub use snapshot::{BoardView, GameSnapshot, PlayerSnapshot, TokenView};
pub use state::{GameState, PlayerState};
pub use token::{TokenPos, TokenRef};
