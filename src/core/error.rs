//! Error types.
//!
//! Rule violations are not errors here: an illegal move is reported as a
//! [`MoveRejection`](crate::rules::MoveRejection) and leaves state untouched.

use std::path::PathBuf;

use super::player::PlayerId;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Errors raised while encoding, decoding or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("snapshot has {found} players, expected {expected}")]
    PlayerCount { expected: usize, found: usize },

    #[error("{player} has {found} tokens, expected 1 to 4")]
    TokenCount { player: PlayerId, found: usize },

    #[error("{player} token {token} has invalid position {position}")]
    Position {
        player: PlayerId,
        token: usize,
        position: i16,
    },
}

/// Errors that abort a running game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to spawn actor thread for {player}: {source}")]
    Spawn {
        player: PlayerId,
        source: std::io::Error,
    },

    #[error("actor for {0} stopped before reporting its turn")]
    ActorLost(PlayerId),

    #[error("actor thread for {0} panicked")]
    ActorPanicked(PlayerId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::PlayerCount {
            expected: 4,
            found: 3,
        };
        assert_eq!(err.to_string(), "snapshot has 3 players, expected 4");

        let err = SnapshotError::Position {
            player: PlayerId::new(1),
            token: 2,
            position: 60,
        };
        assert_eq!(err.to_string(), "Yellow token 2 has invalid position 60");
    }

    #[test]
    fn test_game_error_display() {
        let err = GameError::ActorLost(PlayerId::new(3));
        assert_eq!(err.to_string(), "actor for Blue stopped before reporting its turn");
    }
}
