//! State capture for renderers, reports and restore.
//!
//! - [`BoardView`]: read-only render input (terrain + placed tokens).
//! - [`GameSnapshot`]: serialisable player/game state. Occupancy is not
//!   stored; it is rebuilt from token positions on restore.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::MAX_TOKENS;
use super::error::SnapshotError;
use super::player::{Color, PlayerId, PlayerMap, TeamId, NUM_PLAYERS};
use super::state::{GameState, PlayerState, Tokens};
use super::token::{TokenPos, TokenRef};
use crate::board::{Cell, TerrainGrid};

/// A token as the renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenView {
    pub token: TokenRef,
    pub color: Color,
    pub cell: Cell,
}

/// Render input: terrain grid plus every token on the track.
#[derive(Clone, Debug)]
pub struct BoardView {
    pub terrain: Arc<TerrainGrid>,
    pub tokens: Vec<TokenView>,
}

impl BoardView {
    /// Token shown at `cell`: the lowest seat wins when several share it.
    #[must_use]
    pub fn token_at(&self, cell: Cell) -> Option<&TokenView> {
        self.tokens
            .iter()
            .filter(|t| t.cell == cell)
            .min_by_key(|t| t.token)
    }
}

/// Serialisable state of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    /// Numeric positions: -1 yard, 0..52 track, 52 home.
    pub positions: Vec<i16>,
    pub capture_count: u32,
    pub active: bool,
    pub rank: Option<u8>,
}

impl PlayerSnapshot {
    /// A player with every token in the yard.
    #[must_use]
    pub fn fresh(id: PlayerId, num_tokens: usize) -> Self {
        Self {
            id,
            positions: vec![-1; num_tokens],
            capture_count: 0,
            active: true,
            rank: None,
        }
    }
}

/// Serialisable state of the whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub team_mode: bool,
    pub current_rank: u8,
    pub game_over: bool,
    pub players: Vec<PlayerSnapshot>,
}

impl GameSnapshot {
    /// A fresh game in snapshot form.
    #[must_use]
    pub fn fresh(num_tokens: usize, team_mode: bool) -> Self {
        Self {
            team_mode,
            current_rank: 1,
            game_over: false,
            players: PlayerId::all(NUM_PLAYERS)
                .map(|id| PlayerSnapshot::fresh(id, num_tokens))
                .collect(),
        }
    }

    /// Encode with bincode.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl GameState {
    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            team_mode: self.team_mode(),
            current_rank: self.current_rank(),
            game_over: self.is_over(),
            players: self
                .players()
                .map(|p| PlayerSnapshot {
                    id: p.id(),
                    positions: p.tokens().iter().map(|t| t.as_index()).collect(),
                    capture_count: p.capture_count(),
                    active: p.is_active(),
                    rank: p.rank(),
                })
                .collect(),
        }
    }

    /// Rebuild a state from a snapshot, validating every position.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.players.len() != NUM_PLAYERS {
            return Err(SnapshotError::PlayerCount {
                expected: NUM_PLAYERS,
                found: snapshot.players.len(),
            });
        }

        let mut players = Vec::with_capacity(NUM_PLAYERS);
        for (seat, entry) in PlayerId::all(NUM_PLAYERS).zip(&snapshot.players) {
            let count = entry.positions.len();
            if !(1..=MAX_TOKENS).contains(&count) {
                return Err(SnapshotError::TokenCount { player: seat, found: count });
            }
            let tokens = entry
                .positions
                .iter()
                .enumerate()
                .map(|(token, &position)| {
                    TokenPos::from_index(position).ok_or(SnapshotError::Position {
                        player: seat,
                        token,
                        position,
                    })
                })
                .collect::<Result<Tokens, _>>()?;

            let team = snapshot.team_mode.then(|| TeamId::of(seat));
            players.push(PlayerState::from_parts(
                seat,
                tokens,
                entry.capture_count,
                entry.active,
                entry.rank,
                team,
            ));
        }

        Ok(GameState::from_parts(
            PlayerMap::from_vec(players),
            snapshot.current_rank,
            snapshot.team_mode,
            snapshot.game_over,
        ))
    }

    /// Read-only render input.
    #[must_use]
    pub fn board_view(&self) -> BoardView {
        let mut tokens: Vec<TokenView> = self
            .board()
            .occupied_cells()
            .flat_map(|(cell, occupants)| {
                occupants.iter().map(move |&token| TokenView {
                    token,
                    color: token.player.color(),
                    cell,
                })
            })
            .collect();
        tokens.sort_by_key(|t| t.token);

        BoardView {
            terrain: self.board().terrain(),
            tokens,
        }
    }
}
