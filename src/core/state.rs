//! Game state: players, tokens, board occupancy and game-level counters.
//!
//! ## PlayerState
//!
//! Token positions, capture count, finished count, active flag, rank and
//! optional team.
//!
//! ## GameState
//!
//! Owns every `PlayerState` and the `Board`. Shared between actors behind a
//! single mutex; every field is private and mutated only through
//! `pub(crate)` helpers called by the rule engine, so the board's occupancy
//! always mirrors token positions.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

use super::config::{GameConfig, MAX_TOKENS};
use super::player::{Color, PlayerId, PlayerMap, TeamId, NUM_PLAYERS};
use super::token::{TokenPos, TokenRef};
use crate::board::{Board, Cell, PathTable};

/// Token positions of one player.
pub type Tokens = SmallVec<[TokenPos; MAX_TOKENS]>;

/// Per-player state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    id: PlayerId,
    tokens: Tokens,
    capture_count: u32,
    finished_count: u8,
    active: bool,
    rank: Option<u8>,
    team: Option<TeamId>,
}

impl PlayerState {
    /// A fresh player with every token in the yard.
    #[must_use]
    pub fn new(id: PlayerId, num_tokens: usize, team: Option<TeamId>) -> Self {
        Self {
            id,
            tokens: (0..num_tokens).map(|_| TokenPos::Yard).collect(),
            capture_count: 0,
            finished_count: 0,
            active: true,
            rank: None,
            team,
        }
    }

    pub(crate) fn from_parts(
        id: PlayerId,
        tokens: Tokens,
        capture_count: u32,
        active: bool,
        rank: Option<u8>,
        team: Option<TeamId>,
    ) -> Self {
        let finished_count = tokens.iter().filter(|t| t.is_home()).count() as u8;
        Self {
            id,
            tokens,
            capture_count,
            finished_count,
            active,
            rank,
            team,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.id.color()
    }

    #[must_use]
    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// All token positions, by token index.
    #[must_use]
    pub fn tokens(&self) -> &[TokenPos] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, index: usize) -> Option<TokenPos> {
        self.tokens.get(index).copied()
    }

    /// Opposing tokens this player has sent back to the yard.
    #[must_use]
    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }

    /// Tokens retired home.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.finished_count as usize
    }

    /// All tokens are home.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.finished_count() == self.num_tokens()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Finishing rank, 1 = first. `None` until assigned.
    #[must_use]
    pub fn rank(&self) -> Option<u8> {
        self.rank
    }

    #[must_use]
    pub fn team(&self) -> Option<TeamId> {
        self.team
    }
}

/// Complete shared game state.
#[derive(Clone, Debug)]
pub struct GameState {
    players: PlayerMap<PlayerState>,
    board: Board,
    active_count: usize,
    current_rank: u8,
    team_mode: bool,
    game_over: bool,
}

impl GameState {
    /// Fresh game: four players, all tokens in their yards.
    ///
    /// The config is normalised first, so an out-of-range token count
    /// becomes the default.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let config = config.clone().normalized();
        let team_mode = config.team_mode;
        let players = PlayerMap::new(NUM_PLAYERS, |id| {
            PlayerState::new(id, config.tokens_per_player, team_mode.then(|| TeamId::of(id)))
        });

        Self {
            players,
            board: Board::new(),
            active_count: NUM_PLAYERS,
            current_rank: 1,
            team_mode,
            game_over: false,
        }
    }

    /// Assemble a state from restored parts; occupancy is rebuilt from positions.
    pub(crate) fn from_parts(
        players: PlayerMap<PlayerState>,
        current_rank: u8,
        team_mode: bool,
        game_over: bool,
    ) -> Self {
        let active_count = players.values().filter(|p| p.active).count();
        let mut state = Self {
            players,
            board: Board::new(),
            active_count,
            current_rank,
            team_mode,
            game_over,
        };
        state.rebuild_occupancy();
        state
    }

    // === Queries ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    /// Lookup that tolerates unknown seats.
    #[must_use]
    pub fn try_player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        self.players.player_ids()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn team_mode(&self) -> bool {
        self.team_mode
    }

    /// Players still racing.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Rank the next finisher will receive.
    #[must_use]
    pub fn current_rank(&self) -> u8 {
        self.current_rank
    }

    /// Game over: a team has won, the turn cap was hit, or fewer than two
    /// players remain active.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game_over || self.active_count < 2
    }

    /// The partner seat in team mode.
    #[must_use]
    pub fn teammate(&self, id: PlayerId) -> Option<PlayerId> {
        if !self.team_mode {
            return None;
        }
        TeamId::of(id).members().into_iter().find(|&m| m != id)
    }

    #[must_use]
    pub fn are_teammates(&self, a: PlayerId, b: PlayerId) -> bool {
        a != b && self.teammate(a) == Some(b)
    }

    /// At least one capture by this player, or in team mode by either teammate.
    #[must_use]
    pub fn has_capture_credit(&self, id: PlayerId) -> bool {
        self.player(id).capture_count > 0
            || self
                .teammate(id)
                .is_some_and(|mate| self.player(mate).capture_count > 0)
    }

    /// Board cell of a token, if it is on the track.
    #[must_use]
    pub fn token_cell(&self, token: TokenRef) -> Option<Cell> {
        let step = self.try_player(token.player)?.token(token.index as usize)?.step()?;
        PathTable::cell(token.player.color(), step)
    }

    /// A finished player in team mode whose teammate is still racing.
    /// It keeps a turn slot to roll for the teammate.
    #[must_use]
    pub fn is_helper(&self, id: PlayerId) -> bool {
        let player = self.player(id);
        !player.active
            && player.has_finished()
            && self
                .teammate(id)
                .is_some_and(|mate| self.player(mate).active && !self.player(mate).has_finished())
    }

    /// Should the scheduler grant this player a turn?
    #[must_use]
    pub fn is_schedulable(&self, id: PlayerId) -> bool {
        !self.is_over() && (self.player(id).active || self.is_helper(id))
    }

    /// Check structural invariants. Returns the first violation found.
    ///
    /// - occupancy matches token positions exactly
    /// - `finished_count` matches home tokens and never exceeds `num_tokens`
    /// - `active_count` matches active players
    /// - ranked players are inactive, ranks are below `current_rank`
    /// - no safe cell holds tokens of two non-teammate players
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut expected = 0usize;
        for player in self.players() {
            let home = player.tokens.iter().filter(|t| t.is_home()).count();
            if home != player.finished_count() || home > player.num_tokens() {
                return Err(format!("{} finished_count {} != home tokens {home}", player.id, player.finished_count));
            }
            if let Some(rank) = player.rank {
                if player.active {
                    return Err(format!("{} is ranked {rank} but still active", player.id));
                }
                if rank >= self.current_rank {
                    return Err(format!("{} rank {rank} not below current rank {}", player.id, self.current_rank));
                }
            }
            for index in 0..player.num_tokens() {
                let token = TokenRef::new(player.id, index as u8);
                if let Some(cell) = self.token_cell(token) {
                    expected += 1;
                    if !self.board.occupants(cell).contains(&token) {
                        return Err(format!("{token} missing from board at {cell}"));
                    }
                }
            }
        }

        let placed: usize = self.board.occupied_cells().map(|(_, t)| t.len()).sum();
        if placed != expected {
            return Err(format!("board holds {placed} tokens, expected {expected}"));
        }

        let active = self.players().filter(|p| p.active).count();
        if active != self.active_count {
            return Err(format!("active_count {} != active players {active}", self.active_count));
        }

        for (cell, tokens) in self.board.occupied_cells() {
            if !self.board.terrain_at(cell).is_safe() {
                continue;
            }
            for a in tokens {
                for b in tokens {
                    if a.player != b.player && !self.are_teammates(a.player, b.player) {
                        return Err(format!("safe cell {cell} shared by {a} and {b}"));
                    }
                }
            }
        }

        Ok(())
    }

    // === Mutation (rule engine only) ===

    /// Move a token to `to`, keeping occupancy and `finished_count` in step.
    pub(crate) fn relocate_token(&mut self, token: TokenRef, to: TokenPos) {
        let color = token.player.color();
        let index = token.index as usize;
        let from = self.players[token.player].tokens[index];

        if let Some(cell) = from.step().and_then(|s| PathTable::cell(color, s)) {
            let removed = self.board.remove_token(token, cell);
            debug_assert!(removed, "{token} was not on the board at {cell}");
        }
        if let Some(cell) = to.step().and_then(|s| PathTable::cell(color, s)) {
            self.board.place_token(token, cell);
        }

        let player = &mut self.players[token.player];
        if to.is_home() && !from.is_home() {
            player.finished_count += 1;
        }
        player.tokens[index] = to;
    }

    pub(crate) fn record_capture(&mut self, id: PlayerId) {
        self.players[id].capture_count += 1;
    }

    /// Mark a player inactive. Returns false if already inactive.
    pub(crate) fn deactivate(&mut self, id: PlayerId) -> bool {
        let player = &mut self.players[id];
        if !player.active {
            return false;
        }
        player.active = false;
        self.active_count -= 1;
        true
    }

    /// Assign `rank` unless the player already has one.
    pub(crate) fn assign_rank(&mut self, id: PlayerId, rank: u8) -> bool {
        let player = &mut self.players[id];
        if player.rank.is_some() {
            return false;
        }
        player.rank = Some(rank);
        true
    }

    /// Give the next rank to a player and take it out of play.
    pub(crate) fn rank_next(&mut self, id: PlayerId) -> Option<u8> {
        let rank = self.current_rank;
        if !self.assign_rank(id, rank) {
            return None;
        }
        self.current_rank += 1;
        self.deactivate(id);
        Some(rank)
    }

    pub(crate) fn advance_rank(&mut self, by: u8) {
        self.current_rank += by;
    }

    /// Rank players waiting with every token home, in seat order.
    pub(crate) fn rank_waiting(&mut self) {
        let waiting: Vec<PlayerId> = self
            .players()
            .filter(|p| p.rank.is_none() && p.has_finished())
            .map(|p| p.id)
            .collect();
        for id in waiting {
            self.rank_next(id);
        }
    }

    /// How far a player has got: tokens home, then steps covered by all tokens.
    #[must_use]
    pub fn progress(&self, id: PlayerId) -> (usize, u32) {
        let player = self.player(id);
        let steps = player
            .tokens
            .iter()
            .map(|t| (t.as_index() + 1) as u32)
            .sum();
        (player.finished_count(), steps)
    }

    /// End the game: rank every unranked player by progress, ties in seat order.
    pub(crate) fn finish_game(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;

        let mut unranked: Vec<PlayerId> = self
            .players()
            .filter(|p| p.rank.is_none())
            .map(|p| p.id)
            .collect();
        unranked.sort_by_key(|&id| Reverse(self.progress(id)));
        for id in unranked {
            self.rank_next(id);
        }
        for id in PlayerId::all(self.player_count()) {
            self.deactivate(id);
        }

        info!(
            standings = ?self.players().map(|p| (p.color(), p.rank)).collect::<Vec<_>>(),
            "game over"
        );
    }

    fn rebuild_occupancy(&mut self) {
        self.board.clear_occupancy();
        for player in self.players.values() {
            for (index, pos) in player.tokens.iter().enumerate() {
                if let Some(cell) = pos.step().and_then(|s| PathTable::cell(player.id.color(), s)) {
                    self.board.place_token(TokenRef::new(player.id, index as u8), cell);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_token(index: u8) -> TokenRef {
        TokenRef::new(PlayerId::new(0), index)
    }

    #[test]
    fn test_new_game() {
        let state = GameState::new(&GameConfig::new().with_tokens(3));

        assert_eq!(state.player_count(), 4);
        assert_eq!(state.active_count(), 4);
        assert_eq!(state.current_rank(), 1);
        assert!(!state.is_over());
        for player in state.players() {
            assert_eq!(player.num_tokens(), 3);
            assert!(player.tokens().iter().all(|t| t.is_yard()));
            assert_eq!(player.team(), None);
        }
        assert_eq!(state.board().occupied_cells().count(), 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_invalid_token_count_normalised() {
        let state = GameState::new(&GameConfig::new().with_tokens(9));
        assert_eq!(state.player(PlayerId::new(0)).num_tokens(), 4);
    }

    #[test]
    fn test_teammates() {
        let solo = GameState::new(&GameConfig::new());
        assert_eq!(solo.teammate(PlayerId::new(0)), None);

        let teams = GameState::new(&GameConfig::new().with_team_mode(true));
        assert_eq!(teams.teammate(PlayerId::new(0)), Some(PlayerId::new(1)));
        assert_eq!(teams.teammate(PlayerId::new(3)), Some(PlayerId::new(2)));
        assert!(teams.are_teammates(PlayerId::new(2), PlayerId::new(3)));
        assert!(!teams.are_teammates(PlayerId::new(1), PlayerId::new(2)));
        assert_eq!(teams.player(PlayerId::new(2)).team(), Some(TeamId(1)));
    }

    #[test]
    fn test_relocate_keeps_board_in_step() {
        let mut state = GameState::new(&GameConfig::new().with_tokens(2));

        state.relocate_token(red_token(0), TokenPos::Track(0));
        assert_eq!(state.token_cell(red_token(0)), Some(Cell::new(6, 1)));
        assert_eq!(state.board().occupants(Cell::new(6, 1)), &[red_token(0)]);

        state.relocate_token(red_token(0), TokenPos::Track(5));
        assert!(state.board().occupants(Cell::new(6, 1)).is_empty());
        assert_eq!(state.board().occupants(Cell::new(5, 6)), &[red_token(0)]);

        state.relocate_token(red_token(0), TokenPos::Home);
        assert_eq!(state.player(PlayerId::new(0)).finished_count(), 1);
        assert_eq!(state.board().occupied_cells().count(), 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_capture_credit_shared_in_team_mode() {
        let mut state = GameState::new(&GameConfig::new().with_team_mode(true));
        assert!(!state.has_capture_credit(PlayerId::new(0)));

        state.record_capture(PlayerId::new(1));
        assert!(state.has_capture_credit(PlayerId::new(0)));
        assert!(state.has_capture_credit(PlayerId::new(1)));
        assert!(!state.has_capture_credit(PlayerId::new(2)));
    }

    #[test]
    fn test_rank_next_once() {
        let mut state = GameState::new(&GameConfig::new());

        assert_eq!(state.rank_next(PlayerId::new(2)), Some(1));
        assert_eq!(state.rank_next(PlayerId::new(2)), None);
        assert_eq!(state.active_count(), 3);
        assert_eq!(state.current_rank(), 2);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_finish_game_ranks_everyone() {
        let mut state = GameState::new(&GameConfig::new());
        state.rank_next(PlayerId::new(3));

        state.finish_game();

        assert!(state.is_over());
        assert_eq!(state.active_count(), 0);
        let ranks: Vec<_> = state.players().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![Some(2), Some(3), Some(4), Some(1)]);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_finish_game_ranks_by_progress() {
        let mut state = GameState::new(&GameConfig::new().with_tokens(2).with_team_mode(true));
        state.relocate_token(TokenRef::new(PlayerId::new(2), 0), TokenPos::Track(45));
        state.relocate_token(TokenRef::new(PlayerId::new(3), 0), TokenPos::Track(45));
        state.relocate_token(TokenRef::new(PlayerId::new(1), 0), TokenPos::Home);

        state.finish_game();

        let ranks: Vec<_> = state.players().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![Some(4), Some(1), Some(2), Some(3)]);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_rank_waiting_skips_racers() {
        let mut state = GameState::new(&GameConfig::new().with_tokens(1).with_team_mode(true));
        for id in [PlayerId::new(0), PlayerId::new(2)] {
            state.relocate_token(TokenRef::new(id, 0), TokenPos::Home);
            state.deactivate(id);
        }

        state.rank_waiting();

        assert_eq!(state.player(PlayerId::new(0)).rank(), Some(1));
        assert_eq!(state.player(PlayerId::new(2)).rank(), Some(2));
        assert_eq!(state.player(PlayerId::new(1)).rank(), None);
        assert_eq!(state.current_rank(), 3);
        state.check_invariants().unwrap();
    }
}
