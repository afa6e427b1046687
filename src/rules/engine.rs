//! Movement and rule engine.
//!
//! Every function takes the `GameState` the caller has locked, so a
//! legality check and the commit that follows it always run in the same
//! critical section. [`RuleEngine::apply_move`] re-plans the move itself
//! and refuses without side effects when it is illegal.
//!
//! ## Rules
//!
//! - A yard token enters on a six, onto its colour's (safe) entry square.
//! - Passing the end of the track without a capture credit loops back to
//!   the start; with a credit the token must land exactly on home.
//! - Stepping onto the central axis from off it (home-stretch entry) needs
//!   a capture credit.
//! - A safe square holding any token cannot be entered.
//! - In team mode, two tokens of the opposing team block a square.
//! - Landing on a non-safe square sends at most one opposing token home
//!   (lowest seat, then lowest token index) and earns one capture credit.
//! - In team mode credits are pooled between teammates.

use smallvec::SmallVec;
use tracing::{debug, info};

use super::outcome::{Capture, MoveOutcome, MovePlan, MoveRejection, RollOutcome};
use crate::board::{Cell, PathTable, PATH_LENGTH};
use crate::core::{GameState, PlayerId, TeamId, TokenPos, TokenRef};

/// The roll that releases tokens and grants a bonus turn.
pub const SIX: u8 = 6;

/// Stateless rule engine operating on a locked `GameState`.
pub struct RuleEngine;

impl RuleEngine {
    /// The token is in the yard and the roll is a six.
    #[must_use]
    pub fn can_enter_from_yard(state: &GameState, token: TokenRef, roll: u8) -> bool {
        roll == SIX
            && state
                .try_player(token.player)
                .and_then(|p| p.token(token.index as usize))
                == Some(TokenPos::Yard)
    }

    /// Is moving `token` by `roll` legal right now?
    #[must_use]
    pub fn is_legal_move(state: &GameState, token: TokenRef, roll: u8) -> bool {
        Self::plan_move(state, token, roll).is_ok()
    }

    /// Validate a move and compute where it ends.
    pub fn plan_move(state: &GameState, token: TokenRef, roll: u8) -> Result<MovePlan, MoveRejection> {
        let player = state.try_player(token.player).ok_or(MoveRejection::NoSuchToken)?;
        let from = player.token(token.index as usize).ok_or(MoveRejection::NoSuchToken)?;
        if !player.is_active() {
            return Err(MoveRejection::PlayerInactive);
        }
        if !(1..=SIX).contains(&roll) {
            return Err(MoveRejection::InvalidRoll(roll));
        }

        let color = player.color();
        let credit = state.has_capture_credit(token.player);

        let (to, wrapped) = match from {
            TokenPos::Home => return Err(MoveRejection::AlreadyHome),
            TokenPos::Yard => {
                if !Self::can_enter_from_yard(state, token, roll) {
                    return Err(MoveRejection::NeedsSix);
                }
                (TokenPos::Track(0), false)
            }
            TokenPos::Track(step) => {
                let target = step as usize + roll as usize;
                if target < PATH_LENGTH {
                    (TokenPos::Track(target as u8), false)
                } else if !credit {
                    (TokenPos::Track((target % PATH_LENGTH) as u8), true)
                } else if target == PATH_LENGTH {
                    return Ok(MovePlan {
                        token,
                        from,
                        to: TokenPos::Home,
                        cell: None,
                        wrapped: false,
                    });
                } else {
                    return Err(MoveRejection::Overshoot);
                }
            }
        };

        let cell = PathTable::track_cell(color, to.step().unwrap_or_default());
        let from_axis = from
            .step()
            .is_some_and(|s| PathTable::track_cell(color, s).is_on_axis());
        if cell.is_on_axis() && !from_axis && !credit {
            return Err(MoveRejection::HomeStretchLocked);
        }

        let board = state.board();
        if board.terrain_at(cell).is_safe() && board.occupants(cell).iter().any(|t| *t != token) {
            return Err(MoveRejection::SafeCellOccupied);
        }
        if Self::is_team_blocked(state, token.player, cell) {
            return Err(MoveRejection::TeamBlocked);
        }

        Ok(MovePlan {
            token,
            from,
            to,
            cell: Some(cell),
            wrapped,
        })
    }

    /// Two or more tokens of the mover's opposing team on `cell` (team mode only).
    #[must_use]
    pub fn is_team_blocked(state: &GameState, mover: PlayerId, cell: Cell) -> bool {
        if !state.team_mode() {
            return false;
        }
        let opponents = TeamId::of(mover).opponent();
        state
            .board()
            .occupants(cell)
            .iter()
            .filter(|t| TeamId::of(t.player) == opponents)
            .count()
            >= 2
    }

    /// Send the first opposing token on `cell` back to its yard.
    ///
    /// Opponents are scanned by seat, then token index. Safe squares and
    /// team blocks never capture. At most one token is captured.
    pub fn resolve_capture(state: &mut GameState, mover: PlayerId, cell: Cell) -> Option<Capture> {
        if state.board().terrain_at(cell).is_safe() || Self::is_team_blocked(state, mover, cell) {
            return None;
        }

        let victim = state
            .players()
            .filter(|p| p.id() != mover && !state.are_teammates(mover, p.id()))
            .flat_map(|p| (0..p.num_tokens()).map(move |i| TokenRef::new(p.id(), i as u8)))
            .find(|&t| state.token_cell(t) == Some(cell))?;

        state.relocate_token(victim, TokenPos::Yard);
        state.record_capture(mover);
        debug!(player = %mover, %victim, %cell, "capture");

        Some(Capture { victim, cell })
    }

    /// Validate and commit a move in one step.
    pub fn apply_move(state: &mut GameState, token: TokenRef, roll: u8) -> Result<MoveOutcome, MoveRejection> {
        let plan = Self::plan_move(state, token, roll)?;

        let capture = plan
            .cell
            .and_then(|cell| Self::resolve_capture(state, token.player, cell));
        state.relocate_token(token, plan.to);

        if plan.to.is_home() {
            debug!(%token, "token reached home");
        } else if plan.wrapped {
            debug!(%token, "token loops back to continue hunting");
        } else {
            debug!(%token, from = plan.from.as_index(), to = plan.to.as_index(), "token moved");
        }

        Ok(MoveOutcome { plan, capture })
    }

    /// Win check after a move.
    ///
    /// Solo: true once every token is home; the player is ranked and leaves
    /// play. Team mode: true only once both teammates are home; the winners
    /// share the current rank, the other team gets the next one, and the
    /// game ends. A player home before its teammate leaves the active set
    /// and the check returns false.
    pub fn check_win(state: &mut GameState, id: PlayerId) -> bool {
        if !state.player(id).has_finished() {
            return false;
        }

        let Some(mate) = state.teammate(id) else {
            if let Some(rank) = state.rank_next(id) {
                info!(player = %id, rank, "player finished");
            }
            if state.active_count() < 2 {
                state.finish_game();
            }
            return true;
        };

        if !state.player(mate).has_finished() {
            if state.deactivate(id) {
                info!(player = %id, teammate = %mate, "player finished, waiting for teammate");
            }
            if state.active_count() < 2 {
                state.finish_game();
            }
            return false;
        }

        let team = TeamId::of(id);
        let rank = state.current_rank();
        for member in team.members() {
            state.assign_rank(member, rank);
            state.deactivate(member);
        }
        for member in team.opponent().members() {
            state.assign_rank(member, rank + 1);
        }
        state.advance_rank(2);
        info!(%team, rank, "team has won the game");
        state.finish_game();
        true
    }

    /// Force a stuck player out with the next rank.
    ///
    /// Players already waiting with every token home are ranked first.
    pub fn eliminate_stuck(state: &mut GameState, id: PlayerId) -> Option<u8> {
        if state.player(id).rank().is_some() {
            return None;
        }
        state.rank_waiting();
        let rank = state.rank_next(id)?;
        info!(player = %id, rank, "player is stuck and cannot proceed");
        if state.active_count() < 2 {
            state.finish_game();
        }
        Some(rank)
    }

    /// Use one roll for `id`: pick the move, apply it, run the win check.
    ///
    /// On a six the first yard token that can enter is preferred; otherwise
    /// the first on-track token (ascending index) with a legal move advances.
    pub fn play_roll(state: &mut GameState, id: PlayerId, roll: u8) -> RollOutcome {
        let moved = Self::move_first_legal(state, id, roll);
        let won = moved.is_some() && Self::check_win(state, id);
        RollOutcome { roll, moved, won }
    }

    /// A finished team player's roll, applied to the teammate's tokens.
    ///
    /// Returns `None` when `helper` has nobody to help.
    pub fn help_teammate(state: &mut GameState, helper: PlayerId, roll: u8) -> Option<RollOutcome> {
        if !state.is_helper(helper) {
            return None;
        }
        let mate = state.teammate(helper)?;
        let outcome = Self::play_roll(state, mate, roll);
        if let Some(moved) = &outcome.moved {
            debug!(player = %helper, token = %moved.plan.token, "moved teammate's token");
        }
        Some(outcome)
    }

    fn move_first_legal(state: &mut GameState, id: PlayerId, roll: u8) -> Option<MoveOutcome> {
        let tokens: SmallVec<[(TokenRef, TokenPos); 4]> = state
            .try_player(id)?
            .tokens()
            .iter()
            .enumerate()
            .map(|(i, &pos)| (TokenRef::new(id, i as u8), pos))
            .collect();

        if roll == SIX {
            for &(token, _) in tokens.iter().filter(|(_, pos)| pos.is_yard()) {
                if let Ok(outcome) = Self::apply_move(state, token, roll) {
                    return Some(outcome);
                }
            }
        }
        for &(token, _) in tokens.iter().filter(|(_, pos)| pos.step().is_some()) {
            if let Ok(outcome) = Self::apply_move(state, token, roll) {
                return Some(outcome);
            }
        }
        None
    }
}
