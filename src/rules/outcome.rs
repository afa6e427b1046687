//! Results of rule-engine calls.

use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::core::{TokenPos, TokenRef};

/// Why a move was refused. A refused move never changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum MoveRejection {
    #[error("no such token")]
    NoSuchToken,
    #[error("player is no longer racing")]
    PlayerInactive,
    #[error("roll {0} is not a die face")]
    InvalidRoll(u8),
    #[error("token is already home")]
    AlreadyHome,
    #[error("leaving the yard needs a six")]
    NeedsSix,
    #[error("roll overshoots home")]
    Overshoot,
    #[error("home stretch needs a capture first")]
    HomeStretchLocked,
    #[error("safe square is occupied")]
    SafeCellOccupied,
    #[error("two tokens of the opposing team block the square")]
    TeamBlocked,
}

/// A validated move, not yet applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovePlan {
    pub token: TokenRef,
    pub from: TokenPos,
    pub to: TokenPos,
    /// Destination cell; `None` when retiring home.
    pub cell: Option<Cell>,
    /// Went past the end of the track without a capture credit and looped.
    pub wrapped: bool,
}

/// An opposing token sent back to its yard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    pub victim: TokenRef,
    pub cell: Cell,
}

/// A move that was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub plan: MovePlan,
    pub capture: Option<Capture>,
}

impl MoveOutcome {
    #[must_use]
    pub fn reached_home(&self) -> bool {
        self.plan.to.is_home()
    }

    #[must_use]
    pub fn entered_track(&self) -> bool {
        self.plan.from.is_yard()
    }
}

/// What one die roll accomplished for a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollOutcome {
    pub roll: u8,
    pub moved: Option<MoveOutcome>,
    /// The win check passed after this move.
    pub won: bool,
}

impl RollOutcome {
    #[must_use]
    pub fn did_move(&self) -> bool {
        self.moved.is_some()
    }
}
