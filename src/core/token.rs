//! Token identity and position.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::board::PATH_LENGTH;

/// Where a token is.
///
/// Numerically: `-1` in the yard, `0..PATH_LENGTH` on the track,
/// `PATH_LENGTH` once retired home.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenPos {
    /// Waiting in the yard.
    Yard,
    /// On the track, at this step from the colour's entry square.
    Track(u8),
    /// Retired. Terminal.
    Home,
}

impl TokenPos {
    /// Numeric form: `-1`, `0..PATH_LENGTH` or `PATH_LENGTH`.
    #[must_use]
    pub const fn as_index(self) -> i16 {
        match self {
            TokenPos::Yard => -1,
            TokenPos::Track(step) => step as i16,
            TokenPos::Home => PATH_LENGTH as i16,
        }
    }

    /// Parse the numeric form. Returns `None` outside `-1..=PATH_LENGTH`.
    #[must_use]
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            -1 => Some(TokenPos::Yard),
            i if (0..PATH_LENGTH as i16).contains(&i) => Some(TokenPos::Track(i as u8)),
            i if i == PATH_LENGTH as i16 => Some(TokenPos::Home),
            _ => None,
        }
    }

    /// Track step, if on the track.
    #[must_use]
    pub const fn step(self) -> Option<usize> {
        match self {
            TokenPos::Track(step) => Some(step as usize),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_yard(self) -> bool {
        matches!(self, TokenPos::Yard)
    }

    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, TokenPos::Home)
    }
}

/// A specific token: owner plus index `0..num_tokens`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenRef {
    pub player: PlayerId,
    pub index: u8,
}

impl TokenRef {
    #[must_use]
    pub const fn new(player: PlayerId, index: u8) -> Self {
        Self { player, index }
    }
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} token {}", self.player, self.index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_form() {
        assert_eq!(TokenPos::Yard.as_index(), -1);
        assert_eq!(TokenPos::Track(17).as_index(), 17);
        assert_eq!(TokenPos::Home.as_index(), 52);

        assert_eq!(TokenPos::from_index(-1), Some(TokenPos::Yard));
        assert_eq!(TokenPos::from_index(0), Some(TokenPos::Track(0)));
        assert_eq!(TokenPos::from_index(51), Some(TokenPos::Track(51)));
        assert_eq!(TokenPos::from_index(52), Some(TokenPos::Home));
        assert_eq!(TokenPos::from_index(53), None);
        assert_eq!(TokenPos::from_index(-2), None);
    }

    #[test]
    fn test_token_ref_display() {
        let token = TokenRef::new(PlayerId::new(0), 2);
        assert_eq!(token.to_string(), "Red token 3");
    }
}
