//! Board state: static terrain plus derived occupancy.
//!
//! Occupancy mirrors token positions and is only changed by the rule
//! engine while the game lock is held.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::cell::{Cell, TerrainGrid, TerrainKind};
use crate::core::{PlayerId, TokenRef};

/// Tokens sharing one cell. More than four only happens on busy non-safe cells.
pub type Occupants = SmallVec<[TokenRef; 4]>;

/// Terrain and occupancy.
#[derive(Clone, Debug)]
pub struct Board {
    terrain: Arc<TerrainGrid>,
    occupancy: FxHashMap<Cell, Occupants>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board on the standard terrain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            terrain: Arc::new(TerrainGrid::standard()),
            occupancy: FxHashMap::default(),
        }
    }

    /// Shared handle to the terrain grid.
    #[must_use]
    pub fn terrain(&self) -> Arc<TerrainGrid> {
        Arc::clone(&self.terrain)
    }

    #[must_use]
    pub fn terrain_at(&self, cell: Cell) -> TerrainKind {
        self.terrain.at(cell)
    }

    /// Tokens on `cell`, in placement order.
    #[must_use]
    pub fn occupants(&self, cell: Cell) -> &[TokenRef] {
        self.occupancy.get(&cell).map_or(&[][..], |o| o.as_slice())
    }

    /// Is any token on `cell`, ignoring those owned by `excluding`?
    #[must_use]
    pub fn is_occupied(&self, cell: Cell, excluding: Option<PlayerId>) -> bool {
        self.occupants(cell)
            .iter()
            .any(|t| Some(t.player) != excluding)
    }

    /// Every occupied cell with its tokens.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, &[TokenRef])> {
        self.occupancy.iter().map(|(cell, tokens)| (*cell, tokens.as_slice()))
    }

    pub(crate) fn place_token(&mut self, token: TokenRef, cell: Cell) {
        let occupants = self.occupancy.entry(cell).or_default();
        debug_assert!(!occupants.contains(&token), "{token} placed twice on {cell}");
        occupants.push(token);
    }

    /// Returns false if the token was not on `cell`.
    pub(crate) fn remove_token(&mut self, token: TokenRef, cell: Cell) -> bool {
        let Some(occupants) = self.occupancy.get_mut(&cell) else {
            return false;
        };
        let Some(pos) = occupants.iter().position(|t| *t == token) else {
            return false;
        };
        occupants.remove(pos);
        if occupants.is_empty() {
            self.occupancy.remove(&cell);
        }
        true
    }

    pub(crate) fn clear_occupancy(&mut self) {
        self.occupancy.clear();
    }
}
