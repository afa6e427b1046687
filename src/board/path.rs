//! Per-colour race paths.
//!
//! All colours share one 52-cell cycle; each colour enters it at its own
//! offset. The table is a compile-time constant, so actors read it without
//! locking.

use super::cell::Cell;
use crate::core::Color;

/// Cells a token visits before retiring home.
pub const PATH_LENGTH: usize = 52;

/// Distance between consecutive colours' entry squares.
pub const ENTRY_SPACING: usize = PATH_LENGTH / 4;

const fn c(row: u8, col: u8) -> Cell {
    Cell::new(row, col)
}

/// The shared cycle, starting at Red's entry square.
pub const TRACK: [Cell; PATH_LENGTH] = [
    c(6, 1), c(6, 2), c(6, 3), c(6, 4), c(6, 5), c(5, 6), c(4, 6), c(3, 6), c(2, 6), c(1, 6), c(0, 6),
    c(0, 7), c(0, 8), c(1, 8), c(2, 8), c(3, 8), c(4, 8), c(5, 8), c(6, 9), c(6, 10), c(6, 11), c(6, 12),
    c(6, 13), c(6, 14), c(7, 14), c(8, 14), c(8, 13), c(8, 12), c(8, 11), c(8, 10), c(8, 9), c(9, 8),
    c(10, 8), c(11, 8), c(12, 8), c(13, 8), c(14, 8), c(14, 7), c(14, 6), c(13, 6), c(12, 6), c(11, 6),
    c(10, 6), c(9, 6), c(8, 5), c(8, 4), c(8, 3), c(8, 2), c(8, 1), c(8, 0), c(7, 0), c(6, 0),
];

/// Lookup from `(colour, step)` to board cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathTable;

impl PathTable {
    /// Offset of `color`'s entry square into [`TRACK`].
    #[must_use]
    pub const fn entry_offset(color: Color) -> usize {
        color.index() * ENTRY_SPACING
    }

    /// Cell at `step` along `color`'s path, or `None` past the end.
    #[must_use]
    pub const fn cell(color: Color, step: usize) -> Option<Cell> {
        if step >= PATH_LENGTH {
            return None;
        }
        Some(TRACK[(step + Self::entry_offset(color)) % PATH_LENGTH])
    }

    /// Cell at `step` along `color`'s path, wrapping around the cycle.
    #[must_use]
    pub const fn track_cell(color: Color, step: usize) -> Cell {
        TRACK[(step % PATH_LENGTH + Self::entry_offset(color)) % PATH_LENGTH]
    }

    /// The square a token lands on when it leaves the yard.
    #[must_use]
    pub const fn entry_cell(color: Color) -> Cell {
        TRACK[Self::entry_offset(color)]
    }

    /// Full path for `color`, in order.
    pub fn path(color: Color) -> impl Iterator<Item = Cell> {
        (0..PATH_LENGTH).filter_map(move |step| Self::cell(color, step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SAFE_CELLS;
    use std::collections::HashSet;

    #[test]
    fn test_track_cells_are_distinct() {
        let unique: HashSet<_> = TRACK.iter().collect();
        assert_eq!(unique.len(), PATH_LENGTH);
    }

    #[test]
    fn test_track_is_connected() {
        for i in 0..PATH_LENGTH {
            let a = TRACK[i];
            let b = TRACK[(i + 1) % PATH_LENGTH];
            let dr = (a.row as i16 - b.row as i16).abs();
            let dc = (a.col as i16 - b.col as i16).abs();
            assert!(dr <= 1 && dc <= 1, "{a} -> {b} is not adjacent");
        }
    }

    #[test]
    fn test_entry_cells_are_star_squares() {
        for (color, safe) in Color::ALL.into_iter().zip(SAFE_CELLS) {
            assert_eq!(PathTable::entry_cell(color), safe);
        }
    }

    #[test]
    fn test_paths_are_rotations() {
        assert_eq!(PathTable::cell(Color::Yellow, 0), Some(Cell::new(1, 8)));
        assert_eq!(PathTable::cell(Color::Yellow, 51), Some(Cell::new(0, 8)));
        assert_eq!(PathTable::cell(Color::Green, 51), Some(Cell::new(8, 14)));
        assert_eq!(PathTable::cell(Color::Blue, 51), Some(Cell::new(14, 6)));
        assert_eq!(PathTable::cell(Color::Red, PATH_LENGTH), None);
        assert_eq!(PathTable::path(Color::Green).count(), PATH_LENGTH);
    }

    #[test]
    fn test_four_axis_crossings_per_lap() {
        let crossings = PathTable::path(Color::Red).filter(|c| c.is_on_axis()).count();
        assert_eq!(crossings, 4);
    }
}
