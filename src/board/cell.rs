//! Board coordinates and static terrain.
//!
//! The terrain grid is built once and never mutated; it is shared
//! read-only (behind an `Arc`) by the board and by render snapshots.

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 15;

/// Row/column of the central cross. Landing on it is home-stretch entry.
pub const CENTRAL_AXIS: u8 = 7;

/// A `(row, col)` coordinate on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when the cell lies on the central row or column.
    #[must_use]
    pub const fn is_on_axis(self) -> bool {
        self.row == CENTRAL_AXIS || self.col == CENTRAL_AXIS
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Static terrain of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Plain,
    /// A colour's home yard quadrant.
    HomeYard(Color),
    /// Star square: no stacking, no capture.
    Safe,
    /// A colour's lane marking.
    ColoredPath(Color),
}

impl TerrainKind {
    #[must_use]
    pub const fn is_safe(self) -> bool {
        matches!(self, TerrainKind::Safe)
    }
}

const YELLOW_LANE: [(u8, u8); 9] = [(1, 7), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7), (6, 8), (1, 8), (2, 6)];
const BLUE_LANE: [(u8, u8); 10] = [
    (7, 7), (8, 7), (9, 7), (10, 7), (11, 7), (12, 7), (8, 6), (13, 6), (12, 8), (13, 7),
];
const RED_LANE: [(u8, u8); 9] = [(7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6), (6, 6), (6, 1), (8, 2)];
const GREEN_LANE: [(u8, u8); 9] = [(7, 8), (7, 9), (7, 10), (7, 11), (7, 12), (7, 13), (8, 13), (8, 8), (6, 12)];

/// Star squares; these are the four colours' entry cells.
pub const SAFE_CELLS: [Cell; 4] = [Cell::new(6, 1), Cell::new(1, 8), Cell::new(8, 13), Cell::new(13, 6)];

/// Immutable terrain for the whole board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    cells: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// The standard 15x15 layout.
    ///
    /// Yards occupy the 6x6 corners: Red top-left, Yellow top-right,
    /// Green bottom-right, Blue bottom-left. Star squares are applied last
    /// and win over lane markings.
    #[must_use]
    pub fn standard() -> Self {
        let mut grid = Self {
            cells: vec![TerrainKind::Plain; BOARD_SIZE * BOARD_SIZE],
        };

        let quadrants = [
            (Color::Red, 0..6, 0..6),
            (Color::Yellow, 0..6, 9..15),
            (Color::Green, 9..15, 9..15),
            (Color::Blue, 9..15, 0..6),
        ];
        for (color, rows, cols) in quadrants {
            for row in rows {
                for col in cols.clone() {
                    grid.set(Cell::new(row, col), TerrainKind::HomeYard(color));
                }
            }
        }

        let lanes: [(Color, &[(u8, u8)]); 4] = [
            (Color::Yellow, &YELLOW_LANE),
            (Color::Blue, &BLUE_LANE),
            (Color::Red, &RED_LANE),
            (Color::Green, &GREEN_LANE),
        ];
        for (color, lane) in lanes {
            for &(row, col) in lane {
                grid.set(Cell::new(row, col), TerrainKind::ColoredPath(color));
            }
        }

        for cell in SAFE_CELLS {
            grid.set(cell, TerrainKind::Safe);
        }

        grid
    }

    /// Terrain at `cell`. Off-board coordinates read as `Plain`.
    #[must_use]
    pub fn at(&self, cell: Cell) -> TerrainKind {
        Self::offset(cell)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or(TerrainKind::Plain)
    }

    /// Row-major iteration over every cell and its terrain.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, TerrainKind)> + '_ {
        self.cells.iter().enumerate().map(|(i, &kind)| {
            (Cell::new((i / BOARD_SIZE) as u8, (i % BOARD_SIZE) as u8), kind)
        })
    }

    fn set(&mut self, cell: Cell, kind: TerrainKind) {
        if let Some(i) = Self::offset(cell) {
            self.cells[i] = kind;
        }
    }

    fn offset(cell: Cell) -> Option<usize> {
        let (row, col) = (cell.row as usize, cell.col as usize);
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(row * BOARD_SIZE + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis() {
        assert!(Cell::new(0, 7).is_on_axis());
        assert!(Cell::new(7, 14).is_on_axis());
        assert!(!Cell::new(6, 8).is_on_axis());
    }

    #[test]
    fn test_yards() {
        let grid = TerrainGrid::standard();
        assert_eq!(grid.at(Cell::new(2, 2)), TerrainKind::HomeYard(Color::Red));
        assert_eq!(grid.at(Cell::new(2, 11)), TerrainKind::HomeYard(Color::Yellow));
        assert_eq!(grid.at(Cell::new(11, 11)), TerrainKind::HomeYard(Color::Green));
        assert_eq!(grid.at(Cell::new(11, 2)), TerrainKind::HomeYard(Color::Blue));
    }

    #[test]
    fn test_safe_squares_override_lanes() {
        let grid = TerrainGrid::standard();
        for cell in SAFE_CELLS {
            assert!(grid.at(cell).is_safe(), "{cell} should be safe");
        }
        assert_eq!(grid.iter().filter(|(_, k)| k.is_safe()).count(), 4);
    }

    #[test]
    fn test_lanes_and_plain() {
        let grid = TerrainGrid::standard();
        assert_eq!(grid.at(Cell::new(3, 7)), TerrainKind::ColoredPath(Color::Yellow));
        assert_eq!(grid.at(Cell::new(7, 10)), TerrainKind::ColoredPath(Color::Green));
        assert_eq!(grid.at(Cell::new(5, 6)), TerrainKind::Plain);
        assert_eq!(grid.at(Cell::new(40, 40)), TerrainKind::Plain);
    }
}
