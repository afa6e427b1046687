//! Board geometry: coordinates, terrain, race paths and occupancy.

pub mod cell;
pub mod grid;
pub mod path;

pub use cell::{Cell, TerrainGrid, TerrainKind, BOARD_SIZE, CENTRAL_AXIS, SAFE_CELLS};
pub use grid::{Board, Occupants};
pub use path::{PathTable, PATH_LENGTH, TRACK};
