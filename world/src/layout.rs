//! Text authoring format for tile grids and the reference layout.
//!
//! A layout is written one line per row and one character per cell:
//!
//! | Symbol | Tile |
//! |---|---|
//! | `.` | empty |
//! | `#` | path |
//! | `W` | waypoint |
//! | `T` | turret slot |
//!
//! Surrounding whitespace is ignored and blank lines are skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turret_defence_core::{CellCoord, GridError, TileGrid, TileKind};

const REFERENCE_ROWS: [&str; 20] = [
    "............W.......",
    "............#.......",
    "......T.....#.......",
    "............#.......",
    "............#..T....",
    "............#.......",
    "............#.......",
    "...W########W.......",
    "...#................",
    ".T.#................",
    "...#................",
    "...#................",
    "...#................",
    "...W############W...",
    "................#...",
    "...........T....#...",
    "................#...",
    "..T......W######W...",
    ".........#..........",
    ".........W..........",
];

const REFERENCE_START: CellCoord = CellCoord::new(0, 12);

/// Reasons a layout cannot be turned into a tile grid.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The layout does not contain a single row.
    #[error("layout contains no rows")]
    Empty,
    /// A character outside the authoring alphabet was found.
    #[error("unknown tile symbol {symbol:?} at row {row}, column {column}")]
    UnknownTile {
        /// Offending character.
        symbol: char,
        /// Row of the character.
        row: usize,
        /// Column of the character.
        column: usize,
    },
    /// A row is shorter or longer than the number of rows.
    #[error("row {row} has {actual} cells but the layout requires {expected}")]
    RaggedRow {
        /// Offending row.
        row: usize,
        /// Number of cells every row must hold.
        expected: usize,
        /// Number of cells the row holds.
        actual: usize,
    },
    /// The parsed tiles were rejected by the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Authored description of a session's terrain and route entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Rows of the grid written in the authoring alphabet.
    pub rows: Vec<String>,
    /// Cell enemies enter from; the route search starts here.
    pub start: CellCoord,
}

impl Default for Layout {
    fn default() -> Self {
        Self::reference()
    }
}

impl Layout {
    /// Creates a layout from textual rows and an entry cell.
    #[must_use]
    pub fn new(rows: Vec<String>, start: CellCoord) -> Self {
        Self { rows, start }
    }

    /// Parses a multi-line layout, skipping blank lines.
    #[must_use]
    pub fn from_text(text: &str, start: CellCoord) -> Self {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self::new(rows, start)
    }

    /// Returns the 20x20 reference layout with its entry at row 0, column 12.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(
            REFERENCE_ROWS.iter().map(|row| (*row).to_owned()).collect(),
            REFERENCE_START,
        )
    }

    /// Builds the immutable tile grid described by the layout.
    pub fn to_grid(&self, tile_length: f32) -> Result<TileGrid, LayoutError> {
        let rows: Vec<&str> = self
            .rows
            .iter()
            .map(|row| row.trim())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }

        let expected = rows.len();
        let mut tiles = Vec::with_capacity(expected.saturating_mul(expected));

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected,
                    actual,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                let kind = tile_kind(symbol).ok_or(LayoutError::UnknownTile {
                    symbol,
                    row,
                    column,
                })?;
                tiles.push(kind);
            }
        }

        let size = u32::try_from(expected).unwrap_or(u32::MAX);
        Ok(TileGrid::new(size, tile_length, tiles)?)
    }
}

fn tile_kind(symbol: char) -> Option<TileKind> {
    match symbol {
        '.' => Some(TileKind::Empty),
        '#' => Some(TileKind::Path),
        'W' => Some(TileKind::Waypoint),
        'T' => Some(TileKind::TurretSlot),
        _ => None,
    }
}

/// Lists every turret slot of the grid in row-major order.
#[must_use]
pub fn turret_slots(grid: &TileGrid) -> Vec<CellCoord> {
    grid.cells()
        .filter(|(_, kind)| *kind == TileKind::TurretSlot)
        .map(|(cell, _)| cell)
        .collect()
}
