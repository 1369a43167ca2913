//! Tile classification, grid geometry and the waypoint route.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification applied to a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Unoccupied space that may be overwritten.
    Empty,
    /// Segment of the enemy path.
    Path,
    /// Path tile marking a turn or an endpoint of the route.
    Waypoint,
    /// Tile on which a turret is instantiated at startup.
    TurretSlot,
}

impl TileKind {
    /// Reports whether the search may expand through tiles of this kind.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Enumerates the 4-directional neighbours in north, south, west, east order.
    ///
    /// Neighbours that would require a negative index are skipped. Callers are
    /// responsible for discarding neighbours beyond the far grid edges.
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        let north = self
            .row
            .checked_sub(1)
            .map(|row| CellCoord::new(row, self.column));
        let south = self
            .row
            .checked_add(1)
            .map(|row| CellCoord::new(row, self.column));
        let west = self
            .column
            .checked_sub(1)
            .map(|column| CellCoord::new(self.row, column));
        let east = self
            .column
            .checked_add(1)
            .map(|column| CellCoord::new(self.row, column));
        [north, south, west, east].into_iter().flatten()
    }
}

/// Reasons a tile grid description may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// Grids must contain at least one tile.
    #[error("grid size must be positive")]
    ZeroSize,
    /// The tile list does not describe a square of the declared size.
    #[error("expected {expected} tiles for a square grid but received {actual}")]
    TileCountMismatch {
        /// Number of tiles implied by the declared size.
        expected: usize,
        /// Number of tiles supplied.
        actual: usize,
    },
    /// Tiles must have a positive, finite side length.
    #[error("tile length must be positive and finite (received {tile_length})")]
    InvalidTileLength {
        /// Provided side length that failed validation.
        tile_length: f32,
    },
}

/// Fixed-size square matrix of tile classifications.
///
/// The grid is authored once and treated as read-only while the simulation
/// runs.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    size: u32,
    tile_length: f32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a square grid from row-major tiles.
    pub fn new(size: u32, tile_length: f32, tiles: Vec<TileKind>) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::ZeroSize);
        }

        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(GridError::InvalidTileLength { tile_length });
        }

        let side = size as usize;
        let expected = side.saturating_mul(side);
        if tiles.len() != expected {
            return Err(GridError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }

        Ok(Self {
            size,
            tile_length,
            tiles,
        })
    }

    /// Number of rows, which equals the number of columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total side length of the grid measured in world units.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.size as f32 * self.tile_length
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.size && cell.column() < self.size
    }

    /// Returns the classification of the provided cell, if it is in bounds.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Iterates every cell in row-major order together with its classification.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        let size = self.size;
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index / size, index % size), *kind)
        })
    }

    /// World-space centre of the provided cell.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> Vec2 {
        self.tile_corner(cell) + Vec2::splat(self.tile_length * 0.5)
    }

    /// World-space upper-left corner of the provided cell.
    #[must_use]
    pub fn tile_corner(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }

    /// Resolves the cell that contains the world-space point, if any.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }

        let column = (point.x / self.tile_length).floor() as u32;
        let row = (point.y / self.tile_length).floor() as u32;
        let cell = CellCoord::new(row, column);
        self.contains(cell).then_some(cell)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

/// Reasons a waypoint route may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Movement requires at least an entry and an exit waypoint.
    #[error("route requires at least two waypoints (found {len})")]
    TooShort {
        /// Number of waypoints supplied.
        len: usize,
    },
    /// A waypoint lies outside the grid.
    #[error("waypoint {cell:?} lies outside the grid")]
    OutOfBounds {
        /// Offending waypoint.
        cell: CellCoord,
    },
}

/// Ordered waypoints that enemies walk from entry to exit.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    cells: Vec<CellCoord>,
    centers: Vec<Vec2>,
}

impl Route {
    /// Builds a route from ordered waypoint cells, caching their world centres.
    pub fn new(cells: Vec<CellCoord>, grid: &TileGrid) -> Result<Self, RouteError> {
        if cells.len() < 2 {
            return Err(RouteError::TooShort { len: cells.len() });
        }

        if let Some(cell) = cells.iter().copied().find(|cell| !grid.contains(*cell)) {
            return Err(RouteError::OutOfBounds { cell });
        }

        let centers = cells.iter().map(|cell| grid.tile_center(*cell)).collect();
        Ok(Self { cells, centers })
    }

    /// Number of waypoints in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Routes are never empty once constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Waypoint cells in walking order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// World-space centre of the waypoint at the provided index.
    #[must_use]
    pub fn center(&self, index: usize) -> Option<Vec2> {
        self.centers.get(index).copied()
    }

    /// World-space centre of the entry waypoint.
    #[must_use]
    pub fn entry(&self) -> Vec2 {
        self.centers[0]
    }
}
