//! Connected-region search that derives the waypoint route from the tile grid.

use thiserror::Error;
use turret_defence_core::{CellCoord, TileGrid, TileKind};

/// Reasons the route search refuses to run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The start cell lies outside the grid.
    #[error("start cell {cell:?} lies outside the {size}x{size} grid")]
    StartOutOfBounds {
        /// Requested start cell.
        cell: CellCoord,
        /// Side length of the grid in tiles.
        size: u32,
    },
    /// The start cell is not part of the painted path.
    #[error("start cell {cell:?} is not traversable")]
    StartNotTraversable {
        /// Requested start cell.
        cell: CellCoord,
    },
}

/// Pending cells of the search, expanded last-in-first-out.
///
/// The reference layout paints its turn markers so that depth-first
/// visitation reproduces the drawn route order.
#[derive(Debug)]
struct Worklist {
    pending: Vec<CellCoord>,
    visited: Vec<bool>,
    size: u32,
}

impl Worklist {
    fn new(size: u32) -> Self {
        let side = size as usize;
        Self {
            pending: Vec::new(),
            visited: vec![false; side.saturating_mul(side)],
            size,
        }
    }

    /// Enqueues the cell unless it was seen before, marking it visited.
    fn push(&mut self, cell: CellCoord) {
        let Some(index) = self.index(cell) else {
            return;
        };

        if self.visited[index] {
            return;
        }

        self.visited[index] = true;
        self.pending.push(cell);
    }

    fn pop(&mut self) -> Option<CellCoord> {
        self.pending.pop()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() >= self.size || cell.column() >= self.size {
            return None;
        }

        let side = self.size as usize;
        Some(cell.row() as usize * side + cell.column() as usize)
    }
}

/// Visits every traversable cell connected to `start` and collects those of the `target` kind.
///
/// Cells are reported in visitation order. The start cell itself is
/// reported first when it matches the target kind. Targets that are not
/// connected to the start are omitted.
pub fn flood_fill(
    grid: &TileGrid,
    start: CellCoord,
    target: TileKind,
) -> Result<Vec<CellCoord>, NavigationError> {
    match grid.kind(start) {
        None => {
            return Err(NavigationError::StartOutOfBounds {
                cell: start,
                size: grid.size(),
            })
        }
        Some(kind) if !kind.is_traversable() => {
            return Err(NavigationError::StartNotTraversable { cell: start })
        }
        Some(_) => {}
    }

    let mut found = Vec::new();
    let mut worklist = Worklist::new(grid.size());
    worklist.push(start);

    while let Some(cell) = worklist.pop() {
        if grid.kind(cell) == Some(target) {
            found.push(cell);
        }

        for neighbor in cell.neighbors() {
            if grid.kind(neighbor).is_some_and(TileKind::is_traversable) {
                worklist.push(neighbor);
            }
        }
    }

    Ok(found)
}

/// Extracts the ordered waypoint cells of the path starting at `start`.
pub fn extract_waypoints(
    grid: &TileGrid,
    start: CellCoord,
) -> Result<Vec<CellCoord>, NavigationError> {
    flood_fill(grid, start, TileKind::Waypoint)
}
