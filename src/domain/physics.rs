//! Static obstacle grid and the box-vs-grid query.
//!
//! ## Boundary policy
//!
//! `obstacle_at(pos, size)` covers the integer cell span
//! `[floor(pos.x), ceil(pos.x + size.x)) × [floor(pos.y), ceil(pos.y + size.y))`
//! and checks, in this order:
//!
//!   1. span leaves the grid on the left, right or top  → `Wall`
//!   2. span leaves the grid at the bottom              → `Lava`
//!   3. first non-empty cell, scanning row-major        → that tag
//!   4. otherwise                                       → `None`
//!
//! Falling off the bottom is lethal, walking off a side or the top is only
//! blocked. Rows may be jagged: a column past the end of a short row is
//! passable.

use super::tile::{obstacle_from_symbol, Obstacle};
use super::vector::Vector;

/// Read-only spatial query handed to actors during their update.
/// Actors never see the Level itself, only this view of the terrain.
pub trait ObstacleMap {
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<Option<Obstacle>>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Dimensions are fixed here: width is the longest row, height the row count.
    pub fn new(cells: Vec<Vec<Option<Obstacle>>>) -> Self {
        let width = cells.iter().map(|row| row.len()).max().unwrap_or(0);
        let height = cells.len();
        Grid { cells, width, height }
    }

    /// Build a grid straight from plan rows, ignoring actor symbols.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Grid::new(
            rows.iter()
                .map(|row| row.as_ref().chars().map(obstacle_from_symbol).collect())
                .collect(),
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Option<Obstacle>>] {
        &self.cells
    }

    /// Tag of a single cell. Out of range (including past a short row) is empty.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Option<Obstacle> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }
}

impl ObstacleMap for Grid {
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle> {
        let x_start = pos.x.floor();
        let x_end = (pos.x + size.x).ceil();
        let y_start = pos.y.floor();
        let y_end = (pos.y + size.y).ceil();

        if x_start < 0.0 || x_end > self.width as f64 || y_start < 0.0 {
            return Some(Obstacle::Wall);
        }
        if y_end > self.height as f64 {
            return Some(Obstacle::Lava);
        }

        // All four bounds are now non-negative and inside the grid.
        let (x_start, x_end) = (x_start as usize, x_end as usize);
        let (y_start, y_end) = (y_start as usize, y_end as usize);
        for y in y_start..y_end {
            for x in x_start..x_end {
                if let Some(tag) = self.cell(x, y) {
                    return Some(tag);
                }
            }
        }
        None
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
