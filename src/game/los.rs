//! Line of sight over the grid.
//!
//! Sight lines are rasterized with Bresenham's algorithm. Only mountains block
//! sight; the two endpoint cells are never tested.

use crate::game::{Coord, Grid};

/// Cells visited by Bresenham's line from `from` to `to`, endpoints included.
///
/// The traversal order follows the integer error-term stepping exactly.
#[must_use]
pub fn line_cells(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;

    let capacity = usize::try_from(dx.max(dy)).unwrap_or(0) + 1;
    let mut cells = Vec::with_capacity(capacity);
    let mut current = from;

    loop {
        cells.push(current);
        if current == to {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            current.x += sx;
        }
        if e2 < dx {
            err += dx;
            current.y += sy;
        }
    }

    cells
}

/// Check whether `a` can see `b`.
///
/// Every cell strictly between the endpoints must not be a mountain. The line
/// is always traced from the lesser endpoint (by `x`, then `y`) so that
/// `has_los(a, b) == has_los(b, a)` on any grid.
#[must_use]
pub fn has_los(a: Coord, b: Coord, grid: &Grid) -> bool {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };

    line_cells(from, to)
        .into_iter()
        .filter(|&cell| cell != from && cell != to)
        .all(|cell| !grid.terrain(cell).is_some_and(|t| t.blocks_sight()))
}
