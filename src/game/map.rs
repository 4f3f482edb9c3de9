//! Grid, coordinate and terrain types.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
///
/// Coordinates are signed so that push offsets and oracle-supplied values can
/// be represented before they are checked against the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by an offset, or `None` if it leaves the `i32` range.
    #[must_use]
    pub const fn offset(self, by: Offset) -> Option<Self> {
        match (self.x.checked_add(by.dx), self.y.checked_add(by.dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Coordinate shifted by an offset, clamped to the `i32` range.
    #[must_use]
    pub const fn saturating_offset(self, by: Offset) -> Self {
        Self::new(self.x.saturating_add(by.dx), self.y.saturating_add(by.dy))
    }

    /// Chebyshev distance (diagonals count as one step).
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Manhattan distance.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours in fixed order: down, up, right, left.
    ///
    /// Neighbours may lie outside the grid; callers check bounds.
    #[must_use]
    #[inline]
    pub const fn orthogonal(self) -> [Coord; 4] {
        [
            Coord::new(self.x, self.y + 1), // down
            Coord::new(self.x, self.y - 1), // up
            Coord::new(self.x + 1, self.y), // right
            Coord::new(self.x - 1, self.y), // left
        ]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A displacement between two cells, used for push directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// Column delta.
    pub dx: i32,
    /// Row delta.
    pub dy: i32,
}

impl Offset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Type of terrain on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Terrain {
    /// Open ground; the only walkable terrain.
    Grass = 0,
    /// Impassable, blocks line of sight.
    Mountain = 1,
    /// Impassable, drowns anything pushed into it.
    Water = 2,
}

impl Terrain {
    /// Check if units can stand on or walk through this terrain.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Terrain::Grass)
    }

    /// Check if this terrain blocks line of sight.
    #[must_use]
    pub const fn blocks_sight(self) -> bool {
        matches!(self, Terrain::Mountain)
    }

    /// Integer code used in the oracle request (0 grass, 1 mountain, 2 water).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// The terrain grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Width of the grid in cells.
    width: u16,
    /// Height of the grid in cells.
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Terrain>,
}

impl Grid {
    /// Create a grid filled with a single terrain.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn filled(width: u16, height: u16, terrain: Terrain) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            cells: vec![terrain; size],
        })
    }

    /// Build a grid from rows of terrain (`rows[y][x]`).
    ///
    /// Returns `None` if there are no rows, rows are empty, or rows differ in length.
    #[must_use]
    pub fn from_rows(rows: &[Vec<Terrain>]) -> Option<Self> {
        let height = u16::try_from(rows.len()).ok()?;
        let width = u16::try_from(rows.first()?.len()).ok()?;
        if width == 0 || rows.iter().any(|row| row.len() != usize::from(width)) {
            return None;
        }

        Some(Self {
            width,
            height,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Grids always have at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Terrain] {
        &self.cells
    }

    /// Check if a coordinate is within the grid bounds.
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < i32::from(self.width)
            && coord.y < i32::from(self.height)
    }

    /// Convert a coordinate to an index into the cell array.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        let x = usize::try_from(coord.x).ok()?;
        let y = usize::try_from(coord.y).ok()?;
        Some(y * usize::from(self.width) + x)
    }

    /// Convert a row-major index back to a coordinate.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Coord {
        let width = usize::from(self.width);
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        Coord::new((index % width) as i32, (index / width) as i32)
    }

    /// Terrain at a coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn terrain(&self, coord: Coord) -> Option<Terrain> {
        self.index_of(coord).map(|idx| self.cells[idx])
    }

    /// Check if a coordinate is in bounds and grass.
    #[must_use]
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.terrain(coord).is_some_and(Terrain::is_walkable)
    }

    /// Set the terrain at a coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, terrain: Terrain) -> bool {
        if let Some(idx) = self.index_of(coord) {
            self.cells[idx] = terrain;
            true
        } else {
            false
        }
    }

    /// Iterate over all coordinates and terrain in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Terrain)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, &terrain)| (self.coord_of(idx), terrain))
    }

    /// Number of grass cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_walkable()).count()
    }

    /// Terrain rows as integer codes, row-major (`rows[y][x]`).
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(usize::from(self.width))
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }
}
