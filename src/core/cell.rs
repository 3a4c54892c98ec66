//! Arena cell coordinates and coordinate-frame conversion.

use serde::{Deserialize, Serialize};

use super::bearing::Bearing;

/// Side length of the square arena in cells.
pub const ARENA_SIZE: i32 = 20;

/// Arena cell (integer indices, top-left origin, y grows downward)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl Cell {
    /// Create a new cell
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Is this cell inside the 20×20 arena?
    #[inline]
    pub fn in_bounds(&self) -> bool {
        (0..ARENA_SIZE).contains(&self.x) && (0..ARENA_SIZE).contains(&self.y)
    }

    /// Row-major index into a 20×20 buffer. Caller must check bounds.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        (self.y * ARENA_SIZE + self.x) as usize
    }

    /// The cell `distance` steps away along `bearing`.
    ///
    /// Diagonal bearings move on both axes.
    #[inline]
    pub fn offset(&self, bearing: Bearing, distance: i32) -> Cell {
        let (dx, dy) = bearing.step_delta();
        Cell::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// The adjacent cell along `bearing`.
    #[inline]
    pub fn step(&self, bearing: Bearing) -> Cell {
        self.offset(bearing, 1)
    }

    /// Manhattan distance to another cell
    #[inline]
    pub fn manhattan_distance(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Squared Euclidean distance (no sqrt)
    #[inline]
    pub fn squared_distance(&self, other: &Cell) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Euclidean distance on raw cell coordinates
    #[inline]
    pub fn euclidean_distance(&self, other: &Cell) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }

    /// Cardinal bearing of a single 4-neighbour step from `self` to `next`.
    ///
    /// Returns `None` when the cells are not 4-adjacent.
    pub fn bearing_to(&self, next: &Cell) -> Option<Bearing> {
        match (next.x - self.x, next.y - self.y) {
            (0, -1) => Some(Bearing::North),
            (1, 0) => Some(Bearing::East),
            (0, 1) => Some(Bearing::South),
            (-1, 0) => Some(Bearing::West),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Vertical convention of a coordinate pair.
///
/// The planner works in `TopLeft` throughout. The arena and the operator
/// console number rows from the bottom, so y is flipped on the way in and out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFrame {
    /// Row 0 at the top (internal)
    #[default]
    TopLeft,
    /// Row 0 at the bottom (arena / operator console)
    BottomLeft,
}

impl CoordinateFrame {
    /// Convert a y coordinate between this frame and the internal one.
    ///
    /// The flip `y' = 19 - y` is its own inverse, so the same call serves
    /// ingress and egress.
    #[inline]
    pub fn convert_y(self, y: i32) -> i32 {
        match self {
            CoordinateFrame::TopLeft => y,
            CoordinateFrame::BottomLeft => ARENA_SIZE - 1 - y,
        }
    }

    /// Convert a whole cell between this frame and the internal one.
    #[inline]
    pub fn convert(self, cell: Cell) -> Cell {
        Cell::new(cell.x, self.convert_y(cell.y))
    }
}
