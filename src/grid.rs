//! Arena occupancy grid with an obstacle registry.
//!
//! The grid bakes each obstacle and its row/column margin into a 20×20
//! cell matrix. Clearance is also answered analytically from the obstacle
//! registry; on every non-obstacle cell the two views agree.

use serde::{Deserialize, Serialize};

use crate::core::{ARENA_SIZE, Bearing, Cell, Obstacle};
use crate::error::{MargaError, Result};

/// Default minimum row/column separation between robot and obstacle.
pub const MIN_SEPARATION: i32 = 3;

/// State of a single arena cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Open floor
    #[default]
    Free,
    /// Obstacle with its image face bearing
    Obstacle(Bearing),
    /// Too close to an obstacle along a shared row or column
    BlockedMargin,
    /// Robot start area
    StartZone,
}

impl CellState {
    /// Can the robot stand on this cell?
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, CellState::Free | CellState::StartZone)
    }
}

/// 20×20 arena grid owned by a single planning call.
#[derive(Clone, Debug)]
pub struct GridMap {
    cells: Vec<CellState>,
    obstacles: Vec<Obstacle>,
    min_separation: i32,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(MIN_SEPARATION)
    }
}

impl GridMap {
    /// Create an empty grid whose baked margin extends `min_separation` cells.
    pub fn new(min_separation: i32) -> Self {
        let mut grid = Self {
            cells: vec![CellState::Free; (ARENA_SIZE * ARENA_SIZE) as usize],
            obstacles: Vec::new(),
            min_separation: min_separation.max(0),
        };
        grid.reset();
        grid
    }

    /// Clear every obstacle and margin, leaving only the start zone.
    pub fn reset(&mut self) {
        self.cells.fill(CellState::Free);
        self.obstacles.clear();
        for y in (ARENA_SIZE - 3)..ARENA_SIZE {
            for x in 0..3 {
                self.cells[Cell::new(x, y).index()] = CellState::StartZone;
            }
        }
    }

    /// Reset the grid and mark `obstacles` with their margins.
    ///
    /// Every obstacle is validated before anything is written; on error the
    /// grid keeps its previous contents.
    pub fn populate(&mut self, obstacles: &[Obstacle]) -> Result<()> {
        for (i, obstacle) in obstacles.iter().enumerate() {
            if !obstacle.cell.in_bounds() {
                return Err(MargaError::InvalidObstacle(format!(
                    "obstacle {} at {} is outside the arena",
                    obstacle.id, obstacle.cell
                )));
            }
            if !obstacle.facing.is_cardinal() {
                return Err(MargaError::InvalidObstacle(format!(
                    "obstacle {} faces {}, expected a cardinal bearing",
                    obstacle.id, obstacle.facing
                )));
            }
            if let Some(other) = obstacles[..i].iter().find(|o| o.cell == obstacle.cell) {
                return Err(MargaError::InvalidObstacle(format!(
                    "obstacles {} and {} share cell {}",
                    other.id, obstacle.id, obstacle.cell
                )));
            }
            if obstacles[..i].iter().any(|o| o.id == obstacle.id) {
                return Err(MargaError::InvalidObstacle(format!(
                    "obstacle id {} is used more than once",
                    obstacle.id
                )));
            }
        }

        self.reset();
        self.obstacles.extend_from_slice(obstacles);

        // Obstacles first so that margin propagation can skip them
        for obstacle in obstacles {
            self.cells[obstacle.cell.index()] = CellState::Obstacle(obstacle.facing);
        }
        for obstacle in obstacles {
            for bearing in Bearing::CARDINALS {
                for d in 1..=self.min_separation {
                    let cell = obstacle.cell.offset(bearing, d);
                    if !cell.in_bounds() {
                        break;
                    }
                    let slot = &mut self.cells[cell.index()];
                    if !matches!(slot, CellState::Obstacle(_)) {
                        *slot = CellState::BlockedMargin;
                    }
                }
            }
        }

        tracing::debug!(
            "Grid populated with {} obstacles (margin {} cells)",
            obstacles.len(),
            self.min_separation
        );
        Ok(())
    }

    /// State at `cell`, or `None` outside the arena.
    #[inline]
    pub fn state(&self, cell: Cell) -> Option<CellState> {
        cell.in_bounds().then(|| self.cells[cell.index()])
    }

    /// Is `cell` inside the arena and free of obstacle or margin markings?
    #[inline]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.state(cell).is_some_and(CellState::is_walkable)
    }

    /// Analytic clearance test against the obstacle registry.
    ///
    /// False iff some obstacle shares a row or column with `cell` and lies
    /// fewer than `min_separation + 1` cells away along that axis.
    pub fn has_clearance(&self, cell: Cell, min_separation: i32) -> bool {
        let limit = min_separation + 1;
        !self.obstacles.iter().any(|o| {
            (o.cell.x == cell.x && (o.cell.y - cell.y).abs() < limit)
                || (o.cell.y == cell.y && (o.cell.x - cell.x).abs() < limit)
        })
    }

    /// Registered obstacles in insertion order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Obstacle occupying `cell`, if any.
    pub fn obstacle_at(&self, cell: Cell) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.cell == cell)
    }

    /// Margin width baked into the grid.
    pub fn min_separation(&self) -> i32 {
        self.min_separation
    }
}
