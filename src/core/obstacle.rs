//! Obstacles and the viewpoints derived from them.

use serde::{Deserialize, Serialize};

use super::bearing::Bearing;
use super::cell::Cell;

/// Obstacle identity as assigned by the operator console
pub type ObstacleId = u32;

/// An obstacle placed in the arena (internal top-left frame)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    /// Unique id
    pub id: ObstacleId,
    /// Occupied cell
    pub cell: Cell,
    /// Direction the image face points (cardinal only)
    pub facing: Bearing,
}

impl Obstacle {
    /// Create a new obstacle
    pub fn new(id: ObstacleId, x: i32, y: i32, facing: Bearing) -> Self {
        Self {
            id,
            cell: Cell::new(x, y),
            facing,
        }
    }
}

/// Standoff pose from which an obstacle must be photographed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewpoint {
    /// Obstacle this viewpoint observes
    pub obstacle_id: ObstacleId,
    /// Cell the robot must stand on
    pub cell: Cell,
    /// Bearing the robot must hold when the leg ends
    pub bearing: Bearing,
}
