//! Core data model: cells, bearings, obstacles, primitives and robot state.

mod bearing;
mod cell;
mod obstacle;
mod primitive;
mod state;

pub use bearing::{Bearing, SENTINEL_EAST, SENTINEL_NORTH, SENTINEL_SOUTH, SENTINEL_WEST};
pub use cell::{ARENA_SIZE, Cell, CoordinateFrame};
pub use obstacle::{Obstacle, ObstacleId, Viewpoint};
pub use primitive::Primitive;
pub use state::{RobotState, START_BEARING, START_CELL};
