//! # Marga
//!
//! Viewpoint tour planning for a grid-bound camera robot.
//!
//! ## Overview
//!
//! The robot drives on a 20×20 cell arena and must photograph one face of
//! each obstacle. For every obstacle Marga derives a standoff viewpoint,
//! orders the viewpoints into a short tour, searches a turn-aware route for
//! each leg and compiles it into drive primitives:
//!
//! - **FORWARD / REVERSE** - one cell along or against the current bearing
//! - **TURN_LEFT / TURN_RIGHT** - 90° in place
//! - **STOP** - closes a leg; the robot is at the viewpoint
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga::{MotionPlanner, parse_obstacle_message};
//!
//! let obstacles = parse_obstacle_message("ALG,0,7,18,West")?;
//! let plan = MotionPlanner::default().plan(&obstacles)?;
//!
//! for (obstacle_id, batch) in plan.batches() {
//!     println!("{}: {:?}", obstacle_id, batch);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! Internally row 0 is the top of the arena and y grows downward; North is
//! `y - 1`. The operator console numbers rows from the bottom, so
//! [`ingest`] flips y on the way in and [`RobotState::in_frame`] on the way
//! out.

// Core types
pub mod core;

// Arena grid
pub mod grid;

// Obstacle -> viewpoint
pub mod viewpoint;

// Tour, route search, primitive compilation
pub mod planning;

// Orchestrator
pub mod mission;

// Boundary conversion
pub mod ingest;

pub mod config;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    ARENA_SIZE, Bearing, Cell, CoordinateFrame, Obstacle, ObstacleId, Primitive, RobotState,
    Viewpoint,
};

pub use config::MargaConfig;
pub use error::{CompileError, LegError, MargaError, Result, RouteError};
pub use grid::{CellState, GridMap, MIN_SEPARATION};
pub use ingest::{ObstacleRecord, parse_obstacle_message};
pub use mission::{Leg, LegFailurePolicy, LegStatus, MissionConfig, MissionPlan, MotionPlanner};
pub use planning::{
    LegProgram, MovementCompiler, NodeKey, Route, RouteSearch, SearchConfig, StepCost, TourConfig,
    TourMethod, TourSolver,
};
pub use viewpoint::{STANDOFF_DISTANCE, ViewpointDeriver};
