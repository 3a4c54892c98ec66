//! Error types for Marga

use thiserror::Error;

use crate::core::{Bearing, Cell, ObstacleId};
use crate::planning::Route;

/// Marga error type
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid obstacle: {0}")]
    InvalidObstacle(String),

    #[error("Invalid viewpoint for obstacle {obstacle_id}: {cell} facing {bearing}")]
    InvalidViewpoint {
        obstacle_id: ObstacleId,
        cell: Cell,
        bearing: Bearing,
    },

    #[error("Leg to obstacle {obstacle_id} failed: {source}")]
    LegFailed {
        obstacle_id: ObstacleId,
        #[source]
        source: LegError,
    },
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

/// Route search failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Expansion cap reached; carries the best partial route found so far.
    #[error("Search exhausted after {} expansions, best partial route ends at {}", .partial.expansions, .partial.end())]
    SearchExhausted { partial: Route },

    /// Open set drained without reaching the goal.
    #[error("No route from {from} to {to} ({expansions} expansions)")]
    Unreachable {
        from: Cell,
        to: Cell,
        expansions: usize,
    },
}

/// Movement compilation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Route starts at {route_start} but robot is at {robot}")]
    StartMismatch { route_start: Cell, robot: Cell },

    #[error("Route cells {from} and {to} are not 4-adjacent")]
    Discontinuous { from: Cell, to: Cell },

    #[error("Bearing {0} is not cardinal")]
    DiagonalBearing(Bearing),
}

/// Why a single leg produced no usable batch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LegError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub type Result<T> = std::result::Result<T, MargaError>;
