//! Planning pipeline stages.
//!
//! This module provides:
//! - Tour ordering over viewpoints (exact or nearest-neighbour)
//! - Turn-aware grid route search with obstacle clearance
//! - Route to drive-primitive compilation

mod compiler;
mod route_search;
mod tour;

pub use compiler::{LegProgram, MovementCompiler, bearing_correction};
pub use route_search::{
    DEFAULT_MAX_EXPANSIONS, MOVE_COST, NodeKey, Route, RouteSearch, SearchConfig, StepCost,
    TURN_FACTOR,
};
pub use tour::{
    BranchAndBound, EXACT_STOP_LIMIT, NearestNeighbor, TourConfig, TourMethod, TourSolver,
    TourStrategy, tour_length,
};
