//! Mission orchestration.
//!
//! [`MotionPlanner::plan`] runs the whole pipeline for one obstacle list:
//!
//! ```text
//! obstacles -> GridMap -> viewpoints -> tour order -> per leg: route -> primitives
//! ```
//!
//! Each call owns a fresh [`GridMap`] and [`RobotState`], so planning the
//! same obstacles twice yields the same [`MissionPlan`]. Leg failures are
//! resolved here, according to [`LegFailurePolicy`].

use serde::{Deserialize, Serialize};

use crate::core::{
    Bearing, Cell, CoordinateFrame, Obstacle, ObstacleId, Primitive, RobotState, START_BEARING,
    START_CELL, Viewpoint,
};
use crate::error::{LegError, MargaError, Result, RouteError};
use crate::grid::GridMap;
use crate::planning::{MovementCompiler, RouteSearch, SearchConfig, TourConfig, TourSolver};
use crate::viewpoint::{STANDOFF_DISTANCE, ViewpointDeriver};

/// What to do when a leg cannot be planned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegFailurePolicy {
    /// Record the failed leg and continue from the unchanged robot state
    #[default]
    Skip,
    /// Fail the whole mission
    Abort,
    /// Drive an exhausted search's partial route, otherwise as `Skip`
    AcceptPartial,
}

/// Mission-level settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Start cell in the arena (bottom-left) frame
    #[serde(default = "default_start")]
    pub start: Cell,

    /// Start bearing
    #[serde(default = "default_start_bearing")]
    pub start_bearing: Bearing,

    /// Viewpoint standoff distance (cells)
    #[serde(default = "default_standoff")]
    pub standoff: i32,

    /// Leg failure handling
    #[serde(default)]
    pub on_leg_failure: LegFailurePolicy,
}

fn default_start() -> Cell {
    CoordinateFrame::BottomLeft.convert(START_CELL)
}
fn default_start_bearing() -> Bearing {
    START_BEARING
}
fn default_standoff() -> i32 {
    STANDOFF_DISTANCE
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            start_bearing: default_start_bearing(),
            standoff: default_standoff(),
            on_leg_failure: LegFailurePolicy::default(),
        }
    }
}

impl MissionConfig {
    /// Start state in the internal frame.
    ///
    /// Fails when the start cell is outside the arena or the bearing is
    /// diagonal.
    pub fn start_state(&self) -> Result<RobotState> {
        let position = CoordinateFrame::BottomLeft.convert(self.start);
        if !position.in_bounds() {
            return Err(MargaError::Config(format!(
                "start cell {} is outside the arena",
                self.start
            )));
        }
        if !self.start_bearing.is_cardinal() {
            return Err(MargaError::Config(format!(
                "start bearing {} is not cardinal",
                self.start_bearing
            )));
        }
        Ok(RobotState::new(position, self.start_bearing))
    }
}

/// Outcome of a single leg.
#[derive(Clone, Debug, PartialEq)]
pub enum LegStatus {
    /// Route reached the viewpoint
    Complete,
    /// Search gave up; primitives drive the partial route only
    Partial,
    /// No primitives were produced
    Failed(LegError),
}

/// One leg of a mission: from the previous pose to one viewpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    /// Obstacle the leg photographs
    pub obstacle_id: ObstacleId,
    /// Target pose
    pub viewpoint: Viewpoint,
    /// Route cells driven (empty when the search failed)
    pub route: Vec<Cell>,
    /// Drive primitives, terminated by STOP unless the leg failed
    pub primitives: Vec<Primitive>,
    /// Robot state after each primitive
    pub snapshots: Vec<RobotState>,
    /// Outcome
    pub status: LegStatus,
}

impl Leg {
    fn failed(viewpoint: Viewpoint, route: Vec<Cell>, reason: LegError) -> Self {
        Self {
            obstacle_id: viewpoint.obstacle_id,
            viewpoint,
            route,
            primitives: Vec::new(),
            snapshots: Vec::new(),
            status: LegStatus::Failed(reason),
        }
    }

    /// Did this leg produce primitives?
    pub fn is_drivable(&self) -> bool {
        !self.primitives.is_empty()
    }
}

/// Complete plan for one mission.
#[derive(Clone, Debug, PartialEq)]
pub struct MissionPlan {
    /// Legs in tour order
    pub legs: Vec<Leg>,
    /// Obstacles whose viewpoint was invalid
    pub dropped: Vec<ObstacleId>,
    /// Robot state after the last drivable leg
    pub final_state: RobotState,
}

impl MissionPlan {
    /// Primitive batches tagged with the obstacle each one ends at.
    pub fn batches(&self) -> impl Iterator<Item = (ObstacleId, &[Primitive])> + '_ {
        self.legs
            .iter()
            .filter(|leg| leg.is_drivable())
            .map(|leg| (leg.obstacle_id, leg.primitives.as_slice()))
    }

    /// Number of legs that reached their viewpoint.
    pub fn completed(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| leg.status == LegStatus::Complete)
            .count()
    }

    /// Total primitives across all batches.
    pub fn total_primitives(&self) -> usize {
        self.legs.iter().map(|leg| leg.primitives.len()).sum()
    }

    /// Was there nothing to drive?
    pub fn is_empty(&self) -> bool {
        self.batches().next().is_none()
    }
}

/// Runs the planning pipeline.
#[derive(Clone, Debug, Default)]
pub struct MotionPlanner {
    mission: MissionConfig,
    deriver: ViewpointDeriver,
    tour: TourSolver,
    search: RouteSearch,
    compiler: MovementCompiler,
}

impl MotionPlanner {
    /// Create a planner from its stage configurations.
    pub fn new(mission: MissionConfig, search: SearchConfig, tour: TourConfig) -> Self {
        Self {
            deriver: ViewpointDeriver::new(mission.standoff),
            mission,
            tour: TourSolver::new(tour),
            search: RouteSearch::new(search),
            compiler: MovementCompiler::new(),
        }
    }

    /// Mission settings in use.
    pub fn mission(&self) -> &MissionConfig {
        &self.mission
    }

    /// Plan a mission over `obstacles` (internal frame).
    ///
    /// Invalid obstacles fail the whole call. Invalid viewpoints are dropped
    /// and listed in [`MissionPlan::dropped`]. Leg failures follow the
    /// configured [`LegFailurePolicy`].
    pub fn plan(&self, obstacles: &[Obstacle]) -> Result<MissionPlan> {
        let start = self.mission.start_state()?;

        let mut grid = GridMap::new(self.search.config().min_separation);
        grid.populate(obstacles)?;

        let (viewpoints, errors) = self.deriver.derive_all(obstacles);
        let dropped: Vec<ObstacleId> = errors
            .iter()
            .filter_map(|e| match e {
                MargaError::InvalidViewpoint { obstacle_id, .. } => Some(*obstacle_id),
                _ => None,
            })
            .collect();

        if viewpoints.is_empty() {
            tracing::info!("No viewpoints to visit, mission plan is empty");
        }

        let ordered = self.tour.solve(start.position, &viewpoints);

        let mut state = start;
        let mut legs = Vec::with_capacity(ordered.len());
        for viewpoint in ordered {
            legs.push(self.plan_leg(&grid, &mut state, viewpoint)?);
        }

        let plan = MissionPlan {
            legs,
            dropped,
            final_state: state,
        };
        tracing::info!(
            "Mission planned: {}/{} legs complete, {} primitives, {} viewpoints dropped",
            plan.completed(),
            plan.legs.len(),
            plan.total_primitives(),
            plan.dropped.len()
        );
        Ok(plan)
    }

    fn plan_leg(&self, grid: &GridMap, state: &mut RobotState, viewpoint: Viewpoint) -> Result<Leg> {
        let policy = self.mission.on_leg_failure;

        let (route, status) =
            match self.search.find(grid, state.position, state.bearing, viewpoint.cell) {
                Ok(route) => (route.cells, LegStatus::Complete),
                Err(RouteError::SearchExhausted { partial })
                    if policy == LegFailurePolicy::AcceptPartial =>
                {
                    tracing::warn!(
                        "Leg to obstacle {} accepted as partial, stopping at {}",
                        viewpoint.obstacle_id,
                        partial.end()
                    );
                    (partial.cells, LegStatus::Partial)
                }
                Err(e) => return self.leg_failed(viewpoint, Vec::new(), e.into()),
            };

        match self.compiler.compile(&route, state, viewpoint.bearing) {
            Ok(program) => {
                tracing::debug!(
                    "Leg to obstacle {}: {} cells, {} primitives, now at {} facing {}",
                    viewpoint.obstacle_id,
                    route.len(),
                    program.primitives.len(),
                    state.position,
                    state.bearing
                );
                Ok(Leg {
                    obstacle_id: viewpoint.obstacle_id,
                    viewpoint,
                    route,
                    primitives: program.primitives,
                    snapshots: program.snapshots,
                    status,
                })
            }
            Err(e) => self.leg_failed(viewpoint, route, e.into()),
        }
    }

    fn leg_failed(&self, viewpoint: Viewpoint, route: Vec<Cell>, reason: LegError) -> Result<Leg> {
        if self.mission.on_leg_failure == LegFailurePolicy::Abort {
            return Err(MargaError::LegFailed {
                obstacle_id: viewpoint.obstacle_id,
                source: reason,
            });
        }
        tracing::warn!("Skipping leg to obstacle {}: {}", viewpoint.obstacle_id, reason);
        Ok(Leg::failed(viewpoint, route, reason))
    }
}
