//! Cost-augmented 4-connected grid search between viewpoints.
//!
//! A*-style search with three deliberate departures from the textbook form:
//! - each step carries a bearing, and a step that leaves the carried axis is
//!   charged through [`StepCost`] instead of modelling explicit turn nodes;
//! - the heuristic is squared Euclidean distance (not admissible);
//! - the open list is a plain vector scanned linearly, taking the first node
//!   with strictly lower f, which makes tie-breaks follow insertion order.
//!
//! Results are deterministic for a given grid and query.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::{ARENA_SIZE, Bearing, Cell};
use crate::error::RouteError;
use crate::grid::{GridMap, MIN_SEPARATION};

/// Cost of one cell step along the carried axis.
pub const MOVE_COST: u32 = 10;

/// Multiplier applied to a step that changes travel axis.
pub const TURN_FACTOR: u32 = 2;

/// Expansion cap: `(rows / 2)^5`.
pub const DEFAULT_MAX_EXPANSIONS: usize = ((ARENA_SIZE / 2) as usize).pow(5);

/// Neighbour order: up, right, down, left.
const MOVES: [Bearing; 4] = Bearing::CARDINALS;

/// Step cost rule.
///
/// A step along the axis of the carried bearing (same or opposite
/// direction) costs `move_cost`. A step onto the perpendicular axis is an
/// implicit turn-in-place followed by a move, charged `move_cost * turn_factor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCost {
    /// Base cost per cell
    pub move_cost: u32,
    /// Multiplier for axis changes
    pub turn_factor: u32,
}

impl Default for StepCost {
    fn default() -> Self {
        Self {
            move_cost: MOVE_COST,
            turn_factor: TURN_FACTOR,
        }
    }
}

impl StepCost {
    /// Cost of stepping along `step` when arriving with `carried`.
    #[inline]
    pub fn cost(&self, carried: Bearing, step: Bearing) -> u32 {
        if carried.same_axis(step) {
            self.move_cost
        } else {
            self.move_cost.saturating_mul(self.turn_factor)
        }
    }

    /// Total cost of a cell sequence starting with `bearing`.
    ///
    /// Returns `None` if two consecutive cells are not 4-adjacent.
    pub fn route_cost(&self, bearing: Bearing, cells: &[Cell]) -> Option<u32> {
        let mut carried = bearing;
        let mut total = 0;
        for pair in cells.windows(2) {
            let step = pair[0].bearing_to(&pair[1])?;
            total = self.cost(carried, step).saturating_add(total);
            carried = step;
        }
        Some(total)
    }
}

/// Identity of a node in the visited and open sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKey {
    /// Cell only. Two arrivals at one cell with different bearings are the
    /// same node.
    #[default]
    Position,
    /// Cell and carried bearing.
    PositionAndBearing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct VisitKey {
    cell: Cell,
    bearing: Option<Bearing>,
}

impl NodeKey {
    #[inline]
    fn key(self, cell: Cell, bearing: Bearing) -> VisitKey {
        match self {
            NodeKey::Position => VisitKey {
                cell,
                bearing: None,
            },
            NodeKey::PositionAndBearing => VisitKey {
                cell,
                bearing: Some(bearing),
            },
        }
    }
}

/// Route search configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base cost per cell step
    #[serde(default = "default_move_cost")]
    pub move_cost: u32,

    /// Cost multiplier for a step that changes axis
    #[serde(default = "default_turn_factor")]
    pub turn_factor: u32,

    /// Required row/column clearance from every obstacle (cells)
    #[serde(default = "default_min_separation")]
    pub min_separation: i32,

    /// Visited-set identity
    #[serde(default)]
    pub node_key: NodeKey,

    /// Expansion cap before returning a partial route
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

fn default_move_cost() -> u32 {
    MOVE_COST
}
fn default_turn_factor() -> u32 {
    TURN_FACTOR
}
fn default_min_separation() -> i32 {
    MIN_SEPARATION
}
fn default_max_expansions() -> usize {
    DEFAULT_MAX_EXPANSIONS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            move_cost: default_move_cost(),
            turn_factor: default_turn_factor(),
            min_separation: default_min_separation(),
            node_key: NodeKey::default(),
            max_expansions: default_max_expansions(),
        }
    }
}

impl SearchConfig {
    /// The step cost rule described by this configuration.
    pub fn step_cost(&self) -> StepCost {
        StepCost {
            move_cost: self.move_cost,
            turn_factor: self.turn_factor,
        }
    }
}

/// Ordered cells from a leg's start to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Cells including start and end
    pub cells: Vec<Cell>,
    /// Accumulated step cost
    pub cost: u32,
    /// Nodes expanded while searching
    pub expansions: usize,
}

impl Route {
    /// First cell.
    pub fn start(&self) -> Cell {
        self.cells.first().copied().unwrap_or_default()
    }

    /// Last cell.
    pub fn end(&self) -> Cell {
        self.cells.last().copied().unwrap_or_default()
    }

    /// Number of cell steps.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
}

#[derive(Clone, Debug)]
struct SearchNode {
    cell: Cell,
    bearing: Bearing,
    g: i64,
    f: i64,
    parent: Option<usize>,
}

/// Grid route search.
#[derive(Clone, Debug, Default)]
pub struct RouteSearch {
    config: SearchConfig,
}

impl RouteSearch {
    /// Create a search with configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Can the search step onto `cell`?
    #[inline]
    fn admits(&self, grid: &GridMap, cell: Cell) -> bool {
        cell.in_bounds()
            && grid.has_clearance(cell, self.config.min_separation)
            && grid.is_walkable(cell)
    }

    #[inline]
    fn heuristic(from: Cell, goal: Cell) -> i64 {
        from.squared_distance(&goal)
    }

    /// Find a route from `start` (holding `bearing`) to `goal`.
    ///
    /// The goal test compares cells only; the final bearing is the
    /// compiler's concern. The start cell itself is not checked.
    pub fn find(
        &self,
        grid: &GridMap,
        start: Cell,
        bearing: Bearing,
        goal: Cell,
    ) -> Result<Route, RouteError> {
        tracing::trace!("[RouteSearch] find: start={} facing {} goal={}", start, bearing, goal);

        let step_cost = self.config.step_cost();
        let node_key = self.config.node_key;

        let mut nodes = vec![SearchNode {
            cell: start,
            bearing,
            g: 0,
            f: 0,
            parent: None,
        }];
        let mut open: Vec<usize> = vec![0];
        let mut closed: HashSet<VisitKey> = HashSet::new();
        let mut expansions = 0usize;

        while !open.is_empty() {
            expansions += 1;

            // First node with strictly lower f wins
            let mut best = 0;
            for (pos, &idx) in open.iter().enumerate() {
                if nodes[idx].f < nodes[open[best]].f {
                    best = pos;
                }
            }
            let current = open[best];

            if expansions > self.config.max_expansions {
                let partial = Self::reconstruct(&nodes, current, expansions);
                tracing::warn!(
                    "[RouteSearch] gave up after {} expansions, partial route ends at {}",
                    expansions,
                    partial.end()
                );
                return Err(RouteError::SearchExhausted { partial });
            }

            open.remove(best);
            let SearchNode {
                cell, bearing: carried, g, ..
            } = nodes[current];
            closed.insert(node_key.key(cell, carried));

            if cell == goal {
                let route = Self::reconstruct(&nodes, current, expansions);
                tracing::trace!(
                    "[RouteSearch] SUCCESS: {} cells, cost={}, expansions={}",
                    route.cells.len(),
                    route.cost,
                    expansions
                );
                return Ok(route);
            }

            for step in MOVES {
                let next = cell.step(step);
                if !self.admits(grid, next) {
                    continue;
                }

                let key = node_key.key(next, step);
                if closed.contains(&key) {
                    continue;
                }

                let child_g = g + step_cost.cost(carried, step) as i64;
                let queued_cheaper = open.iter().any(|&i| {
                    node_key.key(nodes[i].cell, nodes[i].bearing) == key && child_g > nodes[i].g
                });
                if queued_cheaper {
                    continue;
                }

                nodes.push(SearchNode {
                    cell: next,
                    bearing: step,
                    g: child_g,
                    f: child_g + Self::heuristic(next, goal),
                    parent: Some(current),
                });
                open.push(nodes.len() - 1);
            }
        }

        tracing::debug!(
            "[RouteSearch] FAILED: no route from {} to {} after {} expansions",
            start,
            goal,
            expansions
        );
        Err(RouteError::Unreachable {
            from: start,
            to: goal,
            expansions,
        })
    }

    fn reconstruct(nodes: &[SearchNode], last: usize, expansions: usize) -> Route {
        let mut cells = Vec::new();
        let mut current = Some(last);
        while let Some(idx) = current {
            cells.push(nodes[idx].cell);
            current = nodes[idx].parent;
        }
        cells.reverse();

        Route {
            cells,
            cost: u32::try_from(nodes[last].g).unwrap_or(u32::MAX),
            expansions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Obstacle;

    fn assert_contiguous(route: &Route) {
        for pair in route.cells.windows(2) {
            assert!(
                pair[0].bearing_to(&pair[1]).is_some(),
                "{} -> {} is not a 4-neighbour step",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_step_cost_rule() {
        let rule = StepCost::default();
        assert_eq!(rule.cost(Bearing::North, Bearing::North), 10);
        assert_eq!(rule.cost(Bearing::North, Bearing::South), 10);
        assert_eq!(rule.cost(Bearing::North, Bearing::East), 20);
        assert_eq!(rule.cost(Bearing::West, Bearing::South), 20);

        let cells = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)];
        assert_eq!(rule.route_cost(Bearing::South, &cells), Some(40));
        assert_eq!(rule.route_cost(Bearing::South, &[Cell::new(0, 0), Cell::new(2, 0)]), None);
    }

    #[test]
    fn test_step_cost_saturates() {
        let rule = StepCost {
            move_cost: 10,
            turn_factor: u32::MAX,
        };
        assert_eq!(rule.cost(Bearing::North, Bearing::East), u32::MAX);
        assert_eq!(rule.cost(Bearing::North, Bearing::North), 10);

        let corner = [Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)];
        assert_eq!(rule.route_cost(Bearing::North, &corner), Some(u32::MAX));
    }

    #[test]
    fn test_straight_route_on_empty_grid() {
        let grid = GridMap::default();
        let search = RouteSearch::default();

        let route = search
            .find(&grid, Cell::new(0, 0), Bearing::South, Cell::new(0, 5))
            .unwrap();

        assert_eq!(route.cells.len(), 6);
        assert_eq!(route.cost, 50);
        assert!(route.cells.iter().all(|c| c.x == 0));
        assert_eq!(route.start(), Cell::new(0, 0));
        assert_eq!(route.end(), Cell::new(0, 5));
    }

    #[test]
    fn test_reverse_axis_is_not_a_turn() {
        let grid = GridMap::default();
        let route = RouteSearch::default()
            .find(&grid, Cell::new(0, 0), Bearing::North, Cell::new(0, 5))
            .unwrap();
        assert_eq!(route.cost, 50);
    }

    #[test]
    fn test_perpendicular_start_pays_one_turn() {
        let grid = GridMap::default();
        let route = RouteSearch::default()
            .find(&grid, Cell::new(0, 0), Bearing::East, Cell::new(0, 5))
            .unwrap();
        assert_eq!(route.cells.len(), 6);
        assert_eq!(route.cost, 60);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = GridMap::default();
        let route = RouteSearch::default()
            .find(&grid, Cell::new(4, 4), Bearing::North, Cell::new(4, 4))
            .unwrap();
        assert_eq!(route.cells, vec![Cell::new(4, 4)]);
        assert_eq!(route.cost, 0);
        assert_eq!(route.steps(), 0);
    }

    #[test]
    fn test_route_detours_around_clearance_zone() {
        let mut grid = GridMap::default();
        grid.populate(&[Obstacle::new(0, 10, 10, Bearing::North)]).unwrap();

        let route = RouteSearch::default()
            .find(&grid, Cell::new(10, 3), Bearing::South, Cell::new(10, 17))
            .unwrap();

        assert_eq!(route.end(), Cell::new(10, 17));
        assert!(route.cells.len() > 15, "straight line would be 15 cells");
        assert_contiguous(&route);
        for cell in &route.cells[1..] {
            assert!(grid.has_clearance(*cell, MIN_SEPARATION), "{} too close", cell);
            assert!(grid.is_walkable(*cell));
        }
    }

    #[test]
    fn test_obstacle_in_column_forces_detour() {
        // Obstacle at (0, 2): column 0 is blocked for rows 0..=5
        let mut grid = GridMap::default();
        grid.populate(&[Obstacle::new(0, 0, 2, Bearing::East)]).unwrap();

        let route = RouteSearch::default()
            .find(&grid, Cell::new(4, 0), Bearing::South, Cell::new(4, 8))
            .unwrap();
        for cell in &route.cells {
            assert!(!(cell.x == 0 && (cell.y - 2).abs() <= 3));
            assert!(!(cell.y == 2 && cell.x.abs() <= 3));
        }
        assert_eq!(route.end(), Cell::new(4, 8));
    }

    #[test]
    fn test_cost_matches_step_rule() {
        let mut grid = GridMap::default();
        grid.populate(&[
            Obstacle::new(0, 7, 1, Bearing::West),
            Obstacle::new(1, 12, 12, Bearing::North),
        ])
        .unwrap();

        for key in [NodeKey::Position, NodeKey::PositionAndBearing] {
            let search = RouteSearch::new(SearchConfig {
                node_key: key,
                ..Default::default()
            });
            let route = search
                .find(&grid, Cell::new(1, 18), Bearing::North, Cell::new(11, 1))
                .unwrap();
            assert_contiguous(&route);
            assert_eq!(route.end(), Cell::new(11, 1));
            assert_eq!(
                StepCost::default().route_cost(Bearing::North, &route.cells),
                Some(route.cost)
            );
        }
    }

    #[test]
    fn test_bearing_key_finds_cheaper_turns() {
        // Position-only keys close (cell) on the first arrival and lose a
        // later arrival whose bearing would have saved a turn.
        let mut grid = GridMap::default();
        grid.populate(&[
            Obstacle::new(0, 13, 7, Bearing::East),
            Obstacle::new(1, 15, 16, Bearing::West),
            Obstacle::new(2, 9, 0, Bearing::North),
            Obstacle::new(3, 15, 14, Bearing::North),
        ])
        .unwrap();

        let find = |node_key| {
            RouteSearch::new(SearchConfig {
                node_key,
                ..Default::default()
            })
            .find(&grid, Cell::new(1, 18), Bearing::North, Cell::new(11, 13))
            .unwrap()
        };

        let by_position = find(NodeKey::Position);
        let by_pose = find(NodeKey::PositionAndBearing);

        assert_eq!(by_position.cost, 170);
        assert_eq!(by_pose.cost, 160);
        assert_eq!(by_position.end(), by_pose.end());
    }

    #[test]
    fn test_unreachable_goal() {
        let mut grid = GridMap::default();
        grid.populate(&[Obstacle::new(0, 10, 10, Bearing::North)]).unwrap();

        // Goal sits inside the clearance zone
        let err = RouteSearch::default()
            .find(&grid, Cell::new(2, 2), Bearing::North, Cell::new(10, 12))
            .unwrap_err();
        assert!(matches!(err, RouteError::Unreachable { .. }));
    }

    #[test]
    fn test_expansion_cap_returns_partial() {
        let grid = GridMap::default();
        let search = RouteSearch::new(SearchConfig {
            max_expansions: 3,
            ..Default::default()
        });

        let err = search
            .find(&grid, Cell::new(0, 0), Bearing::South, Cell::new(19, 19))
            .unwrap_err();
        match err {
            RouteError::SearchExhausted { partial } => {
                assert_eq!(partial.start(), Cell::new(0, 0));
                assert_ne!(partial.end(), Cell::new(19, 19));
                assert_contiguous(&partial);
                assert_eq!(partial.expansions, 4);
            }
            other => panic!("expected SearchExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_default_cap() {
        assert_eq!(DEFAULT_MAX_EXPANSIONS, 100_000);
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut grid = GridMap::default();
        grid.populate(&[Obstacle::new(0, 6, 9, Bearing::South), Obstacle::new(1, 14, 4, Bearing::West)])
            .unwrap();
        let search = RouteSearch::default();
        let a = search.find(&grid, Cell::new(1, 18), Bearing::North, Cell::new(18, 4));
        let b = search.find(&grid, Cell::new(1, 18), Bearing::North, Cell::new(18, 4));
        assert_eq!(a, b);
    }
}
