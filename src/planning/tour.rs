//! Viewpoint visiting order.
//!
//! The tour is an open path: it starts at the robot's start cell and ends at
//! whichever viewpoint comes last. Edge weights are straight-line distances
//! on raw cell coordinates; turning costs only appear later, inside route
//! search.
//!
//! Two strategies are provided:
//! - [`BranchAndBound`]: exact depth-first search over all n! orders with
//!   cost pruning. Exponential; only used up to [`TourConfig::exact_limit`]
//!   stops.
//! - [`NearestNeighbor`]: greedy construction refined by 2-opt. Polynomial,
//!   not guaranteed optimal.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Viewpoint};

/// Default number of stops above which the exact strategy is not attempted.
pub const EXACT_STOP_LIMIT: usize = 10;

/// Computes a visiting order over a set of stops.
pub trait TourStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Return indices into `stops` in visiting order, starting from `start`.
    ///
    /// The result is always a permutation of `0..stops.len()`.
    fn order(&self, start: Cell, stops: &[Cell]) -> Vec<usize>;
}

/// Which strategy the solver runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourMethod {
    /// Exact branch-and-bound
    #[default]
    Exact,
    /// Nearest neighbour + 2-opt
    NearestNeighbor,
}

/// Tour solver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TourConfig {
    /// Strategy to run
    #[serde(default)]
    pub strategy: TourMethod,

    /// Largest stop count the exact strategy is allowed to handle
    #[serde(default = "default_exact_limit")]
    pub exact_limit: usize,
}

fn default_exact_limit() -> usize {
    EXACT_STOP_LIMIT
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            strategy: TourMethod::default(),
            exact_limit: default_exact_limit(),
        }
    }
}

/// Distance matrix over `[start, stops...]`.
///
/// The diagonal is infinite so a node never "travels" to itself.
fn distance_matrix(start: Cell, stops: &[Cell]) -> Vec<Vec<f64>> {
    let nodes: Vec<Cell> = std::iter::once(start).chain(stops.iter().copied()).collect();
    nodes
        .iter()
        .enumerate()
        .map(|(i, a)| {
            nodes
                .iter()
                .enumerate()
                .map(|(j, b)| {
                    if i == j {
                        f64::INFINITY
                    } else {
                        a.euclidean_distance(b)
                    }
                })
                .collect()
        })
        .collect()
}

/// Total straight-line length of `start -> stops[0] -> stops[1] -> ...`.
pub fn tour_length(start: Cell, stops: &[Cell]) -> f64 {
    let mut current = start;
    let mut total = 0.0;
    for stop in stops {
        total += current.euclidean_distance(stop);
        current = *stop;
    }
    total
}

/// Exact depth-first branch-and-bound.
///
/// A branch is abandoned as soon as its accumulated cost plus the next edge
/// exceeds the best complete tour found so far. A complete tour replaces the
/// incumbent only when strictly cheaper, so among equal-cost orders the first
/// one found in index order wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchAndBound;

struct BranchState<'a> {
    dist: &'a [Vec<f64>],
    visited: Vec<bool>,
    partial: Vec<usize>,
    best_cost: f64,
    best: Vec<usize>,
}

impl BranchState<'_> {
    fn search(&mut self, current: usize, cost: f64) {
        let n = self.dist.len();
        if self.partial.len() == n - 1 {
            if cost < self.best_cost {
                self.best_cost = cost;
                self.best.clone_from(&self.partial);
            }
            return;
        }

        for next in 1..n {
            if self.visited[next] {
                continue;
            }
            let next_cost = cost + self.dist[current][next];
            if next_cost > self.best_cost {
                continue;
            }
            self.visited[next] = true;
            self.partial.push(next);
            self.search(next, next_cost);
            self.partial.pop();
            self.visited[next] = false;
        }
    }
}

impl TourStrategy for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn order(&self, start: Cell, stops: &[Cell]) -> Vec<usize> {
        if stops.len() <= 1 {
            return (0..stops.len()).collect();
        }

        let dist = distance_matrix(start, stops);
        let mut state = BranchState {
            dist: &dist,
            visited: vec![false; dist.len()],
            partial: Vec::with_capacity(stops.len()),
            best_cost: f64::INFINITY,
            best: Vec::new(),
        };
        state.visited[0] = true;
        state.search(0, 0.0);

        tracing::trace!("Branch-and-bound tour cost {:.3}", state.best_cost);
        // Node 0 is the start; stops are shifted by one
        state.best.into_iter().map(|node| node - 1).collect()
    }
}

/// Greedy nearest-neighbour construction followed by open-path 2-opt.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl TourStrategy for NearestNeighbor {
    fn name(&self) -> &'static str {
        "nearest-neighbor"
    }

    fn order(&self, start: Cell, stops: &[Cell]) -> Vec<usize> {
        if stops.len() <= 1 {
            return (0..stops.len()).collect();
        }

        let dist = distance_matrix(start, stops);
        let n = dist.len();

        let mut used = vec![false; n];
        let mut path = Vec::with_capacity(n);
        let mut current = 0usize;
        used[0] = true;
        path.push(0);

        for _ in 1..n {
            let mut best: Option<(usize, f64)> = None;
            for j in 1..n {
                if used[j] {
                    continue;
                }
                let c = dist[current][j];
                if best.is_none_or(|(_, bc)| c < bc) {
                    best = Some((j, c));
                }
            }
            let Some((next, _)) = best else { break };
            used[next] = true;
            path.push(next);
            current = next;
        }

        // 2-opt with the start pinned and a free tail
        let mut improved = true;
        while improved {
            improved = false;
            for i in 1..n - 1 {
                for k in (i + 1)..n {
                    let a = path[i - 1];
                    let b = path[i];
                    let c = path[k];
                    let before = dist[a][b];
                    let after = dist[a][c];
                    let (tail_before, tail_after) = if k + 1 < n {
                        let d = path[k + 1];
                        (dist[c][d], dist[b][d])
                    } else {
                        (0.0, 0.0)
                    };
                    let delta = after + tail_after - before - tail_before;
                    if delta < -1e-9 {
                        path[i..=k].reverse();
                        improved = true;
                    }
                }
            }
        }

        path.into_iter().skip(1).map(|node| node - 1).collect()
    }
}

/// Orders viewpoints for a mission.
#[derive(Clone, Debug, Default)]
pub struct TourSolver {
    config: TourConfig,
}

impl TourSolver {
    /// Create a solver with configuration.
    pub fn new(config: TourConfig) -> Self {
        Self { config }
    }

    /// Strategy that will run for `stops` stops.
    fn strategy_for(&self, stops: usize) -> &'static dyn TourStrategy {
        match self.config.strategy {
            TourMethod::Exact if stops <= self.config.exact_limit => &BranchAndBound,
            TourMethod::Exact => {
                tracing::warn!(
                    "{} stops exceed the exact tour limit of {}, using nearest-neighbor",
                    stops,
                    self.config.exact_limit
                );
                &NearestNeighbor
            }
            TourMethod::NearestNeighbor => &NearestNeighbor,
        }
    }

    /// Visiting order over viewpoint cells; bearings are ignored here.
    ///
    /// Empty input yields an empty order and a single viewpoint is returned
    /// as is.
    pub fn solve(&self, start: Cell, viewpoints: &[Viewpoint]) -> Vec<Viewpoint> {
        let cells: Vec<Cell> = viewpoints.iter().map(|vp| vp.cell).collect();
        let strategy = self.strategy_for(cells.len());
        let order = strategy.order(start, &cells);

        let ordered: Vec<Viewpoint> = order.iter().map(|&i| viewpoints[i]).collect();
        tracing::debug!(
            "Tour ({}) over {} viewpoints: {:?}, length {:.2}",
            strategy.name(),
            ordered.len(),
            ordered.iter().map(|vp| vp.obstacle_id).collect::<Vec<_>>(),
            tour_length(start, &order.iter().map(|&i| cells[i]).collect::<Vec<_>>())
        );
        ordered
    }
}
