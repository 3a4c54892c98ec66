//! Test utilities for Marga integration tests.
//!
//! Helpers for building obstacle layouts and replaying mission plans.

#![allow(dead_code)]

use rand::prelude::*;
use rand::rngs::StdRng;

use marga::{Bearing, Cell, Leg, MissionPlan, Obstacle, RobotState};

/// Five obstacles spread over the arena (internal frame).
pub fn arena_layout() -> Vec<Obstacle> {
    vec![
        Obstacle::new(0, 7, 1, Bearing::West),
        Obstacle::new(1, 15, 14, Bearing::North),
        Obstacle::new(2, 4, 9, Bearing::South),
        Obstacle::new(3, 12, 6, Bearing::East),
        Obstacle::new(4, 17, 3, Bearing::West),
    ]
}

/// `n` obstacles on distinct cells with random cardinal facings.
///
/// Obstacles never sit in the 3×3 start zone.
pub fn random_obstacles(rng: &mut StdRng, n: usize) -> Vec<Obstacle> {
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(n);
    while obstacles.len() < n {
        let cell = Cell::new(rng.random_range(0..20), rng.random_range(0..20));
        let in_start_zone = cell.x <= 2 && cell.y >= 17;
        if in_start_zone || obstacles.iter().any(|o| o.cell == cell) {
            continue;
        }
        let facing = Bearing::CARDINALS[rng.random_range(0..4)];
        obstacles.push(Obstacle {
            id: obstacles.len() as u32,
            cell,
            facing,
        });
    }
    obstacles
}

/// Replay one leg's primitives from `state`.
pub fn replay_leg(state: &mut RobotState, leg: &Leg) {
    for primitive in &leg.primitives {
        state.apply(*primitive);
    }
}

/// Replay the whole plan from the mission start.
pub fn replay(plan: &MissionPlan) -> RobotState {
    let mut state = RobotState::start();
    for leg in &plan.legs {
        replay_leg(&mut state, leg);
    }
    state
}
