//! Viewpoint derivation.
//!
//! Each obstacle yields exactly one standoff pose: `standoff` cells away on
//! the side opposite its facing bearing, with the robot holding the reverse
//! of that bearing.

use crate::core::{Cell, Obstacle, Viewpoint};
use crate::error::{MargaError, Result};

/// Default standoff distance in cells.
pub const STANDOFF_DISTANCE: i32 = 4;

/// Converts obstacles into the viewpoints the robot must visit.
#[derive(Clone, Debug)]
pub struct ViewpointDeriver {
    standoff: i32,
}

impl Default for ViewpointDeriver {
    fn default() -> Self {
        Self::new(STANDOFF_DISTANCE)
    }
}

impl ViewpointDeriver {
    /// Create a deriver with the given standoff distance in cells.
    pub fn new(standoff: i32) -> Self {
        Self { standoff }
    }

    /// Standoff distance in cells.
    pub fn standoff(&self) -> i32 {
        self.standoff
    }

    /// Derive the viewpoint for one obstacle.
    ///
    /// Fails with `InvalidViewpoint` when the obstacle bearing is not
    /// cardinal or the resulting cell falls outside the arena. Never clamps.
    pub fn derive(&self, obstacle: &Obstacle) -> Result<Viewpoint> {
        let bearing = obstacle.facing.reverse();
        if !bearing.is_cardinal() {
            return Err(MargaError::InvalidViewpoint {
                obstacle_id: obstacle.id,
                cell: obstacle.cell,
                bearing,
            });
        }

        let cell = obstacle.cell.offset(bearing, self.standoff);
        if !cell.in_bounds() {
            return Err(MargaError::InvalidViewpoint {
                obstacle_id: obstacle.id,
                cell,
                bearing,
            });
        }

        Ok(Viewpoint {
            obstacle_id: obstacle.id,
            cell,
            bearing,
        })
    }

    /// Derive viewpoints for every obstacle, dropping and logging invalid ones.
    ///
    /// Returns the valid viewpoints in obstacle order plus the errors for the
    /// dropped ones.
    pub fn derive_all(&self, obstacles: &[Obstacle]) -> (Vec<Viewpoint>, Vec<MargaError>) {
        let mut viewpoints = Vec::with_capacity(obstacles.len());
        let mut dropped = Vec::new();

        for obstacle in obstacles {
            match self.derive(obstacle) {
                Ok(vp) => {
                    tracing::debug!(
                        "Obstacle {} at {} facing {} -> viewpoint {} facing {}",
                        obstacle.id,
                        obstacle.cell,
                        obstacle.facing,
                        vp.cell,
                        vp.bearing
                    );
                    viewpoints.push(vp);
                }
                Err(e) => {
                    tracing::warn!("Dropping viewpoint: {}", e);
                    dropped.push(e);
                }
            }
        }

        (viewpoints, dropped)
    }

    /// Cells of a viewpoint list, in order.
    pub fn cells(viewpoints: &[Viewpoint]) -> Vec<Cell> {
        viewpoints.iter().map(|vp| vp.cell).collect()
    }
}
