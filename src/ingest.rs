//! Obstacle ingestion at the arena boundary.
//!
//! The operator console and config files describe obstacles with rows
//! counted from the bottom of the arena and directions as names ("North")
//! or legacy sentinels ("10"). Everything is validated and flipped into the
//! internal frame here; nothing malformed reaches the grid.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::{Bearing, Cell, CoordinateFrame, Obstacle, ObstacleId};
use crate::error::{MargaError, Result};

/// Fields per obstacle in a console message: id, x, y, direction.
const FIELDS_PER_OBSTACLE: usize = 4;

/// Obstacle as described by the operator (bottom-left frame).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    /// Obstacle id
    pub id: ObstacleId,
    /// Column
    pub x: i32,
    /// Row, counted from the bottom
    pub y: i32,
    /// Direction name or sentinel
    pub facing: String,
}

impl ObstacleRecord {
    /// Validate and convert into an internal-frame obstacle.
    pub fn try_into_obstacle(&self) -> Result<Obstacle> {
        let facing = parse_facing(&self.facing).ok_or_else(|| {
            MargaError::InvalidObstacle(format!(
                "obstacle {} has unknown direction {:?}",
                self.id, self.facing
            ))
        })?;

        let external = Cell::new(self.x, self.y);
        if !external.in_bounds() {
            return Err(MargaError::InvalidObstacle(format!(
                "obstacle {} at {} is outside the arena",
                self.id, external
            )));
        }

        let cell = CoordinateFrame::BottomLeft.convert(external);
        Ok(Obstacle {
            id: self.id,
            cell,
            facing,
        })
    }
}

/// Direction name ("North", "n") or wire sentinel ("10".."13").
fn parse_facing(text: &str) -> Option<Bearing> {
    Bearing::from_name(text).or_else(|| {
        text.trim()
            .parse::<u8>()
            .ok()
            .and_then(Bearing::from_sentinel)
    })
}

/// Convert a batch of records, failing on the first malformed one.
pub fn convert_records(records: &[ObstacleRecord]) -> Result<Vec<Obstacle>> {
    let obstacles = records
        .iter()
        .map(ObstacleRecord::try_into_obstacle)
        .collect::<Result<Vec<_>>>()?;
    check_unique_ids(&obstacles)?;
    Ok(obstacles)
}

/// Fails on the first repeated obstacle id.
fn check_unique_ids(obstacles: &[Obstacle]) -> Result<()> {
    let mut seen = HashSet::with_capacity(obstacles.len());
    for obstacle in obstacles {
        if !seen.insert(obstacle.id) {
            return Err(MargaError::InvalidObstacle(format!(
                "obstacle id {} is used more than once",
                obstacle.id
            )));
        }
    }
    Ok(())
}

/// Parse an operator console obstacle message.
///
/// Format: `HEADER,id,x,y,Dir,id,x,y,Dir,...`. The header is ignored.
/// Empty fields (trailing commas) are skipped.
pub fn parse_obstacle_message(message: &str) -> Result<Vec<Obstacle>> {
    let fields: Vec<&str> = message
        .trim()
        .split(',')
        .skip(1)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    if fields.len() % FIELDS_PER_OBSTACLE != 0 {
        return Err(MargaError::InvalidObstacle(format!(
            "expected groups of {} fields, got {}",
            FIELDS_PER_OBSTACLE,
            fields.len()
        )));
    }

    let obstacles = fields
        .chunks_exact(FIELDS_PER_OBSTACLE)
        .map(|group| {
            let record = ObstacleRecord {
                id: parse_number(group[0], "id")?,
                x: parse_number(group[1], "x")?,
                y: parse_number(group[2], "y")?,
                facing: group[3].to_string(),
            };
            record.try_into_obstacle()
        })
        .collect::<Result<Vec<_>>>()?;
    check_unique_ids(&obstacles)?;

    tracing::debug!("Parsed {} obstacles from console message", obstacles.len());
    Ok(obstacles)
}

fn parse_number<T: std::str::FromStr>(field: &str, name: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| MargaError::InvalidObstacle(format!("{} field {:?} is not a number", name, field)))
}
