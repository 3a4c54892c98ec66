//! Configuration loading for Marga

use crate::core::Obstacle;
use crate::error::{MargaError, Result};
use crate::ingest::{ObstacleRecord, convert_records};
use crate::mission::{MissionConfig, MotionPlanner};
use crate::planning::{SearchConfig, TourConfig};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
///
/// ```toml
/// [mission]
/// start = { x = 1, y = 1 }
/// start_bearing = "North"
/// on_leg_failure = "skip"
///
/// [search]
/// node_key = "position"
///
/// [tour]
/// strategy = "exact"
///
/// [[obstacles]]
/// id = 0
/// x = 7
/// y = 18
/// facing = "West"
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub tour: TourConfig,
    /// Obstacles in the arena (bottom-left) frame
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MargaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.mission.start_state()?;
        if self.mission.standoff < 1 {
            return Err(MargaError::Config(format!(
                "standoff must be at least 1 cell, got {}",
                self.mission.standoff
            )));
        }
        if self.search.move_cost == 0 {
            return Err(MargaError::Config("move_cost must be positive".to_string()));
        }
        if self.search.min_separation < 0 {
            return Err(MargaError::Config(format!(
                "min_separation must not be negative, got {}",
                self.search.min_separation
            )));
        }
        Ok(())
    }

    /// Configured obstacles converted to the internal frame
    pub fn obstacles(&self) -> Result<Vec<Obstacle>> {
        convert_records(&self.obstacles)
    }

    /// Planner built from the mission, search and tour sections
    pub fn planner(&self) -> MotionPlanner {
        MotionPlanner::new(self.mission.clone(), self.search.clone(), self.tour.clone())
    }
}
