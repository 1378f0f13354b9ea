//! Scenario files: the starting map and run parameters, loaded from YAML

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cell::Cell;
use crate::city::City;
use crate::clock::STEPS_PER_PERIOD;
use crate::grid::{GridLocation, GridRect};

fn default_snapshot_interval_steps() -> u64 {
    STEPS_PER_PERIOD
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    pub grid: GridConfig,
    #[serde(default)]
    pub steps: Option<u64>,
    #[serde(default = "default_snapshot_interval_steps")]
    pub snapshot_interval_steps: u64,
    /// Water rectangles painted before any zone is placed.
    #[serde(default)]
    pub water: Vec<RectConfig>,
    /// Woods rectangles painted before any zone is placed.
    #[serde(default)]
    pub woods: Vec<RectConfig>,
    /// Residential zone centers, built in order.
    #[serde(default)]
    pub zones: Vec<LocationConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RectConfig {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationConfig {
    pub x: i32,
    pub y: i32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Build the starting city: all dirt, then water and woods painted,
    /// then the listed residential zones placed.
    pub fn build_city(&self) -> Result<City> {
        let mut city = City::new(self.grid.width, self.grid.height, self.seed);
        for (kind, rects) in [(Cell::Water, &self.water), (Cell::Woods, &self.woods)] {
            for rect in rects {
                let rect = GridRect::new(rect.x, rect.y, rect.w, rect.h);
                for (col, row) in rect.cells() {
                    city.grid_mut()
                        .set_cell_at(col, row, kind)
                        .with_context(|| format!("Terrain rect {rect} leaves the grid"))?;
                }
            }
        }
        for loc in &self.zones {
            let center = GridLocation::new(loc.x, loc.y);
            city.build_residential(center)
                .with_context(|| format!("Cannot place starting zone at {center}"))?;
        }
        Ok(city)
    }

    pub fn steps(&self, override_steps: Option<u64>) -> u64 {
        override_steps.or(self.steps).unwrap_or(4 * STEPS_PER_PERIOD)
    }
}
