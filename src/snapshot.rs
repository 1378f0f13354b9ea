//! Periodic JSON checkpoints of city state

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::grid::GridLocation;

#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub id: u64,
    pub center: GridLocation,
    pub population: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CitySnapshot {
    pub scenario: String,
    pub steps: u64,
    pub period: u64,
    pub population: u64,
    pub width: u32,
    pub height: u32,
    pub zones: Vec<ZoneSnapshot>,
}

impl CitySnapshot {
    pub fn capture(city: &City, scenario: &str) -> Self {
        let zones = city
            .zones()
            .iter()
            .map(|(id, zone)| ZoneSnapshot {
                id: id.raw(),
                center: zone.center(),
                population: zone.population(),
            })
            .collect();
        Self {
            scenario: scenario.to_string(),
            steps: city.time().steps(),
            period: city.time().period(),
            population: city.population(),
            width: city.grid().width(),
            height: city.grid().height(),
            zones,
        }
    }
}

/// Writes a `CitySnapshot` every `interval_steps` steps. An interval of
/// zero disables writing entirely.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_steps: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, interval_steps: u64) -> Self {
        Self {
            dir: dir.into(),
            interval_steps,
        }
    }

    pub fn maybe_write(&self, city: &City, scenario: &str) -> Result<Option<PathBuf>> {
        let steps = city.time().steps();
        if self.interval_steps == 0 || steps == 0 || steps % self.interval_steps != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("step_{steps:06}.json"));
        let snapshot = CitySnapshot::capture(city, scenario);
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_on_interval_boundaries_only() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 4);
        let mut city = City::new(6, 6, 1);

        assert!(writer.maybe_write(&city, "t").unwrap().is_none());
        for _ in 0..3 {
            city.step().unwrap();
            assert!(writer.maybe_write(&city, "t").unwrap().is_none());
        }
        city.step().unwrap();
        let path = writer.maybe_write(&city, "t").unwrap().expect("interval hit");
        assert!(path.ends_with("t/step_000004.json"));

        let data = fs::read_to_string(path).unwrap();
        let parsed: CitySnapshot = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed.steps, 4);
        assert_eq!(parsed.scenario, "t");
    }

    #[test]
    fn interval_zero_disables_writing() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 0);
        let mut city = City::new(6, 6, 1);
        for _ in 0..8 {
            city.step().unwrap();
            assert!(writer.maybe_write(&city, "t").unwrap().is_none());
        }
    }
}
