// Persistence record for a world
//
// Storage itself belongs to the host; this module only defines the record,
// its JSON form, and the checks a payload must pass before the simulation
// accepts it.

use crate::world::{WaterSource, WorldState};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    #[error("dimension mismatch: {field} has {actual} cells, expected {expected}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid source #{index}: {reason}")]
    InvalidSource { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub rate: f32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub version: u32,
    pub size: usize,
    pub terrain_seed: u32,
    pub terrain: Vec<f32>,
    pub water: Vec<f32>,
    pub sources: Vec<SourceRecord>,
    pub vegetation_seed: u32,
    pub time: f64,
}

impl WorldSnapshot {
    pub fn from_state(state: &WorldState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            size: state.size,
            terrain_seed: state.terrain_seed,
            terrain: state.terrain.clone(),
            water: state.water.clone(),
            sources: state
                .sources
                .iter()
                .map(|s| SourceRecord {
                    id: s.id.clone(),
                    x: s.x,
                    y: s.y,
                    rate: s.rate,
                    active: s.active,
                })
                .collect(),
            vegetation_seed: state.vegetation_seed,
            time: state.time,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    /// Parses and validates a stored world in one go
    pub fn from_json(json: &str) -> Result<WorldState, SnapshotError> {
        let snapshot: WorldSnapshot =
            serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        snapshot.into_state()
    }

    /// Checks every invariant the simulation relies on and builds the world
    pub fn into_state(self) -> Result<WorldState, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Malformed(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if self.size == 0 {
            return Err(SnapshotError::Malformed("size must be positive".into()));
        }
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(SnapshotError::Malformed(format!("invalid time {}", self.time)));
        }

        let cells = self
            .size
            .checked_mul(self.size)
            .ok_or_else(|| SnapshotError::Malformed(format!("size {} is too large", self.size)))?;
        for (field, values) in [("terrain", &self.terrain), ("water", &self.water)] {
            if values.len() != cells {
                return Err(SnapshotError::DimensionMismatch {
                    field,
                    expected: cells,
                    actual: values.len(),
                });
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(SnapshotError::Malformed(format!("{field}[{i}] is not finite")));
            }
        }
        if let Some(i) = self.water.iter().position(|&w| w < 0.0) {
            return Err(SnapshotError::Malformed(format!("water[{i}] is negative")));
        }

        let mut sources: Vec<WaterSource> = Vec::with_capacity(self.sources.len());
        for (index, record) in self.sources.into_iter().enumerate() {
            let invalid = |reason: String| SnapshotError::InvalidSource { index, reason };
            if record.id.is_empty() {
                return Err(invalid("empty id".into()));
            }
            if sources.iter().any(|s| s.id == record.id) {
                return Err(invalid(format!("duplicate id {}", record.id)));
            }
            if record.x < 0 || record.y < 0 || record.x as usize >= self.size || record.y as usize >= self.size {
                return Err(invalid(format!("position ({}, {}) outside the grid", record.x, record.y)));
            }
            if !record.rate.is_finite() || record.rate < 0.0 {
                return Err(invalid(format!("rate {} is not a non-negative number", record.rate)));
            }
            sources.push(WaterSource {
                id: record.id,
                x: record.x,
                y: record.y,
                rate: record.rate,
                active: record.active,
            });
        }

        debug!("Snapshot accepted: {}x{} with {} sources", self.size, self.size, sources.len());
        Ok(WorldState {
            size: self.size,
            terrain_seed: self.terrain_seed,
            terrain: self.terrain,
            water: self.water,
            sources,
            vegetation_seed: self.vegetation_seed,
            time: self.time,
        })
    }
}
