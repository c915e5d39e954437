use crate::grid::{in_bounds, to_index};
use serde::{Deserialize, Serialize};

/// A point that injects water into the grid every tick while active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterSource {
    /// Unique within a world; uniqueness is maintained by [`crate::sources`]
    pub id: String,
    pub x: i32,
    pub y: i32,
    /// Volume per second, negative rates inject nothing
    pub rate: f32,
    pub active: bool,
}

impl WaterSource {
    pub fn new(x: i32, y: i32, rate: f32) -> Self {
        Self {
            id: source_id(x, y),
            x,
            y,
            rate,
            active: true,
        }
    }

    /// Grid index of the source, or `None` when it sits outside the grid
    pub fn cell_index(&self, size: usize) -> Option<usize> {
        in_bounds(size, self.x, self.y).then(|| to_index(size, self.x as usize, self.y as usize))
    }
}

pub fn source_id(x: i32, y: i32) -> String {
    format!("source-{x}-{y}")
}

/// The whole mutable simulation state of one world
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub size: usize,
    pub terrain_seed: u32,
    /// `size * size` heights, row-major
    pub terrain: Vec<f32>,
    /// `size * size` water column heights, never negative
    pub water: Vec<f32>,
    pub sources: Vec<WaterSource>,
    pub vegetation_seed: u32,
    /// Seconds of simulated time, advanced only by fixed steps
    pub time: f64,
}

impl WorldState {
    /// A dry, flat world; mostly useful as a blank canvas and in tests
    pub fn flat(size: usize, height: f32) -> Self {
        Self {
            size,
            terrain_seed: 0,
            terrain: vec![height; size * size],
            water: vec![0.0; size * size],
            sources: Vec::new(),
            vegetation_seed: 0,
            time: 0.0,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        to_index(self.size, x, y)
    }

    pub fn has_valid_shape(&self) -> bool {
        self.size > 0
            && self.terrain.len() == self.cell_count()
            && self.water.len() == self.cell_count()
    }

    /// Array lengths must match `size * size`; a mismatch is a caller bug
    #[track_caller]
    pub fn assert_shape(&self) {
        assert!(
            self.has_valid_shape(),
            "malformed world: size {} but terrain has {} cells and water has {}",
            self.size,
            self.terrain.len(),
            self.water.len()
        );
    }

    pub fn find_source(&self, id: &str) -> Option<&WaterSource> {
        self.sources.iter().find(|s| s.id == id)
    }
}
