pub mod systems;

use crate::vegetation::systems::refresh_vegetation;
use bevy::prelude::*;
use hydrosim::vegetation::VegetationPlacement;

/// Last scanned vegetation and the throttle that decides when to rescan
#[derive(Resource)]
pub struct VegetationLayer {
    pub placements: Vec<VegetationPlacement>,
    pub stride: usize,
    pub refresh: Timer,
    dirty: bool,
}

impl VegetationLayer {
    pub fn new(refresh_interval_secs: f32, stride: usize) -> Self {
        Self {
            placements: Vec::new(),
            stride: stride.max(1),
            refresh: Timer::from_seconds(refresh_interval_secs.max(0.0), TimerMode::Repeating),
            dirty: true,
        }
    }

    /// Forces a rescan on the next frame regardless of the timer
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Default for VegetationLayer {
    fn default() -> Self {
        let config = hydrosim::get_config();
        Self::new(config.vegetation.refresh_interval_secs, config.vegetation.stride)
    }
}

pub struct VegetationPlugin;

impl Plugin for VegetationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VegetationLayer>()
            .add_systems(PostUpdate, refresh_vegetation);
    }
}
