use crate::sandbox::resources::SandboxSimulation;
use crate::vegetation::VegetationLayer;
use bevy::log::debug;
use bevy::prelude::*;
use hydrosim::vegetation::{Species, scan_vegetation};

pub fn refresh_vegetation(time: Res<Time>, simulation: Res<SandboxSimulation>, mut layer: ResMut<VegetationLayer>) {
    let due = layer.refresh.tick(time.delta()).just_finished();
    if !due && !layer.dirty {
        return;
    }

    let stride = layer.stride;
    layer.placements = scan_vegetation(&simulation.0.vegetation_inputs(), stride);
    layer.dirty = false;

    let count = |species: Species| layer.placements.iter().filter(|p| p.species == species).count();
    debug!(
        "Vegetation refreshed: {} canopy, {} shrub, {} grass",
        count(Species::Canopy),
        count(Species::Shrub),
        count(Species::Grass)
    );
}
