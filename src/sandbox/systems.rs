use crate::sandbox::events::*;
use crate::sandbox::logic::{generate_sandbox_world, load_world, regenerate_seed, reload_settings, save_world};
use crate::sandbox::resources::*;
use crate::vegetation::VegetationLayer;
use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use hydrosim::brush::{BrushTool, apply_brush};
use hydrosim::sources::{SourceToggle, toggle_source_at};

pub fn advance_simulation(
    mut simulation: ResMut<SandboxSimulation>,
    settings: Res<SandboxSettings>,
    time: Res<Time<Fixed>>,
) {
    let mut params = settings.params;
    params.dt = time.timestep().as_secs_f32();
    simulation.0.tick(&params);
}

pub fn handle_brush_strokes(
    mut events: MessageReader<BrushStrokeEvent>,
    mut simulation: ResMut<SandboxSimulation>,
    mut vegetation: ResMut<VegetationLayer>,
    settings: Res<SandboxSettings>,
) {
    for stroke in events.read() {
        let world = &mut simulation.0.world;
        match stroke.tool {
            BrushTool::WaterSource => {
                match toggle_source_at(world, stroke.x, stroke.y, settings.source_rate, settings.source_pick_radius) {
                    SourceToggle::Added(id) => info!("Added water source {id}"),
                    SourceToggle::Removed(id) => info!("Removed water source {id}"),
                    SourceToggle::Ignored => debug!("Source toggle outside the grid at ({}, {})", stroke.x, stroke.y),
                }
            }
            tool => apply_brush(world, stroke.x, stroke.y, tool, &settings.brush),
        }
        vegetation.mark_dirty();
    }
}

pub fn handle_regenerate_world(
    mut events: MessageReader<RegenerateWorldEvent>,
    mut simulation: ResMut<SandboxSimulation>,
    mut vegetation: ResMut<VegetationLayer>,
    mut settings: ResMut<SandboxSettings>,
    mut fixed_time: ResMut<Time<Fixed>>,
) {
    // Only the latest request matters when several arrive in one frame
    let Some(event) = events.read().last() else {
        return;
    };
    let config = reload_settings(&mut settings);
    fixed_time.set_timestep_hz(settings.fixed_hz);
    simulation.0.climate_settings.start_hour = config.climate.start_hour;
    vegetation.stride = config.vegetation.stride.max(1);

    let world = generate_sandbox_world(&settings, Some(regenerate_seed(event.terrain_seed)));
    info!("Regenerated world with terrain seed {}", world.terrain_seed);
    simulation.0.replace_world(world);
    vegetation.mark_dirty();
}

pub fn handle_climate_modes(mut events: MessageReader<SetClimateModesEvent>, mut simulation: ResMut<SandboxSimulation>) {
    for event in events.read() {
        let climate = &mut simulation.0.climate_settings;
        climate.day = event.day;
        climate.weather = event.weather;
        climate.wind = event.wind;
        debug!("Climate modes set to {:?}", climate);
    }
}

pub fn handle_save_world(
    mut events: MessageReader<SaveWorldEvent>,
    simulation: Res<SandboxSimulation>,
    settings: Res<SandboxSettings>,
) {
    if events.read().count() == 0 {
        return;
    }
    match save_world(&settings.save_path, &simulation.0.world) {
        Ok(()) => info!("Saved world to {}", settings.save_path),
        Err(err) => warn!("Failed to save world to {}: {err}", settings.save_path),
    }
}

pub fn handle_load_world(
    mut events: MessageReader<LoadWorldEvent>,
    mut simulation: ResMut<SandboxSimulation>,
    mut vegetation: ResMut<VegetationLayer>,
    settings: Res<SandboxSettings>,
) {
    if events.read().count() == 0 {
        return;
    }
    match load_world(&settings.save_path) {
        Ok(world) => {
            info!("Loaded world from {}", settings.save_path);
            simulation.0.replace_world(world);
            vegetation.mark_dirty();
        }
        // The running world stays untouched
        Err(err) => warn!("Failed to load world from {}: {err}", settings.save_path),
    }
}
