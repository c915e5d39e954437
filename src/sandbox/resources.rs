use bevy::prelude::Resource;
use hydrosim::brush::BrushSettings;
use hydrosim::config::HydroSimConfig;
use hydrosim::simulation::Simulation;
use hydrosim::water::SimParams;

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SandboxSettings {
    pub world_size: usize,
    pub terrain_seed: Option<u32>,
    pub vegetation_seed: Option<u32>,
    pub fixed_hz: f64,
    pub params: SimParams,
    pub brush: BrushSettings,
    pub source_rate: f32,
    pub source_pick_radius: f32,
    pub save_path: String,
}

impl SandboxSettings {
    pub fn from_config(config: &HydroSimConfig) -> Self {
        Self {
            world_size: config.world.size.max(1),
            terrain_seed: config.world.terrain_seed,
            vegetation_seed: config.world.vegetation_seed,
            fixed_hz: config.simulation.fixed_hz.max(1.0),
            params: config.sim_params(),
            brush: config.brush_settings(),
            source_rate: config.brush.source_rate,
            source_pick_radius: config.brush.source_pick_radius,
            save_path: config.host.save_path.clone(),
        }
    }
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self::from_config(&hydrosim::get_config())
    }
}

/// The single simulation the host owns; only fixed-step and input systems write to it
#[derive(Resource)]
pub struct SandboxSimulation(pub Simulation);
