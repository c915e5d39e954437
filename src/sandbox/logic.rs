use crate::sandbox::resources::SandboxSettings;
use hydrosim::config::HydroSimConfig;
use hydrosim::snapshot::WorldSnapshot;
use hydrosim::terrain::generate_world;
use hydrosim::world::WorldState;
use std::error::Error;

/// Fresh world for the current settings.
/// An explicit `terrain_seed` wins, then the seed pinned in settings, then a random draw.
pub fn generate_sandbox_world(settings: &SandboxSettings, terrain_seed: Option<u32>) -> WorldState {
    let seed = terrain_seed
        .or(settings.terrain_seed)
        .unwrap_or_else(hydrosim::tools::generate_seed8);
    generate_world(settings.world_size, seed, settings.vegetation_seed)
}

/// Seed for a user-requested regenerate. A seed pinned in config only applies
/// to the startup world, so a regenerate without a seed always rolls a new one.
pub fn regenerate_seed(requested: Option<u32>) -> u32 {
    requested.unwrap_or_else(hydrosim::tools::generate_seed8)
}

/// Re-reads the config file into the host settings, keeping nothing from the old ones
pub fn reload_settings(settings: &mut SandboxSettings) -> HydroSimConfig {
    hydrosim::reload_config();
    let config = hydrosim::get_config();
    *settings = SandboxSettings::from_config(&config);
    config
}

pub fn save_world(path: &str, world: &WorldState) -> Result<(), Box<dyn Error>> {
    let json = WorldSnapshot::from_state(world).to_json()?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_world(path: &str) -> Result<WorldState, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(WorldSnapshot::from_json(&json)?)
}
