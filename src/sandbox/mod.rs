pub mod events;
pub mod logic;
pub mod resources;
pub mod systems;

use crate::sandbox::events::*;
use crate::sandbox::resources::*;
use crate::sandbox::systems::*;
use crate::vegetation::VegetationLayer;
use bevy::prelude::*;
use hydrosim::simulation::Simulation;

/// Owns the simulated world and routes user input into it.
/// Settings inserted before the plugin is added take precedence over the config file.
pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SandboxSettings>() {
            app.insert_resource(SandboxSettings::default());
        }
        let settings = app.world().resource::<SandboxSettings>().clone();
        let world = logic::generate_sandbox_world(&settings, None);
        let simulation = Simulation::new(world, hydrosim::get_config().climate_settings());

        app.add_message::<BrushStrokeEvent>()
            .add_message::<RegenerateWorldEvent>()
            .add_message::<SetClimateModesEvent>()
            .add_message::<SaveWorldEvent>()
            .add_message::<LoadWorldEvent>()
            .insert_resource(SandboxSimulation(simulation))
            .insert_resource(Time::<Fixed>::from_hz(settings.fixed_hz))
            .init_resource::<VegetationLayer>()
            .add_systems(FixedUpdate, advance_simulation)
            .add_systems(
                Update,
                (
                    handle_regenerate_world,
                    handle_load_world,
                    handle_climate_modes,
                    handle_brush_strokes,
                    handle_save_world,
                )
                    .chain(),
            );
    }
}
