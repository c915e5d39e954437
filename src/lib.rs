pub mod diagnostics;
pub mod sandbox;
pub mod vegetation;

use crate::diagnostics::DiagnosticsPlugin;
use crate::sandbox::SandboxPlugin;
use crate::vegetation::VegetationPlugin;
use bevy::app::App;
use bevy::prelude::*;

pub struct HydroSandboxPlugin;

impl Plugin for HydroSandboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SandboxPlugin, VegetationPlugin, DiagnosticsPlugin));
    }
}
