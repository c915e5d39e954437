pub mod systems;

use crate::diagnostics::systems::*;
use bevy::prelude::*;
use hydrosim::vegetation::VegetationSample;
use hydrosim::water::WaterDiagnostics;

/// Hover-style probe of a single cell
#[derive(Message, Debug, Clone, Copy)]
pub struct InspectCellEvent {
    pub x: i32,
    pub y: i32,
}

/// Result of the latest [`InspectCellEvent`]; both fields are `None` off the grid
#[derive(Resource, Default, Debug)]
pub struct CellInspection {
    pub water: Option<WaterDiagnostics>,
    pub vegetation: Option<VegetationSample>,
}

#[derive(Resource)]
pub struct StatsTimer(pub Timer);

/// Exits the app once it runs out; `None` runs forever
#[derive(Resource)]
pub struct RunTimer(pub Option<Timer>);

pub struct DiagnosticsPlugin;

impl Plugin for DiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        let host = hydrosim::get_config().host;
        let run_timer = (host.run_seconds > 0.0).then(|| Timer::from_seconds(host.run_seconds, TimerMode::Once));

        app.add_message::<InspectCellEvent>()
            .init_resource::<CellInspection>()
            .insert_resource(StatsTimer(Timer::from_seconds(
                host.stats_interval_secs.max(0.1),
                TimerMode::Repeating,
            )))
            .insert_resource(RunTimer(run_timer))
            .add_systems(Update, (inspect_cells, log_stats, exit_after_run_duration));
    }
}
