use crate::diagnostics::*;
use crate::sandbox::resources::{SandboxSettings, SandboxSimulation};
use bevy::log::info;
use bevy::prelude::*;
use hydrosim::vegetation::sample_vegetation;
use hydrosim::water::{sample_cell_water_diagnostics, water_stats};

pub fn inspect_cells(
    mut events: MessageReader<InspectCellEvent>,
    mut inspection: ResMut<CellInspection>,
    simulation: Res<SandboxSimulation>,
    settings: Res<SandboxSettings>,
) {
    for event in events.read() {
        let simulation = &simulation.0;
        let mut params = settings.params;
        params.dt = (1.0 / settings.fixed_hz) as f32;

        let water = sample_cell_water_diagnostics(&simulation.world, &params, event.x, event.y);
        let vegetation = water
            .as_ref()
            .map(|cell| sample_vegetation(&simulation.vegetation_inputs(), cell.x, cell.y));

        if let Some(cell) = &water {
            info!(
                "Cell ({}, {}): terrain {:.2}, water {:.3}, outflow potential {:.4}, border {}",
                cell.x, cell.y, cell.terrain_height, cell.water_height, cell.potential_sum, cell.is_border
            );
        }
        inspection.water = water;
        inspection.vegetation = vegetation;
    }
}

pub fn log_stats(time: Res<Time>, mut timer: ResMut<StatsTimer>, simulation: Res<SandboxSimulation>) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let simulation = &simulation.0;
    let stats = water_stats(&simulation.world);
    let climate = simulation.climate();
    info!(
        "t = {:.1}s | water {:.2} over {} wet cells (max depth {:.2}) | mean humidity {:.2} | rain {:.2} | daylight {:.2}",
        simulation.world.time,
        stats.total,
        stats.wet_cells,
        stats.max_depth,
        simulation.humidity.mean(),
        climate.rain_intensity,
        climate.daylight
    );
}

pub fn exit_after_run_duration(time: Res<Time>, mut run_timer: ResMut<RunTimer>, mut exit: MessageWriter<AppExit>) {
    let Some(timer) = run_timer.0.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).just_finished() {
        info!("Run duration reached, exiting");
        exit.write(AppExit::Success);
    }
}
