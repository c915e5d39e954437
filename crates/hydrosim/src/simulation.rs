use crate::climate::{ClimateSettings, ClimateState, apply_rainfall, climate_for, vitality};
use crate::humidity::HumidityField;
use crate::vegetation::VegetationInputs;
use crate::water::{SimParams, WaterScratch, step_water};
use crate::world::WorldState;
use log::info;

/// One world together with the layers and scratch space the fixed step needs
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: WorldState,
    pub humidity: HumidityField,
    pub climate_settings: ClimateSettings,
    scratch: WaterScratch,
    climate: ClimateState,
}

impl Simulation {
    pub fn new(world: WorldState, climate_settings: ClimateSettings) -> Self {
        world.assert_shape();
        Self {
            humidity: HumidityField::seed_from_world(&world),
            scratch: WaterScratch::for_world(&world),
            climate: climate_for(&world, &climate_settings),
            climate_settings,
            world,
        }
    }

    /// Swaps in a generated or loaded world; humidity is reseeded from it
    pub fn replace_world(&mut self, world: WorldState) {
        world.assert_shape();
        info!("Replacing world ({}x{}, t = {:.1}s)", world.size, world.size, world.time);
        self.humidity = HumidityField::seed_from_world(&world);
        self.scratch = WaterScratch::for_world(&world);
        self.climate = climate_for(&world, &self.climate_settings);
        self.world = world;
    }

    /// One fixed step: climate, rain, water, humidity, then the clock
    pub fn tick(&mut self, params: &SimParams) -> ClimateState {
        let climate = climate_for(&self.world, &self.climate_settings);
        apply_rainfall(&mut self.world, climate.rain_intensity, params.dt);
        step_water(&mut self.world, params, &mut self.scratch);
        self.humidity.update(&self.world, params.dt, climate.rain_intensity);
        self.world.time += params.dt as f64;
        self.climate = climate;
        climate
    }

    /// Climate used by the most recent tick
    pub fn climate(&self) -> ClimateState {
        self.climate
    }

    pub fn vitality(&self) -> f32 {
        vitality(&self.climate)
    }

    /// Everything the vegetation sampler reads, borrowed from the current state
    pub fn vegetation_inputs(&self) -> VegetationInputs<'_> {
        VegetationInputs {
            size: self.world.size,
            terrain: &self.world.terrain,
            water: &self.world.water,
            humidity: self.humidity.values(),
            seed: self.world.vegetation_seed,
            vitality: self.vitality(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::{ClimateMode, WeatherOverride};
    use crate::terrain::generate_world;
    use crate::water::total_water;

    fn dry_weather() -> ClimateSettings {
        ClimateSettings {
            weather: ClimateMode::Manual(WeatherOverride {
                cloudiness: 0.1,
                rain_intensity: 0.0,
            }),
            ..ClimateSettings::default()
        }
    }

    #[test]
    fn test_tick_advances_time() {
        let mut sim = Simulation::new(generate_world(24, 5, None), dry_weather());
        let params = SimParams::default();
        for _ in 0..30 {
            sim.tick(&params);
        }
        assert!((sim.world.time - 30.0 * params.dt as f64).abs() < 1e-6);
    }

    #[test]
    fn test_rain_is_injected_before_flow() {
        let mut settings = dry_weather();
        settings.weather = ClimateMode::Manual(WeatherOverride {
            cloudiness: 1.0,
            rain_intensity: 1.0,
        });
        let mut world = WorldState::flat(6, 0.0);
        world.terrain_seed = 1;
        let mut sim = Simulation::new(world, settings);
        let params = SimParams {
            dt: 1.0,
            flow_rate: 1.0,
            damping: 0.0,
            evaporation: 0.0,
            seepage: 0.0,
            edge_drain: 0.0,
        };
        let climate = sim.tick(&params);
        assert_eq!(climate.rain_intensity, 1.0);
        assert!(total_water(&sim.world) > 0.0);
        assert_eq!(sim.climate(), climate);
    }

    #[test]
    fn test_replace_world_reseeds_layers() {
        let mut sim = Simulation::new(generate_world(16, 1, None), dry_weather());
        sim.tick(&SimParams::default());
        sim.replace_world(generate_world(20, 2, None));
        assert_eq!(sim.humidity.size(), 20);
        assert_eq!(sim.vegetation_inputs().humidity.len(), 400);
        sim.tick(&SimParams::default());
    }

    #[test]
    fn test_runs_are_reproducible() {
        let run = || {
            let mut sim = Simulation::new(generate_world(24, 31, None), ClimateSettings::default());
            for _ in 0..60 {
                sim.tick(&SimParams::default());
            }
            (sim.world.water.clone(), sim.humidity.values().to_vec())
        };
        assert_eq!(run(), run());
    }
}
