use crate::brush::BrushSettings;
use crate::climate::{ClimateMode, ClimateSettings};
use crate::water::SimParams;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, OnceLock};

pub const CONFIG_FILE: &str = "hydrosim_config.toml";

static CONFIG: OnceLock<Mutex<HydroSimConfig>> = OnceLock::new();

/// Get a copy of the current configuration, loading from file if not already loaded.
///
/// A missing or broken file falls back to [`HydroSimConfig::default`].
pub fn get_config() -> HydroSimConfig {
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(load_or_default(CONFIG_FILE)));
    config_mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

pub fn reload_config() {
    let new_config = load_or_default(CONFIG_FILE);
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(new_config.clone()));
    *config_mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_config;
}

fn load_or_default(path: &str) -> HydroSimConfig {
    HydroSimConfig::load_from_file(path).unwrap_or_else(|e| {
        warn!("Could not load {path} ({e}), using built-in defaults");
        HydroSimConfig::default()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroSimConfig {
    pub world: WorldConfig,
    pub simulation: SimulationConfig,
    pub brush: BrushConfig,
    pub climate: ClimateConfig,
    pub vegetation: VegetationConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub size: usize,
    /// Random when absent
    #[serde(default)]
    pub terrain_seed: Option<u32>,
    /// Derived from the terrain seed when absent
    #[serde(default)]
    pub vegetation_seed: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub fixed_hz: f64,
    pub flow_rate: f32,
    pub damping: f32,
    pub evaporation: f32,
    pub seepage: f32,
    pub edge_drain: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushConfig {
    pub radius: f32,
    pub strength: f32,
    pub flatten_height: f32,
    pub source_rate: f32,
    pub source_pick_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateConfig {
    pub start_hour: f32,
    /// Pins the time of day when set
    #[serde(default)]
    pub manual_hour: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationConfig {
    pub refresh_interval_secs: f32,
    pub stride: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Wall-clock seconds before the headless host exits, 0 runs forever
    pub run_seconds: f32,
    pub stats_interval_secs: f32,
    pub save_path: String,
}

impl Default for HydroSimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                size: 128,
                terrain_seed: None,
                vegetation_seed: None,
            },
            simulation: SimulationConfig {
                fixed_hz: 30.0,
                flow_rate: 4.0,
                damping: 0.02,
                evaporation: 0.0008,
                seepage: 0.004,
                edge_drain: 0.05,
            },
            brush: BrushConfig {
                radius: 6.0,
                strength: 0.35,
                flatten_height: 0.0,
                source_rate: 1.2,
                source_pick_radius: 2.5,
            },
            climate: ClimateConfig {
                start_hour: 8.0,
                manual_hour: None,
            },
            vegetation: VegetationConfig {
                refresh_interval_secs: 0.5,
                stride: 1,
            },
            host: HostConfig {
                run_seconds: 0.0,
                stats_interval_secs: 5.0,
                save_path: "hydrosandbox_world.json".to_string(),
            },
        }
    }
}

impl HydroSimConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: HydroSimConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn sim_params(&self) -> SimParams {
        let sim = &self.simulation;
        SimParams {
            dt: (1.0 / sim.fixed_hz.max(1.0)) as f32,
            flow_rate: sim.flow_rate.max(0.0),
            damping: sim.damping.max(0.0),
            evaporation: sim.evaporation.max(0.0),
            seepage: sim.seepage.max(0.0),
            edge_drain: sim.edge_drain.max(0.0),
        }
    }

    pub fn brush_settings(&self) -> BrushSettings {
        BrushSettings {
            radius: self.brush.radius.max(1.0),
            strength: self.brush.strength,
            flatten_height: self.brush.flatten_height,
        }
    }

    pub fn climate_settings(&self) -> ClimateSettings {
        ClimateSettings {
            day: match self.climate.manual_hour {
                Some(hour) => ClimateMode::Manual(hour),
                None => ClimateMode::Simulated,
            },
            start_hour: self.climate.start_hour,
            ..ClimateSettings::default()
        }
    }
}
