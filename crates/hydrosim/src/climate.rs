// Day, weather and wind as a pure function of simulated time and seed

use crate::constants::{BASE_RAIN_RATE, DAY_LENGTH_SECONDS, MIN_DAYLIGHT, RAIN_THRESHOLD};
use crate::grid::{clamp, saturate, smoothstep};
use crate::world::WorldState;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Either follow the simulation or pin a channel to a manual value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClimateMode<T> {
    #[default]
    Simulated,
    Manual(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherOverride {
    pub cloudiness: f32,
    pub rain_intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindOverride {
    pub strength: f32,
    /// Radians
    pub direction: f32,
    pub gustiness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateSettings {
    /// Manual mode carries the hour of day in [0, 24)
    pub day: ClimateMode<f32>,
    pub weather: ClimateMode<WeatherOverride>,
    pub wind: ClimateMode<WindOverride>,
    /// Hour of day at simulated time zero
    pub start_hour: f32,
}

impl Default for ClimateSettings {
    fn default() -> Self {
        Self {
            day: ClimateMode::Simulated,
            weather: ClimateMode::Simulated,
            wind: ClimateMode::Simulated,
            start_hour: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateState {
    /// Fraction of the day in [0, 1), 0.5 is noon
    pub day_phase: f32,
    pub daylight: f32,
    pub cloudiness: f32,
    pub rain_intensity: f32,
    pub wind_strength: f32,
    /// Radians in [0, 2π)
    pub wind_direction: f32,
    pub wind_gustiness: f32,
}

impl ClimateState {
    /// Unit vector the wind blows towards, scaled by its strength
    pub fn wind_vector(&self) -> Vec2 {
        Vec2::from_angle(self.wind_direction) * self.wind_strength
    }
}

/// Day phase from simulated time, or straight from the manual hour
pub fn day_phase(time: f64, day: &ClimateMode<f32>, start_hour: f32) -> f32 {
    let phase = match day {
        ClimateMode::Simulated => time / DAY_LENGTH_SECONDS + start_hour as f64 / 24.0,
        ClimateMode::Manual(hour) => *hour as f64 / 24.0,
    };
    let wrapped = phase.rem_euclid(1.0) as f32;
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Seed-dependent phase so two worlds don't share weather
fn seed_phase(seed: u32) -> f32 {
    (seed % 10_007) as f32 * 0.013
}

/// Sum of sines evaluated in f64 so long runs don't lose precision
fn wave(time: f64, frequency: f64, phase: f32) -> f32 {
    (time * frequency + phase as f64).sin() as f32
}

pub fn create_climate_state(
    time: f64,
    seed: u32,
    day_phase: f32,
    weather: &ClimateMode<WeatherOverride>,
    wind: &ClimateMode<WindOverride>,
) -> ClimateState {
    let s = seed_phase(seed);

    let sun = ((day_phase - 0.25) * TAU).sin();
    let daylight = clamp(0.5 + 0.5 * sun, MIN_DAYLIGHT, 1.0);

    let (cloudiness, rain_intensity) = match weather {
        ClimateMode::Simulated => {
            let cloudiness = saturate(
                0.45 + 0.3 * wave(time, 0.0031, s)
                    + 0.18 * wave(time, 0.0087, s * 1.7)
                    + 0.1 * wave(time, 0.021, s * 2.3),
            );
            // rain needs heavy cloud cover
            let showers = saturate(0.65 + 0.35 * wave(time, 0.013, s * 0.7));
            (cloudiness, saturate(smoothstep(0.6, 0.92, cloudiness) * showers))
        }
        ClimateMode::Manual(o) => (saturate(o.cloudiness), saturate(o.rain_intensity)),
    };

    let (wind_strength, wind_direction, wind_gustiness) = match wind {
        ClimateMode::Simulated => {
            let strength = saturate(
                0.35 + 0.25 * wave(time, 0.0043, s * 1.3)
                    + 0.15 * wave(time, 0.017, s * 0.4)
                    + cloudiness * 0.2,
            );
            let direction = s * 2.0 + 0.9 * wave(time, 0.0011, s) + 0.4 * wave(time, 0.0037, s * 0.5);
            let gustiness = saturate(0.2 + 0.3 * wave(time, 0.031, s * 2.9).abs() + strength * 0.3);
            (strength, direction, gustiness)
        }
        ClimateMode::Manual(o) => (saturate(o.strength), o.direction, saturate(o.gustiness)),
    };

    ClimateState {
        day_phase,
        daylight,
        cloudiness,
        rain_intensity,
        wind_strength,
        wind_direction: wrap_angle(wind_direction),
        wind_gustiness,
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Climate for the world's current time under `settings`
pub fn climate_for(state: &WorldState, settings: &ClimateSettings) -> ClimateState {
    let phase = day_phase(state.time, &settings.day, settings.start_hour);
    create_climate_state(state.time, state.terrain_seed, phase, &settings.weather, &settings.wind)
}

/// Rain adds water everywhere, more on high ground.
///
/// Intensities below the rain threshold are ignored.
pub fn apply_rainfall(state: &mut WorldState, rain_intensity: f32, dt: f32) {
    if rain_intensity < RAIN_THRESHOLD {
        return;
    }
    state.assert_shape();
    let base = rain_intensity * dt * BASE_RAIN_RATE;
    for (water, &height) in state.water.iter_mut().zip(&state.terrain) {
        *water += base * orographic_bias(height);
    }
}

fn orographic_bias(height: f32) -> f32 {
    let altitude = clamp((height + 8.0) / 26.0, 0.0, 1.0);
    0.75 + altitude * 0.5
}

/// Climate boost to vegetation suitability
pub fn vitality(climate: &ClimateState) -> f32 {
    saturate(0.34 + climate.daylight * 0.46 + climate.rain_intensity * 0.2)
}
