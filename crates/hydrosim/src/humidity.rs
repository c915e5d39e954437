// Air humidity layer
//
// Humidity chases a target set by standing water and rain, rising faster than
// it falls, decays slowly (faster on high ground), and is diffused every few
// ticks. It lives outside `WorldState` and is reseeded whenever a world loads.

use crate::constants::{HUMIDITY_DIFFUSION_RATE, HUMIDITY_DIFFUSION_STEPS, HUMIDITY_WETNESS_DEPTH};
use crate::grid::{clamp, saturate, to_index};
use crate::world::WorldState;

/// Per-second approach rate towards the target while humidity is rising
const RISE_RATE: f32 = 0.9;
/// Per-second approach rate while humidity is falling
const FALL_RATE: f32 = 0.3;
const BASE_DECAY: f32 = 0.015;
const ALTITUDE_DECAY: f32 = 0.02;

/// Double-buffered humidity values in [0, 1]
#[derive(Debug, Clone)]
pub struct HumidityField {
    size: usize,
    current: Vec<f32>,
    scratch: Vec<f32>,
    ticks_since_diffusion: u32,
}

impl HumidityField {
    /// Initial humidity for a freshly generated or loaded world
    pub fn seed_from_world(state: &WorldState) -> Self {
        state.assert_shape();
        let current = state
            .water
            .iter()
            .zip(&state.terrain)
            .map(|(&water, &height)| {
                let wetness = saturate(water / HUMIDITY_WETNESS_DEPTH);
                saturate(wetness * 0.85).max(retention_floor(height))
            })
            .collect::<Vec<_>>();
        Self {
            size: state.size,
            scratch: vec![0.0; current.len()],
            current,
            ticks_since_diffusion: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn values(&self) -> &[f32] {
        &self.current
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.current[to_index(self.size, x, y)]
    }

    pub fn mean(&self) -> f32 {
        if self.current.is_empty() {
            return 0.0;
        }
        self.current.iter().sum::<f32>() / self.current.len() as f32
    }

    /// One tick of gain/decay, plus a diffusion pass every
    /// `HUMIDITY_DIFFUSION_STEPS` ticks
    pub fn update(&mut self, state: &WorldState, dt: f32, rain_intensity: f32) {
        state.assert_shape();
        assert_eq!(
            self.current.len(),
            state.cell_count(),
            "humidity field does not match world size"
        );
        let rain = saturate(rain_intensity);

        for ((value, &water), &height) in self.current.iter_mut().zip(&state.water).zip(&state.terrain) {
            let wetness = saturate(water / HUMIDITY_WETNESS_DEPTH);
            let altitude = humidity_altitude(height);
            let target = saturate(wetness * 0.85 + rain * 0.55).max(retention_floor(height));

            let rate = if *value < target { RISE_RATE } else { FALL_RATE };
            let mut next = *value + (target - *value) * (rate * dt).min(1.0);

            let moderation = 1.0 - 0.7 * wetness.max(rain);
            next -= (BASE_DECAY + altitude * ALTITUDE_DECAY) * moderation * dt;
            *value = saturate(next);
        }

        self.ticks_since_diffusion += 1;
        if self.ticks_since_diffusion >= HUMIDITY_DIFFUSION_STEPS {
            self.ticks_since_diffusion = 0;
            self.diffuse();
        }
    }

    /// Blends every cell towards the mean of its in-grid 4-neighbours,
    /// reading `current` and writing `scratch` before swapping them
    fn diffuse(&mut self) {
        let size = self.size;
        for y in 0..size {
            for x in 0..size {
                let mut sum = 0.0;
                let mut count = 0.0;
                if x > 0 {
                    sum += self.current[to_index(size, x - 1, y)];
                    count += 1.0;
                }
                if x + 1 < size {
                    sum += self.current[to_index(size, x + 1, y)];
                    count += 1.0;
                }
                if y > 0 {
                    sum += self.current[to_index(size, x, y - 1)];
                    count += 1.0;
                }
                if y + 1 < size {
                    sum += self.current[to_index(size, x, y + 1)];
                    count += 1.0;
                }
                let i = to_index(size, x, y);
                let own = self.current[i];
                self.scratch[i] = if count > 0.0 {
                    saturate(own + (sum / count - own) * HUMIDITY_DIFFUSION_RATE)
                } else {
                    own
                };
            }
        }
        std::mem::swap(&mut self.current, &mut self.scratch);
    }
}

fn humidity_altitude(height: f32) -> f32 {
    clamp((height + 8.0) / 23.0, 0.0, 1.0)
}

/// Lowland air keeps some moisture even when dry
fn retention_floor(height: f32) -> f32 {
    0.12 + (1.0 - humidity_altitude(height)) * 0.16
}

/// Free-function form of [`HumidityField::update`]
pub fn update_humidity(field: &mut HumidityField, state: &WorldState, dt: f32, rain_intensity: f32) {
    field.update(state, dt, rain_intensity);
}
