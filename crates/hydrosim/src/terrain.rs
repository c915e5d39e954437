// Procedural heightfield generation
//
// Four uncorrelated fractal channels (macro, detail, ridge, warp) are combined
// into continental relief, folded mountains, a warped river valley and a
// coastal drop-off, then lightly blurred.

use crate::constants::{MAX_TERRAIN_HEIGHT, MIN_TERRAIN_HEIGHT};
use crate::grid::{clamp, to_index};
use crate::tools::derive_vegetation_seed;
use crate::value_noise::Fractal;
use crate::world::{WaterSource, WorldState};
use log::{debug, info};
use noise::NoiseFn;
use std::f64::consts::PI;

/// Per-purpose seed offsets so the channels never alias each other
const MACRO_SEED_OFFSET: u32 = 11;
const DETAIL_SEED_OFFSET: u32 = 1013;
const RIDGE_SEED_OFFSET: u32 = 2029;
const WARP_SEED_OFFSET: u32 = 3037;

/// Blend weights of the two smoothing passes
const SMOOTHING_BLENDS: [f32; 2] = [0.16, 0.08];

/// Shaping weights, in world height units
const CONTINENTAL_RELIEF: f64 = 14.0;
const MOUNTAIN_BASE: f64 = 4.0;
const MOUNTAIN_MACRO_BOOST: f64 = 6.0;
const MOUNTAIN_EXPONENT: f64 = 1.35;
const BASELINE_OFFSET: f64 = -4.5;
const FOLD_AMPLITUDE: f64 = 1.6;
const VALLEY_DEPTH: f64 = 6.5;
const VALLEY_WIDTH: f64 = 0.09;
const COAST_RADIUS: f64 = 0.92;
const COAST_FALLOFF: f64 = 0.5;
const COAST_DEPTH: f64 = 7.0;
const MICRO_DETAIL: f64 = 2.4;

struct TerrainChannels {
    macro_shape: Fractal,
    detail: Fractal,
    ridge: Fractal,
    warp: Fractal,
    phase: f64,
}

impl TerrainChannels {
    fn new(seed: u32) -> Self {
        Self {
            macro_shape: Fractal::new(seed.wrapping_add(MACRO_SEED_OFFSET), 4, 2.2, 2.0, 0.5),
            detail: Fractal::new(seed.wrapping_add(DETAIL_SEED_OFFSET), 4, 9.0, 2.2, 0.46),
            ridge: Fractal::new(seed.wrapping_add(RIDGE_SEED_OFFSET), 5, 4.2, 2.05, 0.52),
            warp: Fractal::new(seed.wrapping_add(WARP_SEED_OFFSET), 3, 1.6, 2.0, 0.5),
            phase: (seed % 360) as f64 * PI / 180.0,
        }
    }

    /// Raw (unclamped, unsmoothed) height at normalized coordinates `nx, ny` in [0, 1]
    fn height_at(&self, nx: f64, ny: f64) -> f64 {
        let cx = nx * 2.0 - 1.0;
        let cy = ny * 2.0 - 1.0;
        let p = [nx, ny];

        let macro_shape = self.macro_shape.get(p);
        let detail = self.detail.get(p);
        let ridges = 1.0 - (2.0 * self.ridge.get(p) - 1.0).abs();
        let warp = self.warp.get(p);

        let continental = (macro_shape - 0.5) * CONTINENTAL_RELIEF;
        let mountains = ridges.powf(MOUNTAIN_EXPONENT)
            * (MOUNTAIN_BASE + macro_shape * MOUNTAIN_MACRO_BOOST);
        let fold = ((cx * 1.3 + cy * 0.7) * PI * 1.5 + warp * 4.0).sin() * FOLD_AMPLITUDE;

        let axis = (warp - 0.5) * 0.8 + 0.25 * (cy * PI * 1.2 + self.phase).sin();
        let offset = cx - axis;
        let valley = -(-(offset * offset) / (2.0 * VALLEY_WIDTH * VALLEY_WIDTH)).exp() * VALLEY_DEPTH;

        let radius = (cx * cx + cy * cy).sqrt();
        let coast = if radius > COAST_RADIUS {
            let t = ((radius - COAST_RADIUS) / COAST_FALLOFF).min(1.0);
            -t * t * COAST_DEPTH
        } else {
            0.0
        };

        let micro = (detail - 0.5) * MICRO_DETAIL;

        continental + mountains + BASELINE_OFFSET + fold + valley + coast + micro
    }
}

/// Deterministic heightfield for `(size, seed)`, row-major, clamped to the height bounds
pub fn generate_terrain(size: usize, seed: u32) -> Vec<f32> {
    let channels = TerrainChannels::new(seed);
    let span = if size > 1 { (size - 1) as f64 } else { 1.0 };

    let mut terrain = vec![0.0f32; size * size];
    for y in 0..size {
        let ny = if size > 1 { y as f64 / span } else { 0.5 };
        for x in 0..size {
            let nx = if size > 1 { x as f64 / span } else { 0.5 };
            let height = channels.height_at(nx, ny) as f32;
            terrain[to_index(size, x, y)] = clamp(height, MIN_TERRAIN_HEIGHT, MAX_TERRAIN_HEIGHT);
        }
    }

    let mut scratch = vec![0.0f32; terrain.len()];
    for blend in SMOOTHING_BLENDS {
        smooth_pass(&terrain, &mut scratch, size, blend);
        std::mem::swap(&mut terrain, &mut scratch);
    }

    terrain
}

/// One 3×3 box-blur pass blended into the original: `old * (1 - blend) + avg * blend`
fn smooth_pass(src: &[f32], dst: &mut [f32], size: usize, blend: f32) {
    for y in 0..size {
        for x in 0..size {
            let mut sum = 0.0;
            let mut count = 0.0;
            for ny in y.saturating_sub(1)..=(y + 1).min(size - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(size - 1) {
                    sum += src[to_index(size, nx, ny)];
                    count += 1.0;
                }
            }
            let i = to_index(size, x, y);
            let smoothed = src[i] * (1.0 - blend) + (sum / count) * blend;
            dst[i] = clamp(smoothed, MIN_TERRAIN_HEIGHT, MAX_TERRAIN_HEIGHT);
        }
    }
}

/// Places the starting spring on the highest interior cell.
///
/// Cells within `max(2, size * 6%)` of an edge are not considered. A grid too
/// small to have an interior yields no sources.
pub fn initial_sources(terrain: &[f32], size: usize) -> Vec<WaterSource> {
    let margin = 2.max((size as f32 * 0.06).floor() as usize);
    if size <= margin * 2 {
        return Vec::new();
    }

    let mut best: Option<(usize, usize, f32)> = None;
    for y in margin..size - margin {
        for x in margin..size - margin {
            let height = terrain[to_index(size, x, y)];
            if best.is_none_or(|(_, _, h)| height > h) {
                best = Some((x, y, height));
            }
        }
    }

    best.map(|(x, y, height)| {
        let peak = clamp((height + 4.0) / 20.0, 0.0, 1.0);
        let rate = ((1.1 + peak * 0.95) * 100.0).round() / 100.0;
        WaterSource::new(x as i32, y as i32, rate)
    })
    .into_iter()
    .collect()
}

/// A fresh world: generated terrain, its initial spring, no water, time zero.
///
/// Without a vegetation seed one is derived from the terrain seed.
pub fn generate_world(size: usize, terrain_seed: u32, vegetation_seed: Option<u32>) -> WorldState {
    let terrain = generate_terrain(size, terrain_seed);
    let sources = initial_sources(&terrain, size);

    let (min, max) = terrain
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    debug!("Terrain {size}x{size} seed {terrain_seed}: heights {min:.2}..{max:.2}");
    info!("Generated world {size}x{size} (seed {terrain_seed}, {} sources)", sources.len());

    WorldState {
        size,
        terrain_seed,
        water: vec![0.0; terrain.len()],
        terrain,
        sources,
        vegetation_seed: vegetation_seed.unwrap_or_else(|| derive_vegetation_seed(terrain_seed)),
        time: 0.0,
    }
}
