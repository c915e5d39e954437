// Lattice value noise and its fractal sum
//
// Both types implement the `noise` crate's `NoiseFn` so they compose with its
// combinators, but the lattice hash is our own: terrain must be reproducible
// from a seed on every platform.

use crate::tools::hash01;
use noise::{NoiseFn, Seedable};

/// Seed offset between consecutive octaves of a [`Fractal`]
pub const OCTAVE_SEED_STRIDE: u32 = 97;

/// Bilinearly interpolated value noise over an integer lattice, in [0, 1)
#[derive(Debug, Clone, Copy, Default)]
pub struct LatticeValue {
    seed: u32,
}

impl LatticeValue {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn corner(&self, x: i64, y: i64) -> f64 {
        hash01(x, y, self.seed as u64)
    }
}

impl Seedable for LatticeValue {
    fn set_seed(self, seed: u32) -> Self {
        Self { seed }
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseFn<f64, 2> for LatticeValue {
    fn get(&self, point: [f64; 2]) -> f64 {
        let [x, y] = point;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = ease(x - x0);
        let ty = ease(y - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let v00 = self.corner(ix, iy);
        let v10 = self.corner(ix + 1, iy);
        let v01 = self.corner(ix, iy + 1);
        let v11 = self.corner(ix + 1, iy + 1);

        let top = v00 + (v10 - v00) * tx;
        let bottom = v01 + (v11 - v01) * tx;
        top + (bottom - top) * ty
    }
}

/// Smoothstep easing `t²(3 - 2t)`
fn ease(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Weighted sum of [`LatticeValue`] octaves, normalized back into [0, 1)
///
/// Octave `i` is seeded with `seed + i * 97` so octaves never share a lattice.
#[derive(Debug, Clone, Copy)]
pub struct Fractal {
    pub seed: u32,
    pub octaves: usize,
    pub frequency: f64,
    pub lacunarity: f64,
    pub gain: f64,
}

impl Fractal {
    pub fn new(seed: u32, octaves: usize, frequency: f64, lacunarity: f64, gain: f64) -> Self {
        Self {
            seed,
            octaves: octaves.max(1),
            frequency,
            lacunarity,
            gain,
        }
    }
}

impl Seedable for Fractal {
    fn set_seed(self, seed: u32) -> Self {
        Self { seed, ..self }
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseFn<f64, 2> for Fractal {
    fn get(&self, point: [f64; 2]) -> f64 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        for octave in 0..self.octaves {
            let seed = self
                .seed
                .wrapping_add((octave as u32).wrapping_mul(OCTAVE_SEED_STRIDE));
            let layer = LatticeValue::new(seed);
            sum += layer.get([point[0] * frequency, point[1] * frequency]) * amplitude;
            norm += amplitude;
            amplitude *= self.gain;
            frequency *= self.lacunarity;
        }
        sum / norm
    }
}
