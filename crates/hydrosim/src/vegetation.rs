// Per-cell planting suitability
//
// Read-only: the render layer calls this (throttled) to place instanced
// plants, diagnostics call it per hovered cell. Every random choice comes from
// a coordinate hash so the same inputs always give the same plant.

use crate::constants::VEGETATION_WETNESS_DEPTH;
use crate::grid::{clamp, saturate, to_index};
use crate::tools::hash01;
use glam::Vec2;

/// Salts separating the density gate from the species draw and the scale jitter
const DENSITY_SALT: u64 = 0x5EED_0001;
const SPECIES_SALT: u64 = 0x5EED_0002;
const SCALE_SALT: u64 = 0x5EED_0003;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Canopy,
    Shrub,
    Grass,
}

/// Inputs shared by every cell of one sampling pass
#[derive(Debug, Clone, Copy)]
pub struct VegetationInputs<'a> {
    pub size: usize,
    pub terrain: &'a [f32],
    pub water: &'a [f32],
    pub humidity: &'a [f32],
    pub seed: u32,
    pub vitality: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VegetationSample {
    /// False on the grid border, where the 4-neighbour stencil is incomplete
    pub eligible: bool,
    pub slope: f32,
    pub valley: f32,
    pub ridge: f32,
    pub riparian: f32,
    pub moisture: f32,
    pub fertility: f32,
    pub canopy: f32,
    pub shrub: f32,
    pub grass: f32,
    /// Thinned out by the density gate
    pub blocked: bool,
    pub species: Option<Species>,
}

fn wetness(water: f32) -> f32 {
    saturate(water / VEGETATION_WETNESS_DEPTH)
}

/// Triangular preference for an altitude band
fn band(altitude: f32, centre: f32, width: f32) -> f32 {
    saturate(1.0 - (altitude - centre).abs() / width)
}

/// Suitability breakdown and species decision for cell `(x, y)`
pub fn sample_vegetation(inputs: &VegetationInputs, x: usize, y: usize) -> VegetationSample {
    let size = inputs.size;
    if x == 0 || y == 0 || x + 1 >= size || y + 1 >= size {
        return VegetationSample::default();
    }

    let at = |x: usize, y: usize| to_index(size, x, y);
    let i = at(x, y);
    let neighbours = [at(x + 1, y), at(x - 1, y), at(x, y - 1), at(x, y + 1)];
    let terrain = inputs.terrain;
    let height = terrain[i];

    let gradient = Vec2::new(
        (terrain[neighbours[0]] - terrain[neighbours[1]]) * 0.5,
        (terrain[neighbours[3]] - terrain[neighbours[2]]) * 0.5,
    );
    let slope = saturate(gradient.length() / 2.0);

    let neighbour_mean = neighbours.iter().map(|&j| terrain[j]).sum::<f32>() / 4.0;
    let deviation = neighbour_mean - height;
    let valley = saturate(deviation / 1.2);
    let ridge = saturate(-deviation / 1.2);

    let riparian = neighbours
        .iter()
        .map(|&j| wetness(inputs.water[j]))
        .fold(wetness(inputs.water[i]), f32::max);
    let moisture = saturate(inputs.humidity[i] * 0.7 + wetness(inputs.water[i]) * 0.3);

    let fertility = saturate(
        moisture * 0.44 + riparian * 0.3 + valley * 0.24 + inputs.vitality * 0.2
            - slope * 0.37
            - ridge * 0.22,
    );

    let altitude = clamp((height + 4.0) / 20.0, 0.0, 1.0);
    let canopy = band(altitude, 0.4, 0.35)
        * (1.0 - slope).powi(2)
        * (0.3 + moisture * 0.7)
        * (0.6 + valley * 0.4)
        * fertility;
    let shrub = band(altitude, 0.6, 0.4)
        * (1.0 - slope * 0.6)
        * (0.4 + moisture * 0.4)
        * (0.7 + ridge * 0.3)
        * fertility;
    let grass = band(altitude, 0.35, 0.5)
        * (1.0 - slope * 0.8)
        * (0.5 + moisture * 0.5)
        * (1.0 - ridge * 0.25)
        * fertility;

    let seed = inputs.seed as u64;
    let (cx, cy) = (x as i64, y as i64);
    let blocked = hash01(cx, cy, seed ^ DENSITY_SALT) as f32 > fertility * 0.95;
    let species = if blocked {
        None
    } else {
        pick_species(canopy, shrub, grass, hash01(cx, cy, seed ^ SPECIES_SALT) as f32)
    };

    VegetationSample {
        eligible: true,
        slope,
        valley,
        ridge,
        riparian,
        moisture,
        fertility,
        canopy,
        shrub,
        grass,
        blocked,
        species,
    }
}

/// Weighted draw with a caller-supplied uniform `roll` in [0, 1)
fn pick_species(canopy: f32, shrub: f32, grass: f32, roll: f32) -> Option<Species> {
    let weights = [
        (Species::Canopy, canopy.max(0.0)),
        (Species::Shrub, shrub.max(0.0)),
        (Species::Grass, grass.max(0.0)),
    ];
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let target = roll * total;
    let mut cumulative = 0.0;
    for (species, weight) in weights {
        cumulative += weight;
        if weight > 0.0 && target < cumulative {
            return Some(species);
        }
    }
    // roll * total can round up to total
    weights.iter().rev().find(|(_, w)| *w > 0.0).map(|(s, _)| *s)
}

/// One plant for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationPlacement {
    pub x: usize,
    pub y: usize,
    pub species: Species,
    pub scale: f32,
}

/// Samples every `stride`-th interior cell and keeps the ones that grow something
pub fn scan_vegetation(inputs: &VegetationInputs, stride: usize) -> Vec<VegetationPlacement> {
    let stride = stride.max(1);
    let size = inputs.size;
    let mut placements = Vec::new();
    for y in (1..size.saturating_sub(1)).step_by(stride) {
        for x in (1..size.saturating_sub(1)).step_by(stride) {
            let sample = sample_vegetation(inputs, x, y);
            if let Some(species) = sample.species {
                let jitter = hash01(x as i64, y as i64, inputs.seed as u64 ^ SCALE_SALT) as f32;
                placements.push(VegetationPlacement {
                    x,
                    y,
                    species,
                    scale: 0.6 + sample.fertility * 0.4 + jitter * 0.2,
                });
            }
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Layers {
        size: usize,
        terrain: Vec<f32>,
        water: Vec<f32>,
        humidity: Vec<f32>,
    }

    impl Layers {
        fn uniform(size: usize, height: f32, water: f32, humidity: f32) -> Self {
            Self {
                size,
                terrain: vec![height; size * size],
                water: vec![water; size * size],
                humidity: vec![humidity; size * size],
            }
        }

        fn inputs(&self, seed: u32, vitality: f32) -> VegetationInputs<'_> {
            VegetationInputs {
                size: self.size,
                terrain: &self.terrain,
                water: &self.water,
                humidity: &self.humidity,
                seed,
                vitality,
            }
        }
    }

    #[rstest]
    #[case(0, 3)]
    #[case(3, 0)]
    #[case(7, 3)]
    #[case(3, 7)]
    fn test_edge_cells_are_ineligible(#[case] x: usize, #[case] y: usize) {
        let layers = Layers::uniform(8, 2.0, 0.3, 0.9);
        let sample = sample_vegetation(&layers.inputs(1, 1.0), x, y);
        assert!(!sample.eligible);
        assert_eq!(sample.species, None);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let mut layers = Layers::uniform(16, 3.0, 0.1, 0.6);
        for (i, h) in layers.terrain.iter_mut().enumerate() {
            *h = ((i * 37) % 11) as f32 * 0.4;
        }
        let inputs = layers.inputs(99, 0.7);
        for y in 1..15 {
            for x in 1..15 {
                assert_eq!(sample_vegetation(&inputs, x, y), sample_vegetation(&inputs, x, y));
            }
        }
        assert_eq!(scan_vegetation(&inputs, 1), scan_vegetation(&inputs, 1));
    }

    #[test]
    fn test_flat_wet_ground_is_fertile() {
        let layers = Layers::uniform(5, 2.0, 0.35, 1.0);
        let sample = sample_vegetation(&layers.inputs(3, 1.0), 2, 2);
        assert!(sample.eligible);
        assert_eq!(sample.slope, 0.0);
        assert_eq!(sample.valley, 0.0);
        assert_eq!(sample.ridge, 0.0);
        assert_eq!(sample.riparian, 1.0);
        // 1.0 * 0.44 + 1.0 * 0.3 + 1.0 * 0.2 saturates
        assert!((sample.fertility - 0.94).abs() < 1e-6);
        assert!(sample.canopy > 0.0 && sample.shrub > 0.0 && sample.grass > 0.0);
    }

    #[test]
    fn test_steep_dry_ridge_is_barren() {
        let mut layers = Layers::uniform(5, 0.0, 0.0, 0.0);
        let centre = to_index(5, 2, 2);
        layers.terrain[centre] = 20.0;
        layers.terrain[to_index(5, 3, 2)] = 8.0;
        let sample = sample_vegetation(&layers.inputs(3, 0.0), 2, 2);
        assert!(sample.ridge > 0.9);
        assert_eq!(sample.fertility, 0.0);
        assert!(sample.blocked);
        assert_eq!(sample.species, None);
    }

    #[test]
    fn test_grass_thins_on_ridges() {
        let mut layers = Layers::uniform(5, 2.0, 0.2, 0.8);
        layers.terrain[to_index(5, 2, 2)] = 2.6;
        let sample = sample_vegetation(&layers.inputs(4, 1.0), 2, 2);
        assert!((sample.ridge - 0.5).abs() < 1e-5);

        let altitude = (2.6 + 4.0) / 20.0;
        let without_ridge = band(altitude, 0.35, 0.5) * (0.5 + sample.moisture * 0.5) * sample.fertility;
        assert!(sample.grass > 0.0);
        assert!((sample.grass - without_ridge * 0.875).abs() < 1e-5);
    }

    #[test]
    fn test_density_gate_follows_fertility() {
        // flat ground: fertility is 0.44 * moisture + 0.3 * riparian + 0.2 * vitality
        let sparse = Layers::uniform(32, 2.0, 0.0, 0.3);
        let lush = Layers::uniform(32, 2.0, 0.35, 1.0);
        let interior = 30.0 * 30.0;

        for (layers, vitality) in [(&sparse, 0.0), (&lush, 1.0)] {
            let inputs = layers.inputs(21, vitality);
            let fertility = sample_vegetation(&inputs, 5, 5).fertility;
            let share = scan_vegetation(&inputs, 1).len() as f32 / interior;
            assert!(
                (share - fertility * 0.95).abs() < 0.06,
                "share {share} for fertility {fertility}"
            );
        }

        let sparse_count = scan_vegetation(&sparse.inputs(21, 0.0), 1).len();
        let lush_count = scan_vegetation(&lush.inputs(21, 1.0), 1).len();
        assert!(sparse_count * 4 < lush_count);
    }

    #[test]
    fn test_valley_detection() {
        let mut layers = Layers::uniform(5, 4.0, 0.0, 0.5);
        layers.terrain[to_index(5, 2, 2)] = 2.5;
        let sample = sample_vegetation(&layers.inputs(1, 0.5), 2, 2);
        assert!((sample.valley - 1.0).abs() < 1e-6);
        assert_eq!(sample.ridge, 0.0);
    }

    #[rstest]
    #[case(1.0, 0.0, 0.0, 0.99, Some(Species::Canopy))]
    #[case(0.0, 1.0, 0.0, 0.0, Some(Species::Shrub))]
    #[case(0.0, 0.0, 1.0, 0.5, Some(Species::Grass))]
    #[case(1.0, 1.0, 0.0, 0.49, Some(Species::Canopy))]
    #[case(1.0, 1.0, 0.0, 0.51, Some(Species::Shrub))]
    #[case(0.0, 0.0, 0.0, 0.3, None)]
    fn test_pick_species(
        #[case] canopy: f32,
        #[case] shrub: f32,
        #[case] grass: f32,
        #[case] roll: f32,
        #[case] expected: Option<Species>,
    ) {
        assert_eq!(pick_species(canopy, shrub, grass, roll), expected);
    }

    #[test]
    fn test_scan_only_returns_interior_growth() {
        let layers = Layers::uniform(20, 2.0, 0.35, 1.0);
        let placements = scan_vegetation(&layers.inputs(11, 1.0), 1);
        assert!(!placements.is_empty());
        for p in &placements {
            assert!(p.x >= 1 && p.y >= 1 && p.x < 19 && p.y < 19);
            assert!(p.scale >= 0.6 && p.scale <= 1.2);
        }
        let sparse = scan_vegetation(&layers.inputs(11, 1.0), 3);
        assert!(sparse.len() < placements.len());
    }
}
