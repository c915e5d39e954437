use rand::Rng;

/// Random user-facing seed with at most eight decimal digits
pub fn generate_seed8() -> u32 {
    rand::rng().random_range(0..100_000_000)
}

pub fn expand_seed64(code: u32) -> u64 {
    splitmix64(code as u64)
}

/// Vegetation seed derived from a terrain seed, used when a world is generated
/// without an explicit vegetation seed
pub fn derive_vegetation_seed(terrain_seed: u32) -> u32 {
    (expand_seed64(terrain_seed) >> 32) as u32 % 100_000_000
}

/// A fast hash function (SplitMix64) for pseudo-random reproducible uniform distribution.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Hashes a single lattice point uniquely given its coordinates and seed.
/// Coordinates may be negative.
pub fn hash_cell(x: i64, y: i64, seed: u64) -> u64 {
    let a = splitmix64(seed);
    let b = splitmix64(a ^ (x as u64).wrapping_mul(0xC2B2AE3D27D4EB4F));
    splitmix64(b ^ (y as u64).wrapping_mul(0x165667B19E3779F9))
}

/// Uniform value in [0, 1) for a lattice point
pub fn hash01(x: i64, y: i64, seed: u64) -> f64 {
    // top 53 bits fill an f64 mantissa exactly
    (hash_cell(x, y, seed) >> 11) as f64 / (1u64 << 53) as f64
}
