pub const MIN_TERRAIN_HEIGHT: f32 = -12.0;
pub const MAX_TERRAIN_HEIGHT: f32 = 24.0;

/// Length of one simulated day in seconds
pub const DAY_LENGTH_SECONDS: f64 = 1440.0;
/// Night never goes fully dark
pub const MIN_DAYLIGHT: f32 = 0.08;

/// Rain below this intensity is not injected into the water field
pub const RAIN_THRESHOLD: f32 = 0.02;
/// Water column added per second at full rain intensity on flat lowland
pub const BASE_RAIN_RATE: f32 = 0.012;

/// Humidity diffusion runs once every this many ticks
pub const HUMIDITY_DIFFUSION_STEPS: u32 = 4;
pub const HUMIDITY_DIFFUSION_RATE: f32 = 0.13;

/// Water depth at which a cell counts as fully wet for humidity
pub const HUMIDITY_WETNESS_DEPTH: f32 = 0.6;
/// Water depth at which a cell counts as fully wet for vegetation
pub const VEGETATION_WETNESS_DEPTH: f32 = 0.35;
/// Water depth below which a cell is treated as dry in statistics
pub const WET_CELL_EPSILON: f32 = 1e-3;
