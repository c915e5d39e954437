pub mod brush;
pub mod climate;
pub mod config;
pub mod constants;
pub mod grid;
pub mod humidity;
pub mod simulation;
pub mod snapshot;
pub mod sources;
pub mod terrain;
pub mod tools;
pub mod value_noise;
pub mod vegetation;
pub mod water;
pub mod world;

pub use config::{get_config, reload_config};
