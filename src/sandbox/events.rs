use bevy::prelude::*;
use hydrosim::brush::BrushTool;
use hydrosim::climate::{ClimateMode, WeatherOverride, WindOverride};

/// One brush dab at a grid cell; the water-source tool toggles a spring instead
#[derive(Message, Debug, Clone, Copy)]
pub struct BrushStrokeEvent {
    pub x: i32,
    pub y: i32,
    pub tool: BrushTool,
}

/// Throws the current world away; a random seed is drawn when none is given
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RegenerateWorldEvent {
    pub terrain_seed: Option<u32>,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SetClimateModesEvent {
    pub day: ClimateMode<f32>,
    pub weather: ClimateMode<WeatherOverride>,
    pub wind: ClimateMode<WindOverride>,
}

#[derive(Message)]
pub struct SaveWorldEvent;

#[derive(Message)]
pub struct LoadWorldEvent;
