use crate::constants::{MAX_TERRAIN_HEIGHT, MIN_TERRAIN_HEIGHT};
use crate::grid::{clamp, to_index};
use crate::world::WorldState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrushTool {
    Raise,
    Lower,
    Flatten,
    /// Places or removes a spring; handled by [`crate::sources`], not the heightfield
    WaterSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    /// In grid cells, at least 1
    pub radius: f32,
    /// Used clamped to [0.01, 1]
    pub strength: f32,
    /// Target of the flatten tool; the terrain itself still stays in bounds
    pub flatten_height: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 6.0,
            strength: 0.35,
            flatten_height: 0.0,
        }
    }
}

/// Applies one brush dab centred on `(cx, cy)` with linear radial falloff.
///
/// Cells outside the grid are skipped, so a centre off the map simply edits
/// fewer (or no) cells. Heights are clamped to the terrain bounds afterwards.
pub fn apply_brush(state: &mut WorldState, cx: i32, cy: i32, tool: BrushTool, brush: &BrushSettings) {
    if tool == BrushTool::WaterSource {
        return;
    }
    state.assert_shape();

    let radius = brush.radius.max(1.0);
    let strength = clamp(brush.strength, 0.01, 1.0);
    let reach = radius.ceil() as i32;
    let size = state.size as i32;

    let x_min = cx.saturating_sub(reach).max(0);
    let x_max = cx.saturating_add(reach).min(size - 1);
    let y_min = cy.saturating_sub(reach).max(0);
    let y_max = cy.saturating_add(reach).min(size - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = (x as i64 - cx as i64) as f32;
            let dy = (y as i64 - cy as i64) as f32;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius {
                continue;
            }
            let influence = (1.0 - distance / radius) * strength;

            let i = to_index(state.size, x as usize, y as usize);
            let height = state.terrain[i];
            let edited = match tool {
                BrushTool::Raise => height + influence,
                BrushTool::Lower => height - influence,
                BrushTool::Flatten => height + (brush.flatten_height - height) * influence,
                BrushTool::WaterSource => height,
            };
            state.terrain[i] = clamp(edited, MIN_TERRAIN_HEIGHT, MAX_TERRAIN_HEIGHT);
        }
    }
}
