// Shallow-water flow over the heightfield
//
// Each tick: springs inject water, every wet cell pushes water towards lower
// neighbours (never more than it holds), then damping, evaporation, seepage
// and edge drainage remove water. The flow pass alone conserves mass.

use crate::constants::WET_CELL_EPSILON;
use crate::grid::{in_bounds, is_border, to_index};
use crate::world::WorldState;
use serde::{Deserialize, Serialize};

/// Per-step solver coefficients, supplied by the host every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Seconds per tick, > 0
    pub dt: f32,
    pub flow_rate: f32,
    /// Fraction of the column lost per second
    pub damping: f32,
    /// Absolute column height lost per second
    pub evaporation: f32,
    /// Fraction of the column soaking into the ground per second
    #[serde(default)]
    pub seepage: f32,
    /// Absolute loss per second on border cells
    #[serde(default)]
    pub edge_drain: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dt: 1.0 / 30.0,
            flow_rate: 4.0,
            damping: 0.02,
            evaporation: 0.0008,
            seepage: 0.0,
            edge_drain: 0.0,
        }
    }
}

/// Neighbour directions in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Right,
    Left,
    Up,
    Down,
}

impl FlowDirection {
    pub const ALL: [FlowDirection; 4] = [
        FlowDirection::Right,
        FlowDirection::Left,
        FlowDirection::Up,
        FlowDirection::Down,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            FlowDirection::Right => (1, 0),
            FlowDirection::Left => (-1, 0),
            FlowDirection::Up => (0, -1),
            FlowDirection::Down => (0, 1),
        }
    }
}

/// Caller-owned delta buffer, sized once per world and reused every tick
#[derive(Debug, Clone, Default)]
pub struct WaterScratch {
    delta: Vec<f32>,
}

impl WaterScratch {
    pub fn for_world(state: &WorldState) -> Self {
        Self {
            delta: vec![0.0; state.cell_count()],
        }
    }

    fn reset(&mut self, len: usize) {
        self.delta.clear();
        self.delta.resize(len, 0.0);
    }
}

/// Advances `state.water` by one tick of `params.dt`.
///
/// Outflow is computed from an unmodified snapshot of the heights and written
/// to `scratch`, so the order cells are visited in never matters.
pub fn step_water(state: &mut WorldState, params: &SimParams, scratch: &mut WaterScratch) {
    state.assert_shape();
    let size = state.size;
    let dt = params.dt;

    inject_sources(state, dt);

    scratch.reset(state.cell_count());
    let delta = &mut scratch.delta;
    let flow_per_height = params.flow_rate * dt;

    for y in 0..size {
        for x in 0..size {
            let i = to_index(size, x, y);
            let water = state.water[i];
            if water <= 0.0 {
                continue;
            }
            let level = state.terrain[i] + water;

            let mut targets = [(0usize, 0.0f32); 4];
            let mut count = 0;
            let mut potential_sum = 0.0;
            for direction in FlowDirection::ALL {
                let (dx, dy) = direction.offset();
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                if !in_bounds(size, nx, ny) {
                    continue;
                }
                let j = to_index(size, nx as usize, ny as usize);
                let drop = level - (state.terrain[j] + state.water[j]);
                if drop > 0.0 {
                    let potential = drop * flow_per_height;
                    targets[count] = (j, potential);
                    count += 1;
                    potential_sum += potential;
                }
            }
            if potential_sum <= 0.0 {
                continue;
            }

            let scale = (water / potential_sum).min(1.0);
            for &(j, potential) in &targets[..count] {
                let flow = potential * scale;
                delta[i] -= flow;
                delta[j] += flow;
            }
        }
    }

    for y in 0..size {
        for x in 0..size {
            let i = to_index(size, x, y);
            let with_flow = state.water[i] + delta[i];
            let seep_loss = with_flow * params.seepage * dt;
            let mut next = with_flow * (1.0 - params.damping * dt) - params.evaporation * dt - seep_loss;
            if is_border(size, x, y) {
                next -= params.edge_drain * dt;
            }
            state.water[i] = next.max(0.0);
        }
    }
}

fn inject_sources(state: &mut WorldState, dt: f32) {
    for source in state.sources.iter().filter(|s| s.active) {
        if let Some(i) = source.cell_index(state.size) {
            state.water[i] += source.rate.max(0.0) * dt;
        }
    }
}

/// Sum of all water; the oracle for mass conservation
pub fn total_water(state: &WorldState) -> f64 {
    state.water.iter().map(|&w| w as f64).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterStats {
    pub total: f64,
    pub max_depth: f32,
    pub wet_cells: usize,
}

pub fn water_stats(state: &WorldState) -> WaterStats {
    state.water.iter().fold(WaterStats::default(), |mut stats, &w| {
        stats.total += w as f64;
        stats.max_depth = stats.max_depth.max(w);
        if w > WET_CELL_EPSILON {
            stats.wet_cells += 1;
        }
        stats
    })
}

/// One neighbour's share of a diagnostic breakdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborFlow {
    pub direction: FlowDirection,
    /// Terrain plus water of the neighbour, `None` past the grid edge
    pub total_height: Option<f32>,
    /// How far the neighbour sits below this cell, 0 when it does not
    pub height_difference: f32,
    /// Uncapped outflow towards the neighbour this tick
    pub outflow_potential: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterDiagnostics {
    pub x: usize,
    pub y: usize,
    pub terrain_height: f32,
    pub water_height: f32,
    pub total_height: f32,
    pub neighbors: [NeighborFlow; 4],
    pub potential_sum: f32,
    /// Seepage at the current depth, before this tick's flow
    pub seep_loss: f32,
    /// Full `edge_drain * dt` on border cells, not capped to the water present.
    /// The step subtracts exactly this after the other losses, then floors at zero.
    pub edge_drain_loss: f32,
    pub is_border: bool,
}

/// Read-only flow breakdown of a single cell, `None` outside the grid.
///
/// Potentials are theoretical: they ignore the cap to available water that
/// [`step_water`] applies.
pub fn sample_cell_water_diagnostics(
    state: &WorldState,
    params: &SimParams,
    x: i32,
    y: i32,
) -> Option<WaterDiagnostics> {
    if !state.has_valid_shape() || !in_bounds(state.size, x, y) {
        return None;
    }
    let size = state.size;
    let (ux, uy) = (x as usize, y as usize);
    let i = to_index(size, ux, uy);
    let terrain_height = state.terrain[i];
    let water_height = state.water[i];
    let total_height = terrain_height + water_height;

    let neighbors = FlowDirection::ALL.map(|direction| {
        let (dx, dy) = direction.offset();
        let (nx, ny) = (x + dx, y + dy);
        if !in_bounds(size, nx, ny) {
            return NeighborFlow {
                direction,
                total_height: None,
                height_difference: 0.0,
                outflow_potential: 0.0,
            };
        }
        let j = to_index(size, nx as usize, ny as usize);
        let neighbor_height = state.terrain[j] + state.water[j];
        let height_difference = (total_height - neighbor_height).max(0.0);
        let outflow_potential = if water_height > 0.0 {
            height_difference * params.flow_rate * params.dt
        } else {
            0.0
        };
        NeighborFlow {
            direction,
            total_height: Some(neighbor_height),
            height_difference,
            outflow_potential,
        }
    });

    let border = is_border(size, ux, uy);
    Some(WaterDiagnostics {
        x: ux,
        y: uy,
        terrain_height,
        water_height,
        total_height,
        potential_sum: neighbors.iter().map(|n| n.outflow_potential).sum(),
        neighbors,
        seep_loss: water_height * params.seepage * params.dt,
        edge_drain_loss: if border {
            params.edge_drain * params.dt
        } else {
            0.0
        },
        is_border: border,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WaterSource;
    use rstest::rstest;

    fn lossless(flow_rate: f32, dt: f32) -> SimParams {
        SimParams {
            dt,
            flow_rate,
            damping: 0.0,
            evaporation: 0.0,
            seepage: 0.0,
            edge_drain: 0.0,
        }
    }

    /// 9x9 bowl-ish terrain with a scattered water distribution
    fn uneven_world() -> WorldState {
        let mut world = WorldState::flat(9, 0.0);
        for y in 0..9 {
            for x in 0..9 {
                let i = world.index(x, y);
                world.terrain[i] = ((x * 7 + y * 3) % 5) as f32 * 0.15;
                world.water[i] = ((x * 5 + y * 11) % 7) as f32 * 0.04;
            }
        }
        world
    }

    #[rstest]
    #[case(0.5, 1.0 / 30.0)]
    #[case(4.0, 1.0 / 30.0)]
    #[case(50.0, 0.5)]
    fn test_flow_conserves_mass(#[case] flow_rate: f32, #[case] dt: f32) {
        let mut world = uneven_world();
        let mut scratch = WaterScratch::for_world(&world);
        let params = lossless(flow_rate, dt);
        let before = total_water(&world);
        for _ in 0..5 {
            step_water(&mut world, &params, &mut scratch);
        }
        let after = total_water(&world);
        assert!((before - after).abs() < 1e-5, "before {} after {}", before, after);
    }

    #[test]
    fn test_flow_is_symmetric_from_centre() {
        let mut world = WorldState::flat(5, 0.0);
        let centre = world.index(2, 2);
        world.water[centre] = 1.0;
        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &lossless(0.1, 1.0), &mut scratch);

        let right = world.water[world.index(3, 2)];
        let left = world.water[world.index(1, 2)];
        let up = world.water[world.index(2, 1)];
        let down = world.water[world.index(2, 3)];
        assert!(right > 0.0);
        assert_eq!(right, left);
        assert_eq!(up, down);
        assert_eq!(right, up);
        assert!((world.water[centre] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_outflow_never_exceeds_available_water() {
        let mut world = WorldState::flat(3, 0.0);
        let centre = world.index(1, 1);
        world.terrain[centre] = 5.0;
        world.water[centre] = 0.2;
        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &lossless(1000.0, 1.0), &mut scratch);

        assert!(world.water[centre].abs() < 1e-6);
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert!((world.water[world.index(x, y)] - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn test_source_injection() {
        let mut world = WorldState::flat(6, 0.0);
        world.sources.push(WaterSource::new(3, 2, 2.0));
        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &lossless(0.0, 0.5), &mut scratch);

        let idx = world.index(3, 2);
        assert_eq!(world.water[idx], 1.0);
        for (i, &w) in world.water.iter().enumerate() {
            if i != idx {
                assert_eq!(w, 0.0);
            }
        }
    }

    #[test]
    fn test_inactive_and_outside_sources_inject_nothing() {
        let mut world = WorldState::flat(4, 0.0);
        let mut dormant = WaterSource::new(1, 1, 3.0);
        dormant.active = false;
        world.sources.push(dormant);
        world.sources.push(WaterSource::new(9, 9, 3.0));
        world.sources.push(WaterSource::new(2, 2, -1.0));
        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &lossless(1.0, 1.0), &mut scratch);
        assert_eq!(total_water(&world), 0.0);
    }

    #[rstest]
    #[case(SimParams { dt: 0.1, flow_rate: 3.0, damping: 0.5, evaporation: 0.2, seepage: 0.1, edge_drain: 1.0 })]
    #[case(SimParams { dt: 2.0, flow_rate: 100.0, damping: 5.0, evaporation: 0.0, seepage: 0.0, edge_drain: 0.0 })]
    #[case(SimParams { dt: 1.0, flow_rate: 0.0, damping: 0.0, evaporation: 10.0, seepage: 3.0, edge_drain: 10.0 })]
    fn test_water_never_negative(#[case] params: SimParams) {
        let mut world = uneven_world();
        world.sources.push(WaterSource::new(4, 4, 1.5));
        let mut scratch = WaterScratch::for_world(&world);
        for _ in 0..25 {
            step_water(&mut world, &params, &mut scratch);
            assert!(world.water.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_edge_drain_only_hits_border() {
        let mut world = WorldState::flat(5, 0.0);
        world.water.iter_mut().for_each(|w| *w = 1.0);
        let params = SimParams {
            edge_drain: 0.5,
            ..lossless(0.0, 1.0)
        };
        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &params, &mut scratch);

        assert_eq!(world.water[world.index(2, 2)], 1.0);
        assert_eq!(world.water[world.index(0, 2)], 0.5);
        assert_eq!(world.water[world.index(4, 4)], 0.5);
    }

    #[test]
    fn test_losses_apply_in_order() {
        let mut world = WorldState::flat(3, 0.0);
        let centre = world.index(1, 1);
        world.water[centre] = 1.0;
        let params = SimParams {
            dt: 1.0,
            flow_rate: 0.0,
            damping: 0.1,
            evaporation: 0.05,
            seepage: 0.2,
            edge_drain: 0.0,
        };
        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &params, &mut scratch);
        // 1 * 0.9 - 0.05 - 0.2
        assert!((world.water[centre] - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_scratch_resizes_for_new_world() {
        let mut scratch = WaterScratch::default();
        let mut world = uneven_world();
        step_water(&mut world, &lossless(1.0, 0.1), &mut scratch);
        let mut larger = WorldState::flat(12, 0.0);
        larger.water[5] = 1.0;
        step_water(&mut larger, &lossless(1.0, 0.1), &mut scratch);
        assert!((total_water(&larger) - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "malformed world")]
    fn test_step_rejects_malformed_world() {
        let mut world = WorldState::flat(4, 0.0);
        world.terrain.push(0.0);
        step_water(&mut world, &SimParams::default(), &mut WaterScratch::default());
    }

    #[test]
    fn test_water_stats() {
        let mut world = WorldState::flat(3, 0.0);
        world.water[0] = 0.5;
        world.water[4] = 1.25;
        let stats = water_stats(&world);
        assert!((stats.total - 1.75).abs() < 1e-9);
        assert_eq!(stats.max_depth, 1.25);
        assert_eq!(stats.wet_cells, 2);
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, -1)]
    #[case(5, 0)]
    #[case(0, 5)]
    #[case(i32::MAX, i32::MIN)]
    fn test_diagnostics_outside_grid_is_none(#[case] x: i32, #[case] y: i32) {
        let world = WorldState::flat(5, 0.0);
        assert!(sample_cell_water_diagnostics(&world, &SimParams::default(), x, y).is_none());
    }

    #[test]
    fn test_diagnostics_breakdown() {
        let mut world = WorldState::flat(4, 0.0);
        let right_idx = world.index(1, 0);
        world.terrain[right_idx] = 2.0;
        let origin_idx = world.index(0, 0);
        world.water[origin_idx] = 0.5;
        let down_idx = world.index(0, 1);
        world.terrain[down_idx] = -1.0;
        let params = SimParams {
            dt: 0.5,
            flow_rate: 2.0,
            damping: 0.0,
            evaporation: 0.0,
            seepage: 0.1,
            edge_drain: 0.4,
        };

        let diag = sample_cell_water_diagnostics(&world, &params, 0, 0).unwrap();
        assert_eq!(diag.total_height, 0.5);
        assert!(diag.is_border);

        let right = diag.neighbors[0];
        assert_eq!(right.direction, FlowDirection::Right);
        assert_eq!(right.total_height, Some(2.0));
        assert_eq!(right.outflow_potential, 0.0);

        let left = diag.neighbors[1];
        assert_eq!(left.total_height, None);

        let up = diag.neighbors[2];
        assert_eq!(up.total_height, None);

        let down = diag.neighbors[3];
        assert_eq!(down.total_height, Some(-1.0));
        assert!((down.height_difference - 1.5).abs() < 1e-6);
        // 1.5 * 2.0 * 0.5, larger than the 0.5 actually available
        assert!((down.outflow_potential - 1.5).abs() < 1e-6);
        assert!((diag.potential_sum - 1.5).abs() < 1e-6);
        assert!((diag.seep_loss - 0.025).abs() < 1e-6);
        assert!((diag.edge_drain_loss - 0.2).abs() < 1e-6);
    }

    #[rstest]
    #[case(0.01)]
    #[case(0.4)]
    #[case(3.0)]
    fn test_edge_drain_diagnostic_matches_step(#[case] depth: f32) {
        let mut world = WorldState::flat(6, 0.0);
        let corner = world.index(0, 0);
        world.water[corner] = depth;
        let params = SimParams {
            edge_drain: 1.0,
            ..lossless(0.0, 0.5)
        };

        let diag = sample_cell_water_diagnostics(&world, &params, 0, 0).unwrap();
        assert_eq!(diag.edge_drain_loss, 0.5);

        let mut scratch = WaterScratch::for_world(&world);
        step_water(&mut world, &params, &mut scratch);
        let expected = (depth - diag.edge_drain_loss).max(0.0);
        assert!((world.water[corner] - expected).abs() < 1e-6);

        let interior = sample_cell_water_diagnostics(&world, &params, 2, 2).unwrap();
        assert_eq!(interior.edge_drain_loss, 0.0);
    }

    #[test]
    fn test_diagnostics_do_not_mutate() {
        let world = uneven_world();
        let copy = world.clone();
        let _ = sample_cell_water_diagnostics(&world, &SimParams::default(), 3, 3);
        assert_eq!(world, copy);
    }
}
