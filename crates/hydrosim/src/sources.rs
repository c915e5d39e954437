use crate::grid::in_bounds;
use crate::world::{WaterSource, WorldState, source_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceToggle {
    Added(String),
    Removed(String),
    /// The click landed outside the grid
    Ignored,
}

/// Removes the source nearest to `(x, y)` within `pick_radius` cells, or adds
/// a new active one at `(x, y)` when there is none.
pub fn toggle_source_at(state: &mut WorldState, x: i32, y: i32, rate: f32, pick_radius: f32) -> SourceToggle {
    if !in_bounds(state.size, x, y) {
        return SourceToggle::Ignored;
    }

    let nearest = state
        .sources
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let (dx, dy) = ((s.x - x) as f32, (s.y - y) as f32);
            (i, (dx * dx + dy * dy).sqrt())
        })
        .filter(|&(_, distance)| distance <= pick_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((i, _)) = nearest {
        let removed = state.sources.remove(i);
        return SourceToggle::Removed(removed.id);
    }

    let mut source = WaterSource::new(x, y, rate.max(0.0));
    source.id = unique_id(state, source_id(x, y));
    let id = source.id.clone();
    state.sources.push(source);
    SourceToggle::Added(id)
}

fn unique_id(state: &WorldState, base: String) -> String {
    if state.find_source(&base).is_none() {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if state.find_source(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

pub fn remove_source(state: &mut WorldState, id: &str) -> Option<WaterSource> {
    let index = state.sources.iter().position(|s| s.id == id)?;
    Some(state.sources.remove(index))
}

/// Returns false when no source has this id
pub fn set_source_active(state: &mut WorldState, id: &str, active: bool) -> bool {
    match state.sources.iter_mut().find(|s| s.id == id) {
        Some(source) => {
            source.active = active;
            true
        }
        None => false,
    }
}
