//! Hill chains
//!
//! Hills grow from the low flanks of the mountain ranges and walk away from
//! the coast in a narrower cone than mountains. Each chain claims the nearest
//! mountain top within its width, so that top never becomes a volcano. Hill
//! tops are diffused together with the surviving mountain tops so foothills
//! merge into ranges.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use super::ridge::{diffuse_tops, walk_ridge, RidgeParams};
use crate::coast_set::CoastSet;
use crate::grid::{Coord, TerrainGrid};
use crate::spatial::{nearest_in_set, normalize_or_random};

/// Mountain flank cells at or below this height can seed a hill.
pub const MAX_START_HEIGHT: f32 = 10.0;

/// What the hill agent leaves behind
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HillOutput {
    /// Recorded hill tops
    pub tops: Vec<Coord>,
    /// Hill chains that recorded at least one top
    pub chains: usize,
    /// Mountain tops claimed by a hill chain, in claim order
    pub claimed: Vec<Coord>,
}

/// Grow hill chains from `mountain_vertices`.
///
/// Every chain claims the mountain top nearest its start if it lies within
/// `params.width`; the top is removed from `mountain_tops` (all occurrences).
pub fn generate_hills(
    grid: &mut TerrainGrid,
    coast: &CoastSet,
    mountain_vertices: &[Coord],
    mountain_tops: &mut Vec<Coord>,
    params: &RidgeParams,
    rng: &mut ChaCha8Rng,
) -> HillOutput {
    let mut output = HillOutput::default();
    let mut starts: Vec<Coord> = mountain_vertices
        .iter()
        .copied()
        .filter(|&c| grid.height_at(c) <= MAX_START_HEIGHT)
        .collect();

    let count = params.draw_count(rng);
    for chain in 0..count {
        if starts.is_empty() {
            debug!(chain, "ran out of hill starts");
            break;
        }
        let start = starts.swap_remove(rng.gen_range(0..starts.len()));
        if let Some(top) = nearest_in_set(start, mountain_tops) {
            if top.distance(start) < params.width {
                mountain_tops.retain(|&t| t != top);
                output.claimed.push(top);
            }
        }

        let away = match nearest_in_set(start, coast.as_slice()) {
            Some(shore) => (
                start.x as f32 - shore.x as f32,
                start.z as f32 - shore.z as f32,
            ),
            None => (0.0, 0.0),
        };
        let away = normalize_or_random(away, rng);
        let length = params.draw_length(rng);
        let before = output.tops.len();
        let end = walk_ridge(
            grid,
            start,
            away,
            length,
            coast.as_slice(),
            params,
            rng,
            &mut output.tops,
        );
        trace!(chain, ?start, ?end, "hill walk");
        if output.tops.len() > before {
            output.chains += 1;
        }
    }

    diffuse_tops(grid, &output.tops, mountain_tops, params, rng);
    debug!(
        chains = output.chains,
        tops = output.tops.len(),
        claimed = output.claimed.len(),
        "hills grown"
    );
    output
}
