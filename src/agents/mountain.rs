//! Mountain ranges
//!
//! Each range starts on a random land cell and walks away from the nearest
//! coast, dropping peaks along the way. After all ranges are walked the peaks
//! are diffused outward so every range gets sloped flanks.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use super::ridge::{diffuse_tops, walk_ridge, RidgeEnd, RidgeParams};
use crate::coast_set::CoastSet;
use crate::grid::{Coord, TerrainGrid};
use crate::spatial::{nearest_in_set, normalize_or_random};

/// What the mountain agent leaves behind for later agents
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MountainOutput {
    /// Land cells lifted noticeably by the ranges; hills start from these
    pub vertices: Vec<Coord>,
    /// Recorded ridge tops; volcanoes are placed on these
    pub tops: Vec<Coord>,
    /// Ranges that recorded at least one top
    pub ranges: usize,
}

/// Grow mountain ranges on the island's land.
pub fn generate_mountains(
    grid: &mut TerrainGrid,
    coast: &CoastSet,
    params: &RidgeParams,
    rng: &mut ChaCha8Rng,
) -> MountainOutput {
    let mut output = MountainOutput::default();
    let land: Vec<Coord> = grid
        .iter()
        .filter(|(_, _, s)| s.height > params.floor)
        .map(|(x, z, _)| Coord::new(x, z))
        .collect();
    if land.is_empty() {
        debug!("no land for mountains");
        return output;
    }

    let count = params.draw_count(rng);
    for range in 0..count {
        let length = params.draw_length(rng);
        let before = output.tops.len();

        for _attempt in 0..=params.restart_attempts {
            let Some(&start) = land.choose(rng) else { break };
            let away = match nearest_in_set(start, coast.as_slice()) {
                Some(shore) => (
                    start.x as f32 - shore.x as f32,
                    start.z as f32 - shore.z as f32,
                ),
                None => (0.0, 0.0),
            };
            let away = normalize_or_random(away, rng);
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
            trace!(range, ?start, ?end, "mountain walk");
            if end != (RidgeEnd::TooCloseToCoast { first_top: true }) {
                break;
            }
        }

        if output.tops.len() > before {
            output.ranges += 1;
        }
    }

    output.vertices = diffuse_tops(grid, &output.tops, &[], params, rng);
    debug!(
        ranges = output.ranges,
        tops = output.tops.len(),
        vertices = output.vertices.len(),
        "mountains grown"
    );
    output
}
