//! Random relief noise over land

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::grid::{TerrainGrid, LAND_THRESHOLD};

#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    pub passes: usize,
    /// Chance (0-100) that a land cell is perturbed in one pass
    pub chance_percent: u32,
    /// Height delta range, inclusive
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            passes: 1,
            chance_percent: 10,
            min_height: 3.0,
            max_height: 10.0,
        }
    }
}

/// Add a random height delta to a random subset of land cells, once per pass.
/// Returns the number of perturbed cells.
pub fn apply_noise(grid: &mut TerrainGrid, params: &NoiseParams, rng: &mut ChaCha8Rng) -> usize {
    let mut touched = 0;
    for _ in 0..params.passes {
        for (_, _, sample) in grid.iter_mut() {
            if sample.height < LAND_THRESHOLD {
                continue;
            }
            if rng.gen_range(0..100) >= params.chance_percent {
                continue;
            }
            sample.height += rng.gen_range(params.min_height..=params.max_height);
            touched += 1;
        }
    }
    debug!(passes = params.passes, touched, "noise applied");
    touched
}
