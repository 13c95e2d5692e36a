//! Beach carving
//!
//! Walks along the coastline flattening low coastal cells to just above sea
//! level, and from each visited coastal cell carves a short random walk inland
//! so sandy strips reach into the island.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::coast_set::CoastSet;
use crate::grid::{Coord, TerrainGrid, SEA_LEVEL};

/// Parameters for beach carving
#[derive(Clone, Debug, PartialEq)]
pub struct BeachParams {
    /// Maximum number of coastal cells visited per beach
    pub tokens: usize,
    /// Number of separate beaches
    pub number_of_beaches: usize,
    /// How far inland the walk starts, in multiples of the inland step
    pub inland_distance: usize,
    /// Base height of beach sand; lower cells count as water
    pub sea_level: f32,
    /// Cells above this height are never flattened
    pub max_height: f32,
    /// Side of the square flattened around each point
    pub flat_radius: usize,
    /// Maximum random-walk steps inland
    pub number_of_walks: usize,
    /// Random extra height added on top of `sea_level`
    pub height_range: f32,
    /// Attempts to find a low land cell next to the coast
    pub inland_retries: usize,
    /// Inland seed candidates higher than this are rejected
    pub inland_max_height: f32,
}

impl Default for BeachParams {
    fn default() -> Self {
        Self {
            tokens: 200,
            number_of_beaches: 6,
            inland_distance: 5,
            sea_level: 0.5,
            max_height: 10.0,
            flat_radius: 4,
            number_of_walks: 100,
            height_range: 0.2,
            inland_retries: 10,
            inland_max_height: 2.0,
        }
    }
}

/// Summary of a beach run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeachStats {
    /// Beaches that flattened at least one coastal cell
    pub beaches: usize,
    /// Coastal cells processed across all beaches
    pub coastal_cells: usize,
    /// Inland walk steps taken across all beaches
    pub inland_steps: usize,
}

/// Carve `number_of_beaches` beaches. Visited coastal cells are removed from
/// `coast`, as are cells rejected for being too high.
pub fn generate_beaches(
    grid: &mut TerrainGrid,
    coast: &mut CoastSet,
    params: &BeachParams,
    rng: &mut ChaCha8Rng,
) -> BeachStats {
    let mut stats = BeachStats::default();
    for _ in 0..params.number_of_beaches {
        let Some(start) = coast.choose(rng) else { break };
        let before = stats.coastal_cells;
        carve_beach(grid, coast, start, params, rng, &mut stats);
        if stats.coastal_cells > before {
            stats.beaches += 1;
        }
    }
    debug!(
        beaches = stats.beaches,
        coastal_cells = stats.coastal_cells,
        inland_steps = stats.inland_steps,
        "beaches carved"
    );
    stats
}

fn carve_beach(
    grid: &mut TerrainGrid,
    coast: &mut CoastSet,
    start: Coord,
    params: &BeachParams,
    rng: &mut ChaCha8Rng,
    stats: &mut BeachStats,
) {
    let mut cursor = start;
    for _ in 0..params.tokens {
        if grid.height_at(cursor) > params.max_height {
            coast.remove(cursor);
            match coast.choose(rng) {
                Some(next) => {
                    cursor = next;
                    continue;
                }
                None => return,
            }
        }

        flatten(grid, cursor, params, rng);
        stats.coastal_cells += 1;

        let mut inland = find_inland_point(grid, cursor, params, rng).unwrap_or(cursor);
        for _ in 0..params.number_of_walks {
            if grid.height_at(inland) > params.max_height {
                break;
            }
            flatten(grid, inland, params, rng);
            stats.inland_steps += 1;
            let step_x = inland.x as i64 + rng.gen_range(-1..=1);
            let step_z = inland.z as i64 + rng.gen_range(-1..=1);
            match grid.coord(step_x, step_z) {
                Some(next) if is_sand_level(grid, next, params) => inland = next,
                _ => break,
            }
        }

        coast.remove(cursor);
        match next_coastal(grid, coast, cursor, params) {
            Some(next) => cursor = next,
            None => return,
        }
    }
}

/// Whether a cell is at or above the beach sea level.
fn is_sand_level(grid: &TerrainGrid, c: Coord, params: &BeachParams) -> bool {
    grid.height_at(c) >= params.sea_level
}

/// Coastal test used while following the shoreline: land at or above the
/// beach sea level next to a cell at exactly sea level.
fn on_shore(grid: &TerrainGrid, c: Coord, params: &BeachParams) -> bool {
    if !is_sand_level(grid, c, params) {
        return false;
    }
    grid.neighbors_8(c.x, c.z)
        .into_iter()
        .any(|(x, z)| grid.height(x, z) == SEA_LEVEL)
}

/// An unvisited shoreline cell in the 3x3 neighborhood of `c`.
fn next_coastal(
    grid: &TerrainGrid,
    coast: &CoastSet,
    c: Coord,
    params: &BeachParams,
) -> Option<Coord> {
    let mut found = None;
    for (x, z) in grid.neighbors_8(c.x, c.z) {
        let n = Coord::new(x, z);
        if coast.contains(n) && on_shore(grid, n, params) {
            found = Some(n);
        }
    }
    found
}

/// Flatten the square around `c` to sand height. Water and high ground are
/// left untouched.
fn flatten(grid: &mut TerrainGrid, c: Coord, params: &BeachParams, rng: &mut ChaCha8Rng) {
    let half = (params.flat_radius / 2) as i64;
    for dz in -half..=half {
        for dx in -half..=half {
            let Some(cell) = grid.coord(c.x as i64 + dx, c.z as i64 + dz) else {
                continue;
            };
            let h = grid.height_at(cell);
            if h < params.sea_level || h > params.max_height {
                continue;
            }
            let sand = params.sea_level + rng.gen::<f32>() * params.height_range;
            grid.set_height_at(cell, sand);
        }
    }
}

/// Pick a low land cell next to the coast and project it `inland_distance`
/// steps further along the coast-to-candidate direction.
fn find_inland_point(
    grid: &TerrainGrid,
    coast_cell: Coord,
    params: &BeachParams,
    rng: &mut ChaCha8Rng,
) -> Option<Coord> {
    for _ in 0..params.inland_retries {
        let dx = rng.gen_range(-1i64..=1);
        let dz = rng.gen_range(-1i64..=1);
        if dx == 0 && dz == 0 {
            continue;
        }
        let Some(candidate) = grid.coord(coast_cell.x as i64 + dx, coast_cell.z as i64 + dz) else {
            continue;
        };
        let h = grid.height_at(candidate);
        if h < params.sea_level || h > params.inland_max_height {
            continue;
        }
        let reach = params.inland_distance as i64;
        let projected = grid.coord(
            coast_cell.x as i64 + dx * reach,
            coast_cell.z as i64 + dz * reach,
        );
        if let Some(inland) = projected {
            if is_sand_level(grid, inland, params) {
                return Some(inland);
            }
        }
    }
    None
}
