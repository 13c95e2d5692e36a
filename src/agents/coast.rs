//! Coastline growth
//!
//! Grows a single landmass outward from the grid centre. A budget of tokens is
//! split in halves between child agents until each agent holds fewer tokens
//! than the split limit; each leaf agent then spends its tokens promoting sea
//! cells next to the coast into land. Candidates are ranked by a potential
//! that pulls towards an attractor, pushes away from a repellor and strongly
//! favours cells far from the map edge.
//!
//! The split tree is processed from an explicit work list rather than by
//! recursion, so large budgets cannot exhaust the call stack.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::coast_set::CoastSet;
use crate::grid::{Coord, TerrainGrid, SEA_LEVEL};
use crate::spatial::random_unit_vector;

/// Budgets are divided until they drop below `tokens / SPLIT_DIVISOR`.
const SPLIT_DIVISOR: usize = 4096;

/// Lower bound for the derived split limit, so small grids still grow.
const MIN_SPLIT_LIMIT: usize = 16;

/// Parameters for coastline growth
#[derive(Clone, Debug, PartialEq)]
pub struct CoastParams {
    /// Total number of cells the landmass may gain
    pub tokens: usize,
    /// Margin at the map edge that stays ocean
    pub border_size: usize,
    /// Half-extent of the square an agent may work in
    pub radius: usize,
    /// Height given to every newly created land cell
    pub start_height: f32,
    /// Explicit split limit; derived from `tokens` when `None`
    pub split_limit: Option<usize>,
    /// Random straight walks tried by an agent that is not on the coast
    pub walk_attempts: usize,
    /// Repellor and attractor are placed within this offset of the agent
    pub pole_offset: i64,
}

impl CoastParams {
    /// Defaults for a grid of `width x depth` samples.
    pub fn for_grid(width: usize, depth: usize) -> Self {
        Self {
            tokens: width * depth / 3,
            border_size: 20,
            radius: 30,
            start_height: 3.0,
            split_limit: None,
            walk_attempts: 5,
            pole_offset: 10,
        }
    }

    /// Agents holding at least this many tokens split in two.
    pub fn split_limit(&self) -> usize {
        self.split_limit
            .unwrap_or((self.tokens / SPLIT_DIVISOR).max(MIN_SPLIT_LIMIT))
            .max(1)
    }
}

impl Default for CoastParams {
    fn default() -> Self {
        Self::for_grid(1025, 1025)
    }
}

/// Result of coastline growth
#[derive(Clone, Debug)]
pub struct CoastOutput {
    /// Land cells adjacent to open sea
    pub coast: CoastSet,
    /// Cells promoted from sea to land
    pub promoted: usize,
    /// Leaf agents that gave up because they could not reach the coast
    pub abandoned: usize,
}

/// One pending agent on the work list.
struct Task {
    /// Where the agent sits, or where its parent sat if `spawned`
    origin: Coord,
    tokens: usize,
    /// Child agents pick their own start near `origin` when popped
    spawned: bool,
}

/// Grow the landmass. The seed cell is placed at the grid centre.
pub fn generate_coast(
    grid: &mut TerrainGrid,
    params: &CoastParams,
    rng: &mut ChaCha8Rng,
) -> CoastOutput {
    let center = Coord::new(grid.width / 2, grid.depth / 2);
    grid.set_height_at(center, params.start_height);

    let mut coast = CoastSet::new();
    coast.insert(center);

    let limit = params.split_limit();
    let mut promoted = 0;
    let mut abandoned = 0;
    let mut agents = 0;

    let mut work = vec![Task {
        origin: center,
        tokens: params.tokens,
        spawned: false,
    }];

    while let Some(task) = work.pop() {
        let position = if task.spawned {
            match pick_start(&coast, task.origin, params.radius, rng) {
                Some(p) => p,
                None => continue,
            }
        } else {
            task.origin
        };

        if task.tokens >= limit {
            for _ in 0..2 {
                work.push(Task {
                    origin: position,
                    tokens: task.tokens / 2,
                    spawned: true,
                });
            }
            continue;
        }

        agents += 1;
        match grow(grid, &mut coast, position, task.tokens, params, rng) {
            Some(n) => promoted += n,
            None => abandoned += 1,
        }
    }

    coast.retain(|c| is_coastal(grid, c, params.border_size));

    debug!(
        agents,
        promoted,
        abandoned,
        coast_cells = coast.len(),
        "coastline grown"
    );

    CoastOutput {
        coast,
        promoted,
        abandoned,
    }
}

/// Whether `c` is land (height >= 1) with at least one sea cell (height == 0)
/// among its 3x3 neighborhood inside the border margin.
pub fn is_coastal(grid: &TerrainGrid, c: Coord, border: usize) -> bool {
    if !grid.is_land(c) {
        return false;
    }
    for dz in -1i64..=1 {
        for dx in -1i64..=1 {
            let x = c.x as i64 + dx;
            let z = c.z as i64 + dz;
            if !inside_border(grid, x, z, border) {
                continue;
            }
            if grid.is_ocean(Coord::new(x as usize, z as usize)) {
                return true;
            }
        }
    }
    false
}

fn inside_border(grid: &TerrainGrid, x: i64, z: i64, border: usize) -> bool {
    let b = border as i64;
    x >= b && z >= b && x < grid.width as i64 - b && z < grid.depth as i64 - b
}

/// Coastal cells strictly inside the square of half-extent `radius` around
/// `center`, in row-major order.
fn coast_in_radius(coast: &CoastSet, center: Coord, radius: usize) -> Vec<Coord> {
    let r = radius as i64 - 1;
    let mut found = Vec::new();
    for z in (center.z as i64 - r)..=(center.z as i64 + r) {
        for x in (center.x as i64 - r)..=(center.x as i64 + r) {
            if x < 0 || z < 0 {
                continue;
            }
            let c = Coord::new(x as usize, z as usize);
            if coast.contains(c) {
                found.push(c);
            }
        }
    }
    found
}

/// Start position for a child agent: a coastal cell near its parent, or any
/// coastal cell if none is near.
fn pick_start(
    coast: &CoastSet,
    origin: Coord,
    radius: usize,
    rng: &mut ChaCha8Rng,
) -> Option<Coord> {
    let nearby = coast_in_radius(coast, origin, radius);
    if nearby.is_empty() {
        coast.choose(rng)
    } else {
        Some(nearby[rng.gen_range(0..nearby.len())])
    }
}

/// Spend `tokens` promoting sea cells around `agent`. Returns the number of
/// promoted cells, or `None` if the agent never reached the coast.
fn grow(
    grid: &mut TerrainGrid,
    coast: &mut CoastSet,
    agent: Coord,
    tokens: usize,
    params: &CoastParams,
    rng: &mut ChaCha8Rng,
) -> Option<usize> {
    let border = params.border_size;
    let agent = if is_coastal(grid, agent, border) {
        agent
    } else {
        walk_to_coast(grid, agent, params, rng)?
    };

    let (repellor, attractor) = place_poles(agent, params.pole_offset, rng);
    let mut in_radius = coast_in_radius(coast, agent, params.radius);
    let mut promoted = 0;

    for _ in 0..tokens {
        // Lazily drop entries that stopped being coastal
        let vertex = loop {
            if in_radius.is_empty() {
                break None;
            }
            let i = rng.gen_range(0..in_radius.len());
            let v = in_radius[i];
            if is_coastal(grid, v, border) {
                break Some(v);
            }
            in_radius.swap_remove(i);
            coast.remove(v);
        };
        let Some(vertex) = vertex else { break };

        match best_candidate(grid, vertex, repellor, attractor, border) {
            Some(cell) => {
                grid.set_height_at(cell, params.start_height);
                coast.insert(cell);
                in_radius.push(cell);
                promoted += 1;
            }
            None => {
                in_radius.retain(|&c| c != vertex);
            }
        }
    }

    Some(promoted)
}

/// Repellor and attractor around the agent, in opposite quadrants.
fn place_poles(agent: Coord, offset: i64, rng: &mut ChaCha8Rng) -> ((f32, f32), (f32, f32)) {
    let rx = rng.gen_range(-offset..=offset);
    let rz = rng.gen_range(-offset..=offset);
    let mut ax = rng.gen_range(-offset..=offset);
    let mut az = rng.gen_range(-offset..=offset);
    if (ax >= 0) == (rx >= 0) {
        ax = -ax;
    }
    if (az >= 0) == (rz >= 0) {
        az = -az;
    }
    let (x, z) = agent.to_f32();
    (
        (x + rx as f32, z + rz as f32),
        (x + ax as f32, z + az as f32),
    )
}

/// Growth potential of a cell.
fn score(
    grid: &TerrainGrid,
    x: usize,
    z: usize,
    repellor: (f32, f32),
    attractor: (f32, f32),
) -> f32 {
    let (fx, fz) = (x as f32, z as f32);
    let to_repellor = (repellor.0 - fx).powi(2) + (repellor.1 - fz).powi(2);
    let to_attractor = (attractor.0 - fx).powi(2) + (attractor.1 - fz).powi(2);
    let edge = x.min(grid.width - x).min(z).min(grid.depth - z) as f32;
    to_repellor - to_attractor + 3.0 * edge * edge
}

/// Highest-scoring sea cell in the 3x3 neighborhood of `vertex`.
fn best_candidate(
    grid: &TerrainGrid,
    vertex: Coord,
    repellor: (f32, f32),
    attractor: (f32, f32),
    border: usize,
) -> Option<Coord> {
    let mut best: Option<(Coord, f32)> = None;
    for dz in -1i64..=1 {
        for dx in -1i64..=1 {
            let x = vertex.x as i64 + dx;
            let z = vertex.z as i64 + dz;
            if !inside_border(grid, x, z, border) {
                continue;
            }
            let (x, z) = (x as usize, z as usize);
            if grid.height(x, z) > SEA_LEVEL {
                continue;
            }
            let s = score(grid, x, z, repellor, attractor);
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((Coord::new(x, z), s));
            }
        }
    }
    best.map(|(c, _)| c)
}

/// Try a few straight walks in random directions until one hits the coast.
fn walk_to_coast(
    grid: &TerrainGrid,
    from: Coord,
    params: &CoastParams,
    rng: &mut ChaCha8Rng,
) -> Option<Coord> {
    for _ in 0..params.walk_attempts {
        let direction = random_unit_vector(rng);
        if let Some(hit) = walk(grid, from, direction, params.border_size) {
            return Some(hit);
        }
    }
    None
}

fn walk(grid: &TerrainGrid, from: Coord, direction: (f32, f32), border: usize) -> Option<Coord> {
    let (mut fx, mut fz) = from.to_f32();
    let (mut x, mut z) = (from.x as i64, from.z as i64);
    for _ in 0..grid.width.max(grid.depth) {
        let Some(c) = grid.coord(x, z) else { break };
        if is_coastal(grid, c, border) {
            return Some(c);
        }
        fx += direction.0;
        fz += direction.1;
        x = fx.round() as i64;
        z = fz.round() as i64;
    }
    None
}
