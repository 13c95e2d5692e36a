//! Lava rivers
//!
//! Each river starts just outside the lowest point of a volcano's rim and
//! follows the steepest descent, allowing short uphill excursions on land.
//! A corridor around the path is roughened and painted lava-coloured.

use std::collections::HashSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use super::volcano::Volcano;
use crate::grid::{Coord, Rgb, TerrainGrid, SEA_LEVEL};

/// Parameters for the lava agent
#[derive(Clone, Debug, PartialEq)]
pub struct LavaParams {
    /// Number of rivers; each consumes one volcano
    pub rivers: usize,
    /// Distance beyond the caldera radius where the rim is searched
    pub rim_offset: usize,
    /// Safety bound on path length
    pub max_steps: usize,
    /// Largest uphill step allowed while still on land
    pub max_rise: f32,
    /// Half-extent of the square painted around each path cell
    pub corridor: usize,
    /// Upper bound of the height noise added inside the corridor
    pub noise_ratio: f32,
    pub color: Rgb,
}

impl Default for LavaParams {
    fn default() -> Self {
        Self {
            rivers: 2,
            rim_offset: 5,
            max_steps: 1000,
            max_rise: 2.0,
            corridor: 3,
            noise_ratio: 1.0,
            color: Rgb::LAVA,
        }
    }
}

/// One carved lava river
#[derive(Clone, Debug, PartialEq)]
pub struct LavaFlow {
    pub volcano: Volcano,
    pub path: Vec<Coord>,
}

/// Carve up to `params.rivers` lava rivers, consuming volcanoes from
/// `volcanoes`. A volcano without any land on its rim yields no river.
pub fn generate_lava(
    grid: &mut TerrainGrid,
    volcanoes: &mut Vec<Volcano>,
    params: &LavaParams,
    rng: &mut ChaCha8Rng,
) -> Vec<LavaFlow> {
    let mut flows = Vec::new();
    let mut painted: HashSet<Coord> = HashSet::new();

    for _ in 0..params.rivers {
        if volcanoes.is_empty() {
            break;
        }
        let volcano = volcanoes.remove(rng.gen_range(0..volcanoes.len()));
        let Some(rim) = lowest_rim_cell(grid, &volcano, params) else {
            warn!(center = ?volcano.center, "volcano rim has no land, skipping lava river");
            continue;
        };
        let start = step_outward(grid, volcano.center, rim);
        let path = descend(grid, start, params);
        for &cell in &path {
            paint_corridor(grid, cell, params, &mut painted, rng);
        }
        debug!(center = ?volcano.center, length = path.len(), "lava river carved");
        flows.push(LavaFlow { volcano, path });
    }
    flows
}

/// Lowest land cell on the ring whose distance to the centre rounds to
/// `floor(caldera_radius) + rim_offset`.
fn lowest_rim_cell(grid: &TerrainGrid, volcano: &Volcano, params: &LavaParams) -> Option<Coord> {
    let ring = volcano.caldera_radius.max(0.0).floor() as i64 + params.rim_offset as i64;
    let (cx, cz) = (volcano.center.x as i64, volcano.center.z as i64);
    let mut lowest: Option<(Coord, f32)> = None;
    for z in cz - ring - 1..=cz + ring + 1 {
        for x in cx - ring - 1..=cx + ring + 1 {
            let Some(cell) = grid.coord(x, z) else { continue };
            let h = grid.height_at(cell);
            if !grid.is_land(cell) || cell.distance(volcano.center).round() as i64 != ring {
                continue;
            }
            match lowest {
                Some((_, low)) if low <= h => {}
                _ => lowest = Some((cell, h)),
            }
        }
    }
    lowest.map(|(c, _)| c)
}

/// One unit step from `rim` away from `center`, staying on the grid.
fn step_outward(grid: &TerrainGrid, center: Coord, rim: Coord) -> Coord {
    let dx = rim.x as f32 - center.x as f32;
    let dz = rim.z as f32 - center.z as f32;
    let len = (dx * dx + dz * dz).sqrt();
    if len == 0.0 {
        return rim;
    }
    let x = (rim.x as f32 + dx / len).round() as i64;
    let z = (rim.z as f32 + dz / len).round() as i64;
    grid.coord(x, z).unwrap_or(rim)
}

/// Follow the lowest 8-neighbour downhill from `start`.
fn descend(grid: &TerrainGrid, start: Coord, params: &LavaParams) -> Vec<Coord> {
    let mut path = vec![start];
    let mut current = start;
    for _ in 0..params.max_steps {
        let Some(next) = lowest_neighbor(grid, current) else { break };
        let here = grid.height_at(current);
        let there = grid.height_at(next);
        let downhill = there < here;
        let small_rise = there <= here + params.max_rise && there > SEA_LEVEL;
        if !(downhill || small_rise) {
            break;
        }
        path.push(next);
        current = next;
    }
    path
}

fn lowest_neighbor(grid: &TerrainGrid, c: Coord) -> Option<Coord> {
    let mut lowest: Option<(Coord, f32)> = None;
    for (x, z) in grid.neighbors_8(c.x, c.z) {
        let h = grid.height(x, z);
        match lowest {
            Some((_, low)) if low <= h => {}
            _ => lowest = Some((Coord::new(x, z), h)),
        }
    }
    lowest.map(|(c, _)| c)
}

fn paint_corridor(
    grid: &mut TerrainGrid,
    center: Coord,
    params: &LavaParams,
    painted: &mut HashSet<Coord>,
    rng: &mut ChaCha8Rng,
) {
    let half = params.corridor as i64;
    for z in center.z as i64 - half..=center.z as i64 + half {
        for x in center.x as i64 - half..=center.x as i64 + half {
            let Some(cell) = grid.coord(x, z) else { continue };
            if !painted.insert(cell) {
                continue;
            }
            let sample = grid.get_mut(cell.x, cell.z);
            sample.height += rng.gen::<f32>() * params.noise_ratio;
            sample.color = Some(params.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// A cone falling away from (50, 50) to sea level at distance 45.
    fn slope_grid() -> TerrainGrid {
        let mut grid = TerrainGrid::ocean(101, 101);
        let center = Coord::new(50, 50);
        for z in 0..101 {
            for x in 0..101 {
                let d = Coord::new(x, z).distance(center);
                grid.set_height(x, z, (45.0 - d).max(0.0));
            }
        }
        grid
    }

    fn volcano() -> Volcano {
        Volcano {
            center: Coord::new(50, 50),
            caldera_radius: 5.0,
            peak_height: 45.0,
        }
    }

    #[test]
    fn test_lava_path_descends_from_rim() {
        let mut grid = slope_grid();
        let terrain = grid.clone();
        let mut volcanoes = vec![volcano()];
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let params = LavaParams {
            rivers: 1,
            ..LavaParams::default()
        };
        let flows = generate_lava(&mut grid, &mut volcanoes, &params, &mut rng);

        assert_eq!(flows.len(), 1);
        assert!(volcanoes.is_empty());
        let path = &flows[0].path;
        assert!(path.len() > 1);
        assert!(path.len() <= params.max_steps + 1);

        let start_distance = path[0].distance(Coord::new(50, 50));
        assert!(start_distance >= 10.0, "river starts inside the rim at {:?}", path[0]);

        for pair in path.windows(2) {
            let (a, b) = (terrain.height_at(pair[0]), terrain.height_at(pair[1]));
            assert!(b <= a + 2.0, "climb from {} to {}", a, b);
        }
        let last = *path.last().unwrap();
        assert_eq!(terrain.height_at(last), 0.0);

        for cell in path {
            assert_eq!(grid.get(cell.x, cell.z).color, Some(Rgb::LAVA));
        }
    }

    #[test]
    fn test_corridor_noise_is_applied_once() {
        let mut grid = TerrainGrid::ocean(20, 20);
        let mut painted = HashSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let params = LavaParams::default();
        paint_corridor(&mut grid, Coord::new(10, 10), &params, &mut painted, &mut rng);
        let first = grid.clone();
        paint_corridor(&mut grid, Coord::new(10, 10), &params, &mut painted, &mut rng);
        assert_eq!(grid, first);
        assert_eq!(painted.len(), 49);
        assert_eq!(grid.get(0, 0).color, None);
        assert_eq!(grid.get(7, 13).color, Some(Rgb::LAVA));
    }

    #[test]
    fn test_volcano_without_rim_land_is_skipped() {
        let mut grid = TerrainGrid::ocean(40, 40);
        grid.set_height(20, 20, 30.0);
        let mut volcanoes = vec![Volcano {
            center: Coord::new(20, 20),
            caldera_radius: 5.0,
            peak_height: 30.0,
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let flows = generate_lava(&mut grid, &mut volcanoes, &LavaParams::default(), &mut rng);
        assert!(flows.is_empty());
        assert!(volcanoes.is_empty());
        assert_eq!(grid.height(20, 20), 30.0);
    }
}
