//! Ridge growth and diffusion shared by mountains and hills
//!
//! A ridge is a directed random walk heading away from the coast. Every
//! `top_interval` steps the walk raises the current cell to a peak and records
//! it as a ridge top; every `turn_interval` steps the heading is re-drawn
//! inside a cone around the away-from-coast direction. Once all ridges exist,
//! their tops are diffused onto surrounding land by inverse-distance blending.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::grid::{Coord, TerrainGrid, LAND_THRESHOLD};
use crate::spatial::{direction_in_cone, distance_to_set, influence_field, Peak};

/// How diffused ridge height combines with the existing terrain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Replace the height only where the blend is higher
    Raise,
    /// Add the blend on top of the existing height
    Accumulate,
}

/// Parameters for a family of ridges (mountain ranges or hill chains)
#[derive(Clone, Debug, PartialEq)]
pub struct RidgeParams {
    /// Number of ridges, drawn uniformly from `min_count..=max_count`
    pub min_count: usize,
    pub max_count: usize,
    /// Walk length, drawn uniformly from `min_length..=max_length`
    pub min_length: usize,
    pub max_length: usize,
    /// Peak height; each top gets `max_height - [0, height_variation)`
    pub max_height: f32,
    pub height_variation: f32,
    /// Radius of influence of each top during diffusion
    pub width: f32,
    /// Opening angle of the heading cone, in degrees
    pub cone_degrees: f32,
    /// Steps between recorded tops
    pub top_interval: usize,
    /// Steps between heading changes
    pub turn_interval: usize,
    pub blend: BlendMode,
    /// Total spread of the random noise added to diffused heights
    pub slope_noise: f32,
    /// The walk stops on cells at or below this height
    pub floor: f32,
    /// Abort a ridge whose top lies closer than `width * ratio` to the coast
    pub min_coast_distance_ratio: Option<f32>,
    /// Restarts allowed when the very first top lands too close to the coast
    pub restart_attempts: usize,
    /// Cells whose diffused height exceeds this are reported as ridge terrain
    pub mark_threshold: f32,
}

impl RidgeParams {
    pub fn mountains() -> Self {
        Self {
            min_count: 9,
            max_count: 12,
            min_length: 300,
            max_length: 500,
            max_height: 50.0,
            height_variation: 10.0,
            width: 50.0,
            cone_degrees: 180.0,
            top_interval: 20,
            turn_interval: 50,
            blend: BlendMode::Raise,
            slope_noise: 0.1,
            floor: 1.0,
            min_coast_distance_ratio: Some(0.5),
            restart_attempts: 10,
            mark_threshold: 2.0,
        }
    }

    pub fn hills() -> Self {
        Self {
            min_count: 10,
            max_count: 15,
            min_length: 50,
            max_length: 100,
            max_height: 40.0,
            height_variation: 10.0,
            width: 150.0,
            cone_degrees: 90.0,
            top_interval: 20,
            turn_interval: 50,
            blend: BlendMode::Accumulate,
            slope_noise: 0.0,
            floor: 0.0,
            min_coast_distance_ratio: None,
            restart_attempts: 0,
            mark_threshold: 2.0,
        }
    }

    pub(crate) fn draw_count(&self, rng: &mut ChaCha8Rng) -> usize {
        rng.gen_range(self.min_count..=self.max_count.max(self.min_count))
    }

    pub(crate) fn draw_length(&self, rng: &mut ChaCha8Rng) -> usize {
        rng.gen_range(self.min_length..=self.max_length.max(self.min_length))
    }
}

/// Why a ridge walk stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RidgeEnd {
    /// All steps taken
    Completed,
    /// The walk reached a cell at or below the floor
    LeftLand,
    /// The walk stepped off the grid
    LeftGrid,
    /// A top was too close to the coast; `first_top` if nothing was recorded
    TooCloseToCoast { first_top: bool },
}

/// Walk one ridge from `start`, recording tops into `tops`.
///
/// Tops recorded before an abort are kept, as are the heights already raised.
#[allow(clippy::too_many_arguments)]
pub fn walk_ridge(
    grid: &mut TerrainGrid,
    start: Coord,
    away_from_coast: (f32, f32),
    length: usize,
    coast: &[Coord],
    params: &RidgeParams,
    rng: &mut ChaCha8Rng,
    tops: &mut Vec<Coord>,
) -> RidgeEnd {
    let (mut px, mut pz) = start.to_f32();
    let mut heading = direction_in_cone(away_from_coast, params.cone_degrees, rng);

    for step in 0..length {
        if step > 0 && params.turn_interval > 0 && step % params.turn_interval == 0 {
            heading = direction_in_cone(away_from_coast, params.cone_degrees, rng);
        }
        px += heading.0;
        pz += heading.1;
        let Some(cell) = grid.coord(px.floor() as i64, pz.floor() as i64) else {
            return RidgeEnd::LeftGrid;
        };
        if grid.height_at(cell) <= params.floor {
            return RidgeEnd::LeftLand;
        }
        if params.top_interval > 0 && step % params.top_interval == 0 {
            let peak = params.max_height - rng.gen::<f32>() * params.height_variation;
            grid.set_height_at(cell, peak);
            if let Some(ratio) = params.min_coast_distance_ratio {
                let too_close = distance_to_set(cell, coast)
                    .map_or(false, |d| d < params.width * ratio);
                if too_close {
                    return RidgeEnd::TooCloseToCoast { first_top: step == 0 };
                }
            }
            tops.push(cell);
        }
    }
    RidgeEnd::Completed
}

/// Diffuse `primary` tops (blended with `secondary` tops where both reach)
/// over land cells. Returns the cells whose diffused height exceeded
/// `mark_threshold`, in row-major order.
pub fn diffuse_tops(
    grid: &mut TerrainGrid,
    primary: &[Coord],
    secondary: &[Coord],
    params: &RidgeParams,
    rng: &mut ChaCha8Rng,
) -> Vec<Coord> {
    let primary: Vec<Peak> = primary.iter().map(|&c| Peak::sample(grid, c)).collect();
    let secondary: Vec<Peak> = secondary.iter().map(|&c| Peak::sample(grid, c)).collect();
    let field = influence_field(grid, &primary, &secondary, params.width, LAND_THRESHOLD);

    let mut marked = Vec::new();
    for (x, z, blend) in field.iter() {
        let Some(blend) = *blend else { continue };
        let noise = if params.slope_noise > 0.0 {
            rng.gen::<f32>() * params.slope_noise - params.slope_noise / 2.0
        } else {
            0.0
        };
        let current = grid.height(x, z);
        match params.blend {
            BlendMode::Raise => {
                let candidate = blend + noise;
                if candidate > current {
                    grid.set_height(x, z, candidate);
                }
            }
            BlendMode::Accumulate => grid.set_height(x, z, current + blend + noise),
        }
        if blend > params.mark_threshold {
            marked.push(Coord::new(x, z));
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn plateau(size: usize, height: f32) -> TerrainGrid {
        let mut grid = TerrainGrid::ocean(size, size);
        for z in 2..size - 2 {
            for x in 2..size - 2 {
                grid.set_height(x, z, height);
            }
        }
        grid
    }

    #[test]
    fn test_walk_records_tops_at_interval() {
        let mut grid = plateau(200, 5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let params = RidgeParams {
            cone_degrees: 0.0,
            min_coast_distance_ratio: None,
            ..RidgeParams::mountains()
        };
        let mut tops = Vec::new();
        let end = walk_ridge(
            &mut grid,
            Coord::new(20, 100),
            (1.0, 0.0),
            101,
            &[],
            &params,
            &mut rng,
            &mut tops,
        );
        assert_eq!(end, RidgeEnd::Completed);
        // Steps 0, 20, 40, 60, 80, 100
        assert_eq!(tops.len(), 6);
        for top in &tops {
            assert_eq!(top.z, 100);
            let h = grid.height_at(*top);
            assert!(h > 40.0 && h <= 50.0);
        }
    }

    #[test]
    fn test_walk_stops_at_water() {
        let mut grid = plateau(60, 5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let params = RidgeParams {
            cone_degrees: 0.0,
            min_coast_distance_ratio: None,
            ..RidgeParams::mountains()
        };
        let mut tops = Vec::new();
        let end = walk_ridge(
            &mut grid,
            Coord::new(30, 30),
            (1.0, 0.0),
            500,
            &[],
            &params,
            &mut rng,
            &mut tops,
        );
        assert_eq!(end, RidgeEnd::LeftLand);
        assert_eq!(tops.len(), 2);
    }

    #[test]
    fn test_walk_aborts_near_coast() {
        let mut grid = plateau(60, 5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let params = RidgeParams {
            cone_degrees: 0.0,
            width: 50.0,
            ..RidgeParams::mountains()
        };
        let coast = [Coord::new(2, 30)];
        let mut tops = Vec::new();
        let end = walk_ridge(
            &mut grid,
            Coord::new(10, 30),
            (1.0, 0.0),
            100,
            &coast,
            &params,
            &mut rng,
            &mut tops,
        );
        assert_eq!(end, RidgeEnd::TooCloseToCoast { first_top: true });
        assert!(tops.is_empty());
    }

    #[test]
    fn test_raise_never_lowers_terrain() {
        let mut grid = plateau(80, 5.0);
        grid.set_height(40, 40, 50.0);
        grid.set_height(45, 40, 60.0);
        let before = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let params = RidgeParams {
            width: 20.0,
            ..RidgeParams::mountains()
        };
        let marked = diffuse_tops(&mut grid, &[Coord::new(40, 40)], &[], &params, &mut rng);

        assert!(!marked.is_empty());
        for (x, z, s) in grid.iter() {
            assert!(s.height >= before.height(x, z));
        }
        // Far cells untouched, near cells lifted
        assert_eq!(grid.height(10, 10), 5.0);
        assert!(grid.height(42, 40) > 5.0);
    }

    #[test]
    fn test_accumulate_adds_blend() {
        let mut grid = plateau(40, 5.0);
        grid.set_height(20, 20, 30.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let params = RidgeParams {
            width: 10.0,
            ..RidgeParams::hills()
        };
        diffuse_tops(&mut grid, &[Coord::new(20, 20)], &[], &params, &mut rng);
        // Distance 5 from a 30-high top with radius 10 blends to 15
        assert!((grid.height(25, 20) - 20.0).abs() < 1e-4);
        assert_eq!(grid.height(20, 20), 60.0);
        assert_eq!(grid.height(0, 0), 0.0);
    }
}
