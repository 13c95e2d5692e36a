//! Volcanoes
//!
//! Converts mountain tops into volcanic cones with a collapsed caldera. The
//! cone profile blends into surrounding mountains so volcanoes sit naturally
//! inside a range.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::grid::{Coord, TerrainGrid};
use crate::spatial::{inverse_distance_blend, Peak};

/// Parameters for the volcano agent
#[derive(Clone, Debug, PartialEq)]
pub struct VolcanoParams {
    /// Number of volcanoes; limited by the available mountain tops
    pub count: usize,
    /// Mean caldera radius
    pub caldera_width: f32,
    /// Total spread of the caldera radius
    pub caldera_width_range: f32,
    /// Mean peak height
    pub height: f32,
    /// Total spread of the peak height
    pub height_range: f32,
    /// Radius of the cone
    pub width: f32,
    /// Total spread of the slope noise
    pub noise: f32,
    /// Height the caldera collapses to
    pub caldera_floor: f32,
}

impl Default for VolcanoParams {
    fn default() -> Self {
        Self {
            count: 3,
            caldera_width: 5.0,
            caldera_width_range: 2.0,
            height: 70.0,
            height_range: 10.0,
            width: 50.0,
            noise: 0.2,
            caldera_floor: 2.0,
        }
    }
}

/// A placed volcano, consumed by at most one lava river
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volcano {
    pub center: Coord,
    pub caldera_radius: f32,
    pub peak_height: f32,
}

/// Place up to `params.count` volcanoes on `mountain_tops`.
///
/// Every chosen top is removed from `mountain_tops`; the remaining tops shape
/// the flanks of each cone.
pub fn generate_volcanoes(
    grid: &mut TerrainGrid,
    mountain_tops: &mut Vec<Coord>,
    params: &VolcanoParams,
    rng: &mut ChaCha8Rng,
) -> Vec<Volcano> {
    let mut volcanoes = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        if mountain_tops.is_empty() {
            debug!(placed = volcanoes.len(), "out of mountain tops");
            break;
        }
        let center = mountain_tops[rng.gen_range(0..mountain_tops.len())];
        mountain_tops.retain(|&t| t != center);

        let peak_height = spread(params.height, params.height_range, rng);
        let caldera_radius = spread(params.caldera_width, params.caldera_width_range, rng);
        grid.set_height_at(center, peak_height);

        let volcano = Volcano {
            center,
            caldera_radius,
            peak_height,
        };
        shape_cone(grid, &volcano, mountain_tops, params, rng);
        volcanoes.push(volcano);
    }
    debug!(volcanoes = volcanoes.len(), "volcanoes placed");
    volcanoes
}

/// `mean` plus a uniform offset in `[-range/2, range/2)`.
fn spread(mean: f32, range: f32, rng: &mut ChaCha8Rng) -> f32 {
    mean + rng.gen::<f32>() * range - range / 2.0
}

fn shape_cone(
    grid: &mut TerrainGrid,
    volcano: &Volcano,
    mountain_tops: &[Coord],
    params: &VolcanoParams,
    rng: &mut ChaCha8Rng,
) {
    let w = params.width;
    let slope = volcano.peak_height / w;
    let reach = w.ceil() as i64;
    let tops: Vec<Peak> = mountain_tops
        .iter()
        .filter(|t| t.distance(volcano.center) < 2.0 * w)
        .map(|&t| Peak::sample(grid, t))
        .collect();

    let (cx, cz) = (volcano.center.x as i64, volcano.center.z as i64);
    for z in cz - reach..=cz + reach {
        for x in cx - reach..=cx + reach {
            let Some(cell) = grid.coord(x, z) else { continue };
            if grid.is_ocean(cell) {
                continue;
            }
            let current = grid.height_at(cell);
            let d = cell.distance(volcano.center);
            if d > w {
                continue;
            }
            if d < volcano.caldera_radius {
                grid.set_height_at(cell, params.caldera_floor);
                continue;
            }
            let mountains = inverse_distance_blend(cell, &tops, w);
            let cone = volcano.peak_height - slope * d;
            let noise = rng.gen::<f32>() * params.noise - params.noise / 2.0;
            let candidate = (mountains * d + cone * (w - d)) / w + noise;
            if candidate > current {
                grid.set_height_at(cell, candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn plateau(size: usize) -> TerrainGrid {
        let mut grid = TerrainGrid::ocean(size, size);
        for z in 10..size - 10 {
            for x in 10..size - 10 {
                grid.set_height(x, z, 5.0);
            }
        }
        grid
    }

    fn fixed_params() -> VolcanoParams {
        VolcanoParams {
            count: 1,
            caldera_width: 5.0,
            caldera_width_range: 0.0,
            height: 70.0,
            height_range: 0.0,
            width: 20.0,
            ..VolcanoParams::default()
        }
    }

    #[test]
    fn test_volcano_cone_and_caldera() {
        let mut grid = plateau(100);
        let mut tops = vec![Coord::new(50, 50)];
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let volcanoes = generate_volcanoes(&mut grid, &mut tops, &fixed_params(), &mut rng);

        assert_eq!(volcanoes.len(), 1);
        assert!(tops.is_empty());
        let v = volcanoes[0];
        assert_eq!(v.center, Coord::new(50, 50));
        assert_eq!(v.caldera_radius, 5.0);

        // Collapsed crater
        assert_eq!(grid.height(50, 50), 2.0);
        assert_eq!(grid.height(53, 50), 2.0);
        // Cone flank at distance 10: (70 - 3.5 * 10) * 10 / 20 = 17.5
        assert!((grid.height(60, 50) - 17.5).abs() <= 0.1);
        // Outside the cone
        assert_eq!(grid.height(75, 50), 5.0);
    }

    #[test]
    fn test_volcanoes_limited_by_tops() {
        let mut grid = plateau(120);
        let mut tops = vec![Coord::new(40, 40), Coord::new(80, 80)];
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let params = VolcanoParams {
            count: 5,
            ..fixed_params()
        };
        let volcanoes = generate_volcanoes(&mut grid, &mut tops, &params, &mut rng);
        assert_eq!(volcanoes.len(), 2);
        assert!(tops.is_empty());
        assert_ne!(volcanoes[0].center, volcanoes[1].center);
    }

    #[test]
    fn test_volcano_leaves_sea_alone() {
        let mut grid = plateau(60);
        let mut tops = vec![Coord::new(15, 30)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        generate_volcanoes(&mut grid, &mut tops, &fixed_params(), &mut rng);
        for x in 0..10 {
            assert_eq!(grid.height(x, 30), 0.0);
        }
        assert!(grid.height(20, 30) > 5.0);
    }
}
