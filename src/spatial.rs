//! Spatial queries shared by several agents
//!
//! Nearest-point search over coordinate sets, inverse-distance height blending
//! around peaks, and random direction helpers for directed walks.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::grid::{Coord, TerrainGrid};
use crate::tilemap::Tilemap;

/// A point of elevation influence (ridge top, hill top, volcano).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub pos: Coord,
    pub height: f32,
}

impl Peak {
    /// Capture the current grid height at `pos`.
    pub fn sample(grid: &TerrainGrid, pos: Coord) -> Self {
        Self {
            pos,
            height: grid.height_at(pos),
        }
    }
}

/// Euclidean-nearest member of `set`, or `None` if the set is empty.
/// Ties resolve to the earliest member.
pub fn nearest_in_set(point: Coord, set: &[Coord]) -> Option<Coord> {
    let mut best: Option<(Coord, f32)> = None;
    for &candidate in set {
        let d = point.distance_sq(candidate);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((candidate, d)),
        }
    }
    best.map(|(c, _)| c)
}

/// Distance from `point` to the nearest member of `set`.
pub fn distance_to_set(point: Coord, set: &[Coord]) -> Option<f32> {
    nearest_in_set(point, set).map(|c| point.distance(c))
}

/// Blend peak heights at `point` by inverse-distance weighting.
///
/// Every peak strictly closer than `max_radius` contributes
/// `peak - distance * peak / max_radius` with weight `max_radius - distance`;
/// weights are normalized to sum to 1. Returns 0 when no peak is in range.
pub fn inverse_distance_blend(point: Coord, peaks: &[Peak], max_radius: f32) -> f32 {
    let mut weighted = 0.0f32;
    let mut weight_sum = 0.0f32;
    for peak in peaks {
        let d = point.distance(peak.pos);
        if d >= max_radius {
            continue;
        }
        let w = max_radius - d;
        weighted += w * (peak.height - d * peak.height / max_radius);
        weight_sum += w;
    }
    if weight_sum > 0.0 {
        weighted / weight_sum
    } else {
        0.0
    }
}

/// Peaks sorted by row so each grid row only scans peaks within reach.
struct RowIndex<'a> {
    peaks: Vec<&'a Peak>,
}

impl<'a> RowIndex<'a> {
    fn new(peaks: &'a [Peak]) -> Self {
        let mut sorted: Vec<&Peak> = peaks.iter().collect();
        sorted.sort_by_key(|p| p.pos.z);
        Self { peaks: sorted }
    }

    /// Peaks whose row lies strictly within `radius` of `z`.
    fn near_row(&self, z: usize, radius: f32) -> &[&'a Peak] {
        let lo = self
            .peaks
            .partition_point(|p| (p.pos.z as f32) <= z as f32 - radius);
        let hi = self
            .peaks
            .partition_point(|p| (p.pos.z as f32) < z as f32 + radius);
        &self.peaks[lo..hi.max(lo)]
    }
}

/// Compute the blended influence of `primary` (and optionally `secondary`)
/// peaks for every cell at or above `land_threshold`.
///
/// A cell only receives a value when at least one primary peak is within
/// `radius`; secondary peaks then join the same normalized blend. Cells with
/// no value are `None`. Rows are evaluated in parallel; the result does not
/// depend on thread scheduling.
pub fn influence_field(
    grid: &TerrainGrid,
    primary: &[Peak],
    secondary: &[Peak],
    radius: f32,
    land_threshold: f32,
) -> Tilemap<Option<f32>> {
    let width = grid.width;
    let depth = grid.depth;
    let primary_rows = RowIndex::new(primary);
    let secondary_rows = RowIndex::new(secondary);

    let rows: Vec<Vec<Option<f32>>> = (0..depth)
        .into_par_iter()
        .map(|z| {
            let near_primary = primary_rows.near_row(z, radius);
            let near_secondary = secondary_rows.near_row(z, radius);
            let mut row = vec![None; width];
            if near_primary.is_empty() {
                return row;
            }
            let mut in_range: Vec<Peak> = Vec::new();
            for (x, slot) in row.iter_mut().enumerate() {
                if grid.height(x, z) < land_threshold {
                    continue;
                }
                let here = Coord::new(x, z);
                in_range.clear();
                in_range.extend(
                    near_primary
                        .iter()
                        .filter(|p| here.distance(p.pos) < radius)
                        .map(|p| **p),
                );
                if in_range.is_empty() {
                    continue;
                }
                in_range.extend(
                    near_secondary
                        .iter()
                        .filter(|p| here.distance(p.pos) < radius)
                        .map(|p| **p),
                );
                *slot = Some(inverse_distance_blend(here, &in_range, radius));
            }
            row
        })
        .collect();

    Tilemap::from_vec(width, depth, rows.into_iter().flatten().collect())
}

/// A random unit vector with uniformly drawn components (never zero).
pub fn random_unit_vector(rng: &mut ChaCha8Rng) -> (f32, f32) {
    loop {
        let x: f32 = rng.gen::<f32>() * 2.0 - 1.0;
        let z: f32 = rng.gen::<f32>() * 2.0 - 1.0;
        let len = (x * x + z * z).sqrt();
        if len > 1e-6 {
            return (x / len, z / len);
        }
    }
}

/// Normalize a vector, falling back to a random direction for a zero vector.
pub fn normalize_or_random(v: (f32, f32), rng: &mut ChaCha8Rng) -> (f32, f32) {
    let len = (v.0 * v.0 + v.1 * v.1).sqrt();
    if len > 1e-6 {
        (v.0 / len, v.1 / len)
    } else {
        random_unit_vector(rng)
    }
}

/// A unit vector within `cone_degrees` (total opening angle) of `direction`.
pub fn direction_in_cone(
    direction: (f32, f32),
    cone_degrees: f32,
    rng: &mut ChaCha8Rng,
) -> (f32, f32) {
    let base = direction.1.atan2(direction.0);
    let cone = cone_degrees.to_radians();
    let angle = base + rng.gen::<f32>() * cone - cone / 2.0;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_nearest_in_set() {
        let set = vec![Coord::new(10, 10), Coord::new(2, 3), Coord::new(5, 5)];
        assert_eq!(nearest_in_set(Coord::new(0, 0), &set), Some(Coord::new(2, 3)));
        assert_eq!(nearest_in_set(Coord::new(9, 9), &set), Some(Coord::new(10, 10)));
        assert_eq!(nearest_in_set(Coord::new(0, 0), &[]), None);
        assert_eq!(distance_to_set(Coord::new(5, 1), &set), Some(3.0));
    }

    #[test]
    fn test_blend_single_peak_is_linear_falloff() {
        let peaks = [Peak { pos: Coord::new(0, 0), height: 10.0 }];
        assert_eq!(inverse_distance_blend(Coord::new(0, 0), &peaks, 10.0), 10.0);
        let h = inverse_distance_blend(Coord::new(5, 0), &peaks, 10.0);
        assert!((h - 5.0).abs() < 1e-5);
        // Hard cutoff at the radius
        assert_eq!(inverse_distance_blend(Coord::new(10, 0), &peaks, 10.0), 0.0);
    }

    #[test]
    fn test_blend_weights_normalized() {
        let peaks = [
            Peak { pos: Coord::new(0, 0), height: 10.0 },
            Peak { pos: Coord::new(4, 0), height: 10.0 },
        ];
        // Midpoint: both at distance 2, each contributes 8 with equal weight
        let h = inverse_distance_blend(Coord::new(2, 0), &peaks, 10.0);
        assert!((h - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_influence_field_matches_direct_blend() {
        let mut grid = TerrainGrid::ocean(20, 20);
        for z in 0..20 {
            for x in 0..20 {
                if x > 2 {
                    grid.set_height(x, z, 3.0);
                }
            }
        }
        let primary = [Peak { pos: Coord::new(10, 10), height: 30.0 }];
        let secondary = [Peak { pos: Coord::new(14, 10), height: 40.0 }];
        let field = influence_field(&grid, &primary, &secondary, 6.0, 1.0);

        // Ocean cells never receive influence
        assert_eq!(*field.get(0, 10), None);
        // Out of primary range: no value even if a secondary peak is near
        assert_eq!(*field.get(18, 10), None);

        let here = Coord::new(12, 10);
        let expected = inverse_distance_blend(here, &[primary[0], secondary[0]], 6.0);
        assert_eq!(*field.get(12, 10), Some(expected));
    }

    #[test]
    fn test_direction_in_cone_stays_in_cone() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let (x, z) = direction_in_cone((1.0, 0.0), 90.0, &mut rng);
            assert!((x * x + z * z - 1.0).abs() < 1e-4);
            // Within 45 degrees of +x
            assert!(x >= std::f32::consts::FRAC_1_SQRT_2 - 1e-4);
        }
    }

    #[test]
    fn test_random_unit_vector_is_normalized() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (x, z) = random_unit_vector(&mut rng);
        assert!((x * x + z * z - 1.0).abs() < 1e-4);
    }
}
