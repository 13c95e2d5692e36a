//! Terrain samples and the shared grid every agent reads and writes.
//!
//! Height 0 is open ocean; anything above 0 is land. Several agents use a
//! practical land threshold of 1 instead ([`LAND_THRESHOLD`]).

use std::collections::BTreeMap;

use crate::tilemap::{Direction, Tilemap};

/// Height at and below which a cell counts as open sea for coastline tests.
pub const SEA_LEVEL: f32 = 0.0;

/// Height below which most agents treat a cell as underwater.
pub const LAND_THRESHOLD: f32 = 1.0;

/// An explicit RGB override for a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Colour painted over lava corridors.
    pub const LAVA: Rgb = Rgb([255, 153, 0]);
}

/// One grid point: its elevation plus an optional colour override.
///
/// `color == None` means the renderer derives the colour from the height
/// gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    pub height: f32,
    pub color: Option<Rgb>,
}

impl Sample {
    pub fn at_height(height: f32) -> Self {
        Self { height, color: None }
    }
}

/// Integer grid coordinate (column `x`, row `z`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: usize,
    pub z: usize,
}

impl Coord {
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Euclidean distance between two coordinates.
    pub fn distance(&self, other: Coord) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn distance_sq(&self, other: Coord) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dz = self.z as f32 - other.z as f32;
        dx * dx + dz * dz
    }

    /// Position as floats, for walks that accumulate fractional steps.
    pub fn to_f32(self) -> (f32, f32) {
        (self.x as f32, self.z as f32)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, z): (usize, usize)) -> Self {
        Coord { x, z }
    }
}

/// The shared terrain grid.
pub type TerrainGrid = Tilemap<Sample>;

impl Tilemap<Sample> {
    /// A flat ocean grid of `width x depth` samples.
    pub fn ocean(width: usize, depth: usize) -> Self {
        Tilemap::new_with(width, depth, Sample::default())
    }

    pub fn height(&self, x: usize, z: usize) -> f32 {
        self.get(x, z).height
    }

    pub fn height_at(&self, c: Coord) -> f32 {
        self.get(c.x, c.z).height
    }

    pub fn set_height(&mut self, x: usize, z: usize, height: f32) {
        self.get_mut(x, z).height = height;
    }

    pub fn set_height_at(&mut self, c: Coord, height: f32) {
        self.get_mut(c.x, c.z).height = height;
    }

    /// Signed-coordinate variant of [`Tilemap::checked`] returning a [`Coord`].
    pub fn coord(&self, x: i64, z: i64) -> Option<Coord> {
        self.checked(x, z).map(Coord::from)
    }

    /// Whether the cell is above [`LAND_THRESHOLD`].
    pub fn is_land(&self, c: Coord) -> bool {
        self.height_at(c) >= LAND_THRESHOLD
    }

    /// Whether the cell is exactly at sea level.
    pub fn is_ocean(&self, c: Coord) -> bool {
        self.height_at(c) == SEA_LEVEL
    }

    /// In-bounds cardinal neighbors, keyed by direction.
    pub fn neighbors4(&self, x: usize, z: usize) -> BTreeMap<Direction, Sample> {
        self.neighbors(x, z)
            .into_iter()
            .map(|(dir, (nx, nz))| (dir, *self.get(nx, nz)))
            .collect()
    }

    /// Number of cells with height above sea level.
    pub fn land_cell_count(&self) -> usize {
        self.iter().filter(|(_, _, s)| s.height > SEA_LEVEL).count()
    }

    /// Minimum and maximum height over the whole grid.
    pub fn height_range(&self) -> (f32, f32) {
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        for (_, _, s) in self.iter() {
            if s.height < min_h { min_h = s.height; }
            if s.height > max_h { max_h = s.height; }
        }
        (min_h, max_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors4_keyed_by_direction() {
        let mut grid = TerrainGrid::ocean(3, 3);
        grid.set_height(1, 2, 5.0);
        grid.set_height(0, 1, 2.0);

        let n = grid.neighbors4(1, 1);
        assert_eq!(n.len(), 4);
        assert_eq!(n[&Direction::North].height, 5.0);
        assert_eq!(n[&Direction::West].height, 2.0);

        let edge = grid.neighbors4(0, 0);
        assert_eq!(edge.len(), 2);
        assert!(!edge.contains_key(&Direction::South));
        assert!(!edge.contains_key(&Direction::West));
    }

    #[test]
    fn test_land_and_ocean_thresholds() {
        let mut grid = TerrainGrid::ocean(2, 1);
        grid.set_height(1, 0, 0.5);
        assert!(grid.is_ocean(Coord::new(0, 0)));
        assert!(!grid.is_ocean(Coord::new(1, 0)));
        assert!(!grid.is_land(Coord::new(1, 0)));
        assert_eq!(grid.land_cell_count(), 1);
    }

    #[test]
    fn test_coord_distance() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 4);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }
}
