/// A dense 2D grid stored row-major (`index = x + z * width`).
///
/// Unlike a planetary map this grid never wraps: every coordinate must lie in
/// `[0, width) x [0, depth)`. Reading or writing outside that range is a
/// contract violation and panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub depth: usize,
    data: Vec<T>,
}

/// Cardinal directions used for 4-neighborhood queries.
/// North is +z, East is +x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit offset `(dx, dz)` for this direction.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

/// Offsets of the 8-neighborhood (Moore neighborhood), row by row.
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            data: vec![T::default(); width * depth],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, depth: usize, value: T) -> Self {
        Self {
            width,
            depth,
            data: vec![value; width * depth],
        }
    }

    /// Build a map from row-major data.
    pub fn from_vec(width: usize, depth: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), width * depth, "data length does not match {}x{}", width, depth);
        Self { width, depth, data }
    }
}

impl<T> Tilemap<T> {
    fn index(&self, x: usize, z: usize) -> usize {
        assert!(
            x < self.width && z < self.depth,
            "coordinate ({}, {}) outside {}x{} grid",
            x,
            z,
            self.width,
            self.depth
        );
        z * self.width + x
    }

    /// Whether a signed coordinate lies inside the grid.
    pub fn in_bounds(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.depth
    }

    /// Convert a signed coordinate to an unsigned one if it is inside the grid.
    pub fn checked(&self, x: i64, z: i64) -> Option<(usize, usize)> {
        if self.in_bounds(x, z) {
            Some((x as usize, z as usize))
        } else {
            None
        }
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    pub fn get_mut(&mut self, x: usize, z: usize) -> &mut T {
        let idx = self.index(x, z);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// In-bounds cardinal neighbors, in `Direction::ALL` order.
    pub fn neighbors(&self, x: usize, z: usize) -> Vec<(Direction, (usize, usize))> {
        let mut result = Vec::with_capacity(4);
        for dir in Direction::ALL {
            let (dx, dz) = dir.offset();
            if let Some(pos) = self.checked(x as i64 + dx, z as i64 + dz) {
                result.push((dir, pos));
            }
        }
        result
    }

    /// In-bounds 8-connected neighbors (diagonals included, center excluded).
    pub fn neighbors_8(&self, x: usize, z: usize) -> Vec<(usize, usize)> {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dz)| self.checked(x as i64 + dx, z as i64 + dz))
            .collect()
    }

    /// Iterate over all cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let z = idx / width;
            (x, z, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates, row-major.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let z = idx / width;
            (x, z, val)
        })
    }
}
