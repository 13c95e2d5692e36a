//! Mesh arrays for a renderer
//!
//! A grid of `(W + 1) x (D + 1)` samples becomes a regular quad mesh with two
//! triangles per quad. Vertex `i` is the sample at `x + z * (W + 1)`.

use crate::grid::{Rgb, TerrainGrid};

#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// `(x, height, z)` per sample, row-major
    pub positions: Vec<[f32; 3]>,
    /// Explicit colour per sample; `None` means colour by height
    pub colors: Vec<Option<Rgb>>,
    /// Six indices per quad
    pub triangles: Vec<u32>,
}

impl MeshData {
    pub fn from_grid(grid: &TerrainGrid) -> Self {
        let positions = grid
            .iter()
            .map(|(x, z, s)| [x as f32, s.height, z as f32])
            .collect();
        let colors = grid.iter().map(|(_, _, s)| s.color).collect();
        let quads_x = grid.width.saturating_sub(1);
        let quads_z = grid.depth.saturating_sub(1);
        Self {
            positions,
            colors,
            triangles: build_triangles(quads_x, quads_z),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Index buffer for a `quads_x x quads_z` quad grid.
pub fn build_triangles(quads_x: usize, quads_z: usize) -> Vec<u32> {
    let row = quads_x as u32 + 1;
    let mut triangles = Vec::with_capacity(quads_x * quads_z * 6);
    for z in 0..quads_z as u32 {
        for x in 0..quads_x as u32 {
            let v = x + z * row;
            triangles.extend_from_slice(&[v, v + row, v + 1, v + 1, v + row, v + row + 1]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_layout() {
        let triangles = build_triangles(2, 1);
        assert_eq!(triangles, vec![0, 3, 1, 1, 3, 4, 1, 4, 2, 2, 4, 5]);
    }

    #[test]
    fn test_mesh_from_grid() {
        let mut grid = TerrainGrid::ocean(3, 3);
        grid.set_height(1, 2, 4.0);
        grid.get_mut(2, 0).color = Some(Rgb::LAVA);
        let mesh = MeshData::from_grid(&grid);

        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.positions[1 + 2 * 3], [1.0, 4.0, 2.0]);
        assert_eq!(mesh.colors[2], Some(Rgb::LAVA));
        assert!(mesh.triangles.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }
}
