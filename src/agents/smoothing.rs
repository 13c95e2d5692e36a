//! Neighbour-averaging smoothing over land

use tracing::debug;

use crate::grid::{Coord, TerrainGrid};

/// Which heights a pass reads while averaging
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmoothingMode {
    /// Read the grid as it is being updated; earlier cells in the same pass
    /// already carry their smoothed height
    #[default]
    Wavefront,
    /// Read a copy taken at the start of each pass
    Snapshot,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmoothingParams {
    pub passes: usize,
    pub mode: SmoothingMode,
}

/// Replace each land cell's height with the mean of its in-bounds cardinal
/// neighbours, `passes` times. Cells below the land threshold are left as is.
pub fn apply_smoothing(grid: &mut TerrainGrid, params: &SmoothingParams) {
    for _ in 0..params.passes {
        let snapshot = match params.mode {
            SmoothingMode::Wavefront => None,
            SmoothingMode::Snapshot => Some(grid.clone()),
        };
        for z in 0..grid.depth {
            for x in 0..grid.width {
                if !grid.is_land(Coord::new(x, z)) {
                    continue;
                }
                let source = snapshot.as_ref().unwrap_or(&*grid);
                let neighbors = source.neighbors4(x, z);
                if neighbors.is_empty() {
                    continue;
                }
                let sum: f32 = neighbors.values().map(|s| s.height).sum();
                let mean = sum / neighbors.len() as f32;
                grid.set_height(x, z, mean);
            }
        }
    }
    debug!(passes = params.passes, mode = ?params.mode, "smoothing applied");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike() -> TerrainGrid {
        let mut grid = TerrainGrid::ocean(5, 5);
        for z in 1..4 {
            for x in 1..4 {
                grid.set_height(x, z, 4.0);
            }
        }
        grid.set_height(2, 2, 20.0);
        grid
    }

    #[test]
    fn test_zero_passes_is_identity() {
        let mut grid = spike();
        apply_smoothing(&mut grid, &SmoothingParams::default());
        assert_eq!(grid, spike());
    }

    #[test]
    fn test_snapshot_averages_previous_pass() {
        let mut grid = spike();
        let params = SmoothingParams {
            passes: 1,
            mode: SmoothingMode::Snapshot,
        };
        apply_smoothing(&mut grid, &params);
        assert_eq!(grid.height(2, 2), 4.0);
        // (1,2): neighbours 0, 20, 4, 4
        assert_eq!(grid.height(1, 2), 7.0);
        // Sea untouched
        assert_eq!(grid.height(0, 0), 0.0);
    }

    #[test]
    fn test_wavefront_reads_updated_cells() {
        let mut grid = spike();
        let params = SmoothingParams {
            passes: 1,
            mode: SmoothingMode::Wavefront,
        };
        apply_smoothing(&mut grid, &params);
        // Row z=1 first: (1,1) = (0 + 0 + 4 + 4) / 4 = 2
        assert_eq!(grid.height(1, 1), 2.0);
        // (2,1) sees the updated (1,1): (2 + 4 + 0 + 20) / 4 = 6.5
        assert_eq!(grid.height(2, 1), 6.5);
    }
}
