use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma, Rgb as Pixel, RgbImage};

use crate::error::ExportError;
use crate::grid::TerrainGrid;

/// Height gradient stops: (fraction of max height, colour)
const GRADIENT: [(f32, [u8; 3]); 6] = [
    (0.0, [194, 178, 128]),  // Sand
    (0.05, [96, 160, 72]),   // Lowland grass
    (0.3, [52, 110, 48]),    // Forest
    (0.55, [120, 110, 100]), // Rock
    (0.8, [150, 140, 130]),  // High rock
    (1.0, [240, 240, 245]),  // Snow
];

const OCEAN: [u8; 3] = [30, 70, 140];

/// Render heights as 8-bit grayscale, 0 = sea level, 255 = highest sample.
pub fn render_heightmap(grid: &TerrainGrid) -> Result<GrayImage, ExportError> {
    if grid.is_empty() {
        return Err(ExportError::EmptyGrid);
    }
    let (_, max_h) = grid.height_range();
    let scale = if max_h > 0.0 { 255.0 / max_h } else { 0.0 };
    let mut img: GrayImage = ImageBuffer::new(grid.width as u32, grid.depth as u32);
    for (x, z, s) in grid.iter() {
        let v = (s.height.max(0.0) * scale).round().clamp(0.0, 255.0) as u8;
        // Image rows run top-down, +z points up the map
        img.put_pixel(x as u32, (grid.depth - 1 - z) as u32, Luma([v]));
    }
    Ok(img)
}

/// Render the terrain in colour. Explicit sample colours win over the height
/// gradient.
pub fn render_color(grid: &TerrainGrid) -> Result<RgbImage, ExportError> {
    if grid.is_empty() {
        return Err(ExportError::EmptyGrid);
    }
    let (_, max_h) = grid.height_range();
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32, grid.depth as u32);
    for (x, z, s) in grid.iter() {
        let color = match s.color {
            Some(rgb) => rgb.0,
            None => height_color(s.height, max_h),
        };
        img.put_pixel(x as u32, (grid.depth - 1 - z) as u32, Pixel(color));
    }
    Ok(img)
}

pub fn export_heightmap(grid: &TerrainGrid, path: &Path) -> Result<(), ExportError> {
    render_heightmap(grid)?.save(path)?;
    Ok(())
}

pub fn export_color_map(grid: &TerrainGrid, path: &Path) -> Result<(), ExportError> {
    render_color(grid)?.save(path)?;
    Ok(())
}

/// Gradient colour for a height relative to the tallest sample.
pub fn height_color(height: f32, max_height: f32) -> [u8; 3] {
    if height <= 0.0 {
        return OCEAN;
    }
    let t = if max_height > 0.0 { (height / max_height).clamp(0.0, 1.0) } else { 0.0 };
    let last = GRADIENT[GRADIENT.len() - 1];
    if t >= last.0 {
        return last.1;
    }
    for pair in GRADIENT.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            return lerp_color(c0, c1, (t - t0) / (t1 - t0));
        }
    }
    last.1
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t) as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t) as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Rgb;
    use crate::tilemap::Tilemap;

    #[test]
    fn test_heightmap_scales_to_max() {
        let mut grid = TerrainGrid::ocean(4, 3);
        grid.set_height(1, 0, 50.0);
        grid.set_height(2, 2, 25.0);
        let img = render_heightmap(&grid).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        // z = 0 is the bottom image row
        assert_eq!(img.get_pixel(1, 2).0, [255]);
        assert_eq!(img.get_pixel(2, 0).0, [128]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_color_override_wins() {
        let mut grid = TerrainGrid::ocean(2, 2);
        grid.set_height(0, 0, 10.0);
        grid.get_mut(1, 1).color = Some(Rgb::LAVA);
        let img = render_color(&grid).unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [255, 153, 0]);
        assert_eq!(img.get_pixel(0, 0).0, OCEAN);
        assert_eq!(img.get_pixel(0, 1).0, [240, 240, 245]);
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(height_color(0.0, 10.0), OCEAN);
        assert_eq!(height_color(10.0, 10.0), [240, 240, 245]);
        assert_ne!(height_color(0.001, 1000.0), OCEAN);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let grid: TerrainGrid = Tilemap::new(0, 0);
        assert!(matches!(render_color(&grid), Err(ExportError::EmptyGrid)));
    }
}
