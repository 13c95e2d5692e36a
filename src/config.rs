//! Generation settings.
//!
//! `TerrainSettings` is the flat, user-editable parameter set (what a settings
//! panel would expose). Each agent gets its own parameter struct derived from
//! it; constants that were never exposed to users keep their defaults there.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agents::{
    BeachParams, CoastParams, LavaParams, NoiseParams, RidgeParams, SmoothingParams, VolcanoParams,
};
use crate::error::ConfigError;

/// User-facing generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Number of quads along x (the grid has `width + 1` sample columns).
    pub width: usize,
    /// Number of quads along z (the grid has `depth + 1` sample rows).
    pub depth: usize,

    /// Margin near the map edge where the coast agent never places land.
    pub border_size: usize,

    /// Coast cells higher than this are not turned into beach.
    pub beach_max_height: f32,
    /// Base height of flattened beach sand.
    pub beach_sea_level: f32,
    /// Number of separate beaches.
    pub number_of_beaches: usize,
    /// Distance to walk inland from the coast when carving a beach.
    pub inland_distance: usize,

    pub min_amount_of_mountains: usize,
    pub max_amount_of_mountains: usize,
    /// Peak height of mountain ridges.
    pub max_height: f32,
    pub min_length: usize,
    pub max_length: usize,
    /// Radius of influence of each mountain top (also controls slope).
    pub mountain_width: f32,

    pub min_amount_of_hills: usize,
    pub max_amount_of_hills: usize,
    pub max_hill_height: f32,
    pub min_hill_length: usize,
    pub max_hill_length: usize,
    pub hill_width: f32,

    /// Chance (0-100) that a land cell is perturbed by the relief noise pass.
    pub noise_chance_percent: u32,
    pub noise_min_height: f32,
    pub noise_max_height: f32,

    pub caldera_width: f32,
    /// Total spread of the caldera radius around `caldera_width`.
    pub caldera_width_range: f32,
    pub volcano_height: f32,
    /// Total spread of the volcano peak height around `volcano_height`.
    pub volcano_height_range: f32,
    pub volcano_width: f32,
    pub volcano_count: usize,
    pub lava_river_count: usize,

    /// Grow a single island; when off the grid stays open ocean.
    pub one_island: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            depth: 1024,
            border_size: 20,
            beach_max_height: 10.0,
            beach_sea_level: 0.5,
            number_of_beaches: 6,
            inland_distance: 5,
            min_amount_of_mountains: 9,
            max_amount_of_mountains: 12,
            max_height: 50.0,
            min_length: 300,
            max_length: 500,
            mountain_width: 50.0,
            min_amount_of_hills: 10,
            max_amount_of_hills: 15,
            max_hill_height: 40.0,
            min_hill_length: 50,
            max_hill_length: 100,
            hill_width: 150.0,
            noise_chance_percent: 10,
            noise_min_height: 3.0,
            noise_max_height: 10.0,
            caldera_width: 5.0,
            caldera_width_range: 2.0,
            volcano_height: 70.0,
            volcano_height_range: 10.0,
            volcano_width: 50.0,
            volcano_count: 3,
            lava_river_count: 2,
            one_island: true,
        }
    }
}

impl TerrainSettings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let settings: TerrainSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Samples per row / column of the grid built from these settings.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.width + 1, self.depth + 1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.depth < 2 {
            return Err(ConfigError::invalid("width", "grid must be at least 2x2 quads"));
        }
        if 2 * self.border_size >= self.width.min(self.depth) {
            return Err(ConfigError::invalid(
                "border_size",
                format!("border {} leaves no room for land", self.border_size),
            ));
        }
        check_range(
            "max_amount_of_mountains",
            self.min_amount_of_mountains,
            self.max_amount_of_mountains,
        )?;
        check_range("max_length", self.min_length, self.max_length)?;
        check_range("max_amount_of_hills", self.min_amount_of_hills, self.max_amount_of_hills)?;
        check_range("max_hill_length", self.min_hill_length, self.max_hill_length)?;
        if self.noise_chance_percent > 100 {
            return Err(ConfigError::invalid("noise_chance_percent", "must be between 0 and 100"));
        }
        if self.noise_min_height > self.noise_max_height {
            return Err(ConfigError::invalid(
                "noise_max_height",
                "must not be below noise_min_height",
            ));
        }
        for (field, value) in [
            ("mountain_width", self.mountain_width),
            ("hill_width", self.hill_width),
            ("volcano_width", self.volcano_width),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }
        for (field, value) in [
            ("beach_sea_level", self.beach_sea_level),
            ("caldera_width_range", self.caldera_width_range),
            ("volcano_height_range", self.volcano_height_range),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::invalid(field, "must not be negative"));
            }
        }
        if self.beach_sea_level > self.beach_max_height {
            return Err(ConfigError::invalid(
                "beach_max_height",
                "must not be below beach_sea_level",
            ));
        }
        Ok(())
    }

    pub fn coast_params(&self) -> CoastParams {
        let (w, d) = self.grid_size();
        CoastParams {
            tokens: self.width * self.depth / 3,
            border_size: self.border_size,
            ..CoastParams::for_grid(w, d)
        }
    }

    /// Relief noise applied right after the coastline is grown.
    pub fn relief_noise_params(&self) -> NoiseParams {
        NoiseParams {
            passes: 1,
            chance_percent: self.noise_chance_percent,
            min_height: self.noise_min_height,
            max_height: self.noise_max_height,
        }
    }

    /// Light texture noise applied after beaches.
    pub fn finish_noise_params(&self) -> NoiseParams {
        NoiseParams {
            passes: 1,
            chance_percent: 10,
            min_height: 0.1,
            max_height: 0.1,
        }
    }

    pub fn smoothing_params(&self, passes: usize) -> SmoothingParams {
        SmoothingParams {
            passes,
            ..SmoothingParams::default()
        }
    }

    pub fn mountain_params(&self) -> RidgeParams {
        RidgeParams {
            min_count: self.min_amount_of_mountains,
            max_count: self.max_amount_of_mountains,
            min_length: self.min_length,
            max_length: self.max_length,
            max_height: self.max_height,
            width: self.mountain_width,
            ..RidgeParams::mountains()
        }
    }

    pub fn hill_params(&self) -> RidgeParams {
        RidgeParams {
            min_count: self.min_amount_of_hills,
            max_count: self.max_amount_of_hills,
            min_length: self.min_hill_length,
            max_length: self.max_hill_length,
            max_height: self.max_hill_height,
            width: self.hill_width,
            ..RidgeParams::hills()
        }
    }

    pub fn beach_params(&self) -> BeachParams {
        BeachParams {
            number_of_beaches: self.number_of_beaches,
            inland_distance: self.inland_distance,
            sea_level: self.beach_sea_level,
            max_height: self.beach_max_height,
            ..BeachParams::default()
        }
    }

    pub fn volcano_params(&self) -> VolcanoParams {
        VolcanoParams {
            count: self.volcano_count,
            caldera_width: self.caldera_width,
            caldera_width_range: self.caldera_width_range,
            height: self.volcano_height,
            height_range: self.volcano_height_range,
            width: self.volcano_width,
            ..VolcanoParams::default()
        }
    }

    pub fn lava_params(&self) -> LavaParams {
        LavaParams {
            rivers: self.lava_river_count,
            ..LavaParams::default()
        }
    }
}

fn check_range(field: &'static str, min: usize, max: usize) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::invalid(field, format!("range {}..{} is inverted", min, max)))
    } else {
        Ok(())
    }
}
