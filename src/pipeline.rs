//! The agent pipeline
//!
//! Runs every agent in a fixed order against one shared grid. Later agents
//! depend on lists produced by earlier ones (coastline, mountain tops,
//! volcanoes); these are passed along explicitly. A progress callback is
//! invoked before each stage and may cancel the run.

use std::fmt;
use std::ops::ControlFlow;

use tracing::{info, info_span};

use crate::agents::{
    apply_noise, apply_smoothing, generate_beaches, generate_coast, generate_hills, generate_lava,
    generate_mountains, generate_volcanoes, LavaFlow, Volcano,
};
use crate::coast_set::CoastSet;
use crate::config::TerrainSettings;
use crate::error::PipelineError;
use crate::grid::{Coord, TerrainGrid};
use crate::seeds::{agent_rng, AgentSeeds};

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Coast,
    ReliefNoise,
    CoastSmoothing,
    Mountains,
    Hills,
    RidgeSmoothing,
    Beaches,
    BeachSmoothing,
    FinishNoise,
    Volcanoes,
    Lava,
}

impl Stage {
    pub const ALL: [Stage; 11] = [
        Stage::Coast,
        Stage::ReliefNoise,
        Stage::CoastSmoothing,
        Stage::Mountains,
        Stage::Hills,
        Stage::RidgeSmoothing,
        Stage::Beaches,
        Stage::BeachSmoothing,
        Stage::FinishNoise,
        Stage::Volcanoes,
        Stage::Lava,
    ];

    /// Smoothing passes run by a smoothing stage.
    fn smoothing_passes(self) -> usize {
        match self {
            Stage::CoastSmoothing => 3,
            Stage::RidgeSmoothing => 8,
            Stage::BeachSmoothing => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Coast => "coast",
            Stage::ReliefNoise => "relief noise",
            Stage::CoastSmoothing => "coast smoothing",
            Stage::Mountains => "mountains",
            Stage::Hills => "hills",
            Stage::RidgeSmoothing => "ridge smoothing",
            Stage::Beaches => "beaches",
            Stage::BeachSmoothing => "beach smoothing",
            Stage::FinishNoise => "finish noise",
            Stage::Volcanoes => "volcanoes",
            Stage::Lava => "lava",
        };
        f.write_str(name)
    }
}

/// Counters collected while generating, for reporting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationStats {
    pub coast_cells_promoted: usize,
    pub mountain_ranges: usize,
    /// Mountain tops recorded before hills and volcanoes consumed any
    pub mountain_tops_recorded: usize,
    /// Mountain tops left once hills claimed theirs
    pub mountain_tops_after_hills: usize,
    pub hill_chains: usize,
    pub tops_claimed_by_hills: usize,
    pub beaches: usize,
}

/// A finished terrain plus the derived lists the agents produced.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    pub grid: TerrainGrid,
    /// Coastal cells left after the beach agent consumed its share
    pub coast: CoastSet,
    pub mountain_vertices: Vec<Coord>,
    /// Mountain tops not claimed by hills or volcanoes
    pub mountain_tops: Vec<Coord>,
    pub hill_tops: Vec<Coord>,
    /// Mountain tops removed by hill chains, in claim order
    pub hill_claimed_tops: Vec<Coord>,
    /// Volcanoes not used by a lava river
    pub volcanoes: Vec<Volcano>,
    pub lava_flows: Vec<LavaFlow>,
    pub stats: GenerationStats,
    pub seeds: AgentSeeds,
}

impl GeneratedTerrain {
    fn ocean(settings: &TerrainSettings, seeds: &AgentSeeds) -> Self {
        let (w, d) = settings.grid_size();
        Self {
            grid: TerrainGrid::ocean(w, d),
            coast: CoastSet::new(),
            mountain_vertices: Vec::new(),
            mountain_tops: Vec::new(),
            hill_tops: Vec::new(),
            hill_claimed_tops: Vec::new(),
            volcanoes: Vec::new(),
            lava_flows: Vec::new(),
            stats: GenerationStats::default(),
            seeds: seeds.clone(),
        }
    }
}

/// Generate a terrain without progress reporting.
pub fn generate_terrain(
    settings: &TerrainSettings,
    seeds: &AgentSeeds,
) -> Result<GeneratedTerrain, PipelineError> {
    generate_terrain_with(settings, seeds, |_| ControlFlow::Continue(()))
}

/// Generate a terrain, calling `progress` before each stage. Returning
/// `ControlFlow::Break` from the callback stops the run with
/// [`PipelineError::Cancelled`].
pub fn generate_terrain_with<F>(
    settings: &TerrainSettings,
    seeds: &AgentSeeds,
    mut progress: F,
) -> Result<GeneratedTerrain, PipelineError>
where
    F: FnMut(Stage) -> ControlFlow<()>,
{
    settings.validate()?;
    let mut terrain = GeneratedTerrain::ocean(settings, seeds);
    if !settings.one_island {
        info!("single island disabled, returning open ocean");
        return Ok(terrain);
    }

    for stage in Stage::ALL {
        if progress(stage).is_break() {
            return Err(PipelineError::Cancelled(stage));
        }
        let _span = info_span!("stage", %stage).entered();
        run_stage(stage, settings, &mut terrain);
        info!(land = terrain.grid.land_cell_count(), "{} done", stage);
    }
    Ok(terrain)
}

fn run_stage(stage: Stage, settings: &TerrainSettings, terrain: &mut GeneratedTerrain) {
    let seeds = &terrain.seeds;
    let grid = &mut terrain.grid;
    match stage {
        Stage::Coast => {
            let mut rng = agent_rng(seeds.coast);
            let output = generate_coast(grid, &settings.coast_params(), &mut rng);
            terrain.stats.coast_cells_promoted = output.promoted;
            terrain.coast = output.coast;
        }
        Stage::ReliefNoise => {
            apply_noise(grid, &settings.relief_noise_params(), &mut agent_rng(seeds.relief_noise));
        }
        Stage::CoastSmoothing | Stage::RidgeSmoothing | Stage::BeachSmoothing => {
            apply_smoothing(grid, &settings.smoothing_params(stage.smoothing_passes()));
        }
        Stage::Mountains => {
            let output = generate_mountains(
                grid,
                &terrain.coast,
                &settings.mountain_params(),
                &mut agent_rng(seeds.mountains),
            );
            terrain.stats.mountain_ranges = output.ranges;
            terrain.stats.mountain_tops_recorded = output.tops.len();
            terrain.mountain_vertices = output.vertices;
            terrain.mountain_tops = output.tops;
        }
        Stage::Hills => {
            let output = generate_hills(
                grid,
                &terrain.coast,
                &terrain.mountain_vertices,
                &mut terrain.mountain_tops,
                &settings.hill_params(),
                &mut agent_rng(seeds.hills),
            );
            terrain.stats.hill_chains = output.chains;
            terrain.stats.tops_claimed_by_hills = output.claimed.len();
            terrain.stats.mountain_tops_after_hills = terrain.mountain_tops.len();
            terrain.hill_tops = output.tops;
            terrain.hill_claimed_tops = output.claimed;
        }
        Stage::Beaches => {
            let stats = generate_beaches(
                grid,
                &mut terrain.coast,
                &settings.beach_params(),
                &mut agent_rng(seeds.beaches),
            );
            terrain.stats.beaches = stats.beaches;
        }
        Stage::FinishNoise => {
            apply_noise(grid, &settings.finish_noise_params(), &mut agent_rng(seeds.finish_noise));
        }
        Stage::Volcanoes => {
            terrain.volcanoes = generate_volcanoes(
                grid,
                &mut terrain.mountain_tops,
                &settings.volcano_params(),
                &mut agent_rng(seeds.volcanoes),
            );
        }
        Stage::Lava => {
            terrain.lava_flows = generate_lava(
                grid,
                &mut terrain.volcanoes,
                &settings.lava_params(),
                &mut agent_rng(seeds.lava),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings() -> TerrainSettings {
        TerrainSettings {
            width: 120,
            depth: 120,
            border_size: 8,
            number_of_beaches: 2,
            min_amount_of_mountains: 2,
            max_amount_of_mountains: 3,
            min_length: 40,
            max_length: 80,
            mountain_width: 15.0,
            min_amount_of_hills: 2,
            max_amount_of_hills: 3,
            min_hill_length: 20,
            max_hill_length: 40,
            hill_width: 20.0,
            volcano_width: 15.0,
            volcano_count: 2,
            lava_river_count: 1,
            ..TerrainSettings::default()
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let settings = small_settings();
        let seeds = AgentSeeds::from_master(42);
        let a = generate_terrain(&settings, &seeds).unwrap();
        let b = generate_terrain(&settings, &seeds).unwrap();

        assert_eq!(a.grid, b.grid);
        assert_eq!(a.coast.as_slice(), b.coast.as_slice());
        assert_eq!(a.mountain_tops, b.mountain_tops);
        assert_eq!(a.lava_flows, b.lava_flows);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_generation_builds_an_island() {
        let settings = small_settings();
        let terrain = generate_terrain(&settings, &AgentSeeds::from_master(7)).unwrap();
        let (w, d) = settings.grid_size();
        assert_eq!((terrain.grid.width, terrain.grid.depth), (w, d));
        assert!(terrain.grid.land_cell_count() > 0);
        assert!(terrain.stats.coast_cells_promoted > 0);
        // Grid edges stay sea apart from lava corridor noise
        for x in 0..w {
            let s = terrain.grid.get(x, 0);
            assert!(s.height == 0.0 || s.color.is_some());
        }
    }

    #[test]
    fn test_mountain_tops_are_consumed_once() {
        let settings = small_settings();
        let mut total_claimed = 0;
        for seed in 0..6 {
            let terrain = generate_terrain(&settings, &AgentSeeds::from_master(seed)).unwrap();
            let stats = &terrain.stats;
            let claimed = &terrain.hill_claimed_tops;
            total_claimed += claimed.len();

            assert_eq!(stats.tops_claimed_by_hills, claimed.len());
            assert!(
                stats.mountain_tops_after_hills + claimed.len() <= stats.mountain_tops_recorded
            );
            let volcano_centers: Vec<Coord> = terrain
                .volcanoes
                .iter()
                .chain(terrain.lava_flows.iter().map(|flow| &flow.volcano))
                .map(|v| v.center)
                .collect();
            assert!(
                terrain.mountain_tops.len() + volcano_centers.len()
                    <= stats.mountain_tops_after_hills
            );
            for top in claimed {
                assert!(!terrain.mountain_tops.contains(top), "seed {}: {:?} kept", seed, top);
                assert!(!volcano_centers.contains(top), "seed {}: {:?} reused", seed, top);
            }
            for center in &volcano_centers {
                assert!(!terrain.mountain_tops.contains(center));
            }
        }
        assert!(total_claimed > 0, "no hill chain claimed a mountain top");
    }

    #[test]
    fn test_cancel_stops_before_stage() {
        let settings = small_settings();
        let mut seen = Vec::new();
        let result = generate_terrain_with(&settings, &AgentSeeds::from_master(1), |stage| {
            seen.push(stage);
            if stage == Stage::Mountains {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(matches!(result, Err(PipelineError::Cancelled(Stage::Mountains))));
        assert_eq!(seen, Stage::ALL[..4].to_vec());
    }

    #[test]
    fn test_single_island_off_returns_ocean() {
        let settings = TerrainSettings {
            one_island: false,
            ..small_settings()
        };
        let terrain = generate_terrain(&settings, &AgentSeeds::from_master(9)).unwrap();
        assert_eq!(terrain.grid.land_cell_count(), 0);
        assert!(terrain.coast.is_empty());
        assert!(terrain.lava_flows.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = TerrainSettings {
            min_amount_of_hills: 20,
            ..small_settings()
        };
        let result = generate_terrain(&settings, &AgentSeeds::from_master(1));
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
