//! Agent-based island terrain generation
//!
//! A heightmap is built by running a fixed sequence of agents over one shared
//! grid: coastline growth, mountain and hill ridges, beaches, volcanoes and
//! lava rivers, with noise and smoothing passes in between.

pub mod agents;
pub mod coast_set;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod mesh;
pub mod pipeline;
pub mod seeds;
pub mod spatial;
pub mod tilemap;

pub use config::TerrainSettings;
pub use error::{ConfigError, ExportError, PipelineError};
pub use grid::{Coord, Rgb, Sample, TerrainGrid};
pub use pipeline::{generate_terrain, generate_terrain_with, GeneratedTerrain, Stage};
pub use seeds::AgentSeeds;
