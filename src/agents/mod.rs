//! Terrain agents
//!
//! Each agent is a stateful algorithm that mutates the shared [`TerrainGrid`]
//! in place and returns whatever derived data later agents depend on:
//! - **Coast**: grows the island and its coastline from a single seed cell
//! - **Mountains / Hills**: directed random-walk ridges diffused outward
//! - **Beaches**: flattened coastal bands with short inland walks
//! - **Volcanoes**: cones with collapsed calderas on former mountain tops
//! - **Lava**: descending flows carved from a caldera rim
//! - **Noise / Smoothing**: grid-wide post-processing passes
//!
//! Agents take their randomness from an explicit `ChaCha8Rng` so a seeded run
//! is reproducible.
//!
//! [`TerrainGrid`]: crate::grid::TerrainGrid

pub mod beach;
pub mod coast;
pub mod hill;
pub mod lava;
pub mod mountain;
pub mod noise;
pub mod ridge;
pub mod smoothing;
pub mod volcano;

pub use beach::{generate_beaches, BeachParams, BeachStats};
pub use coast::{generate_coast, is_coastal, CoastOutput, CoastParams};
pub use hill::{generate_hills, HillOutput};
pub use lava::{generate_lava, LavaFlow, LavaParams};
pub use mountain::{generate_mountains, MountainOutput};
pub use noise::{apply_noise, NoiseParams};
pub use ridge::{BlendMode, RidgeParams};
pub use smoothing::{apply_smoothing, SmoothingMode, SmoothingParams};
pub use volcano::{generate_volcanoes, Volcano, VolcanoParams};
