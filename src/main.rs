use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agent_terrain::export::{export_color_map, export_heightmap};
use agent_terrain::mesh::MeshData;
use agent_terrain::{generate_terrain_with, AgentSeeds, TerrainSettings};

#[derive(Parser, Debug)]
#[command(name = "agent_terrain")]
#[command(about = "Generate an island heightmap with terrain agents")]
struct Args {
    /// Number of quads along x (overrides the settings file)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Number of quads along z (overrides the settings file)
    #[arg(short = 'D', long)]
    depth: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Settings file (JSON); missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Colour map output path
    #[arg(short, long, default_value = "terrain.png")]
    output: PathBuf,

    /// Also export a grayscale heightmap
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Leave the map as open ocean
    #[arg(long)]
    no_island: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => match TerrainSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings from {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => TerrainSettings::default(),
    };
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(depth) = args.depth {
        settings.depth = depth;
    }
    if args.no_island {
        settings.one_island = false;
    }

    if let Some(ref path) = args.write_config {
        return match settings.save(path) {
            Ok(()) => {
                println!("Settings written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to write settings: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = AgentSeeds::from_master(seed);
    println!("Generating terrain with seed: {}", seed);
    println!("Map size: {}x{} quads", settings.width, settings.depth);

    let terrain = match generate_terrain_with(&settings, &seeds, |stage| {
        println!("Running {}...", stage);
        ControlFlow::Continue(())
    }) {
        Ok(terrain) => terrain,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (min_h, max_h) = terrain.grid.height_range();
    let land = terrain.grid.land_cell_count();
    println!(
        "Heightmap range: {:.1} to {:.1} ({:.1}% land)",
        min_h,
        max_h,
        100.0 * land as f64 / terrain.grid.len() as f64
    );
    println!("Coast cells promoted: {}", terrain.stats.coast_cells_promoted);
    println!(
        "Mountains: {} ranges, {} tops; hills: {} chains ({} tops claimed)",
        terrain.stats.mountain_ranges,
        terrain.stats.mountain_tops_recorded,
        terrain.stats.hill_chains,
        terrain.stats.tops_claimed_by_hills
    );
    println!("Beaches: {}", terrain.stats.beaches);
    println!(
        "Volcanoes: {} placed, {} lava rivers",
        terrain.volcanoes.len() + terrain.lava_flows.len(),
        terrain.lava_flows.len()
    );

    let mesh = MeshData::from_grid(&terrain.grid);
    println!("Mesh: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());

    if let Err(e) = export_color_map(&terrain.grid, &args.output) {
        eprintln!("Failed to export colour map: {}", e);
        return ExitCode::FAILURE;
    }
    println!("Saved colour map to: {}", args.output.display());

    if let Some(ref path) = args.heightmap {
        if let Err(e) = export_heightmap(&terrain.grid, path) {
            eprintln!("Failed to export heightmap: {}", e);
            return ExitCode::FAILURE;
        }
        println!("Saved heightmap to: {}", path.display());
    }

    ExitCode::SUCCESS
}
