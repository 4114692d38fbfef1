#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Procedural voxel terrain: seeded noise layers become a heightfield, the
//! heightfield fills fixed-size chunks, and each chunk is turned into a compact
//! quad mesh by a greedy mesher.
//!
//! ## Key Modules
//!
//! * `generation` - Noise generators, domain warping, height maps and the terrain synthesizer
//! * `voxels` - Voxel records, chunk storage and the chunk manager
//! * `meshing` - Greedy meshing and mesh buffers
//! * `world` - The pipeline tying chunks, generator and mesher together
//! * `config` - JSON-loadable configuration for every component
//!
//! ## Architecture
//!
//! Components are built separately and handed to each other explicitly:
//! * The chunk manager owns chunks and announces new ones over a channel
//! * The world drains those announcements and fills chunks from the generator
//! * Meshes are rebuilt on demand, only for chunks whose voxels changed
//!
//! ## Usage
//!
//! ```
//! use cgmath::Point3;
//! use voxel_terrain::EngineConfig;
//!
//! let mut config = EngineConfig::default();
//! config.world.chunk_size = 8;
//!
//! let mut world = config.build_world()?;
//! world.load_radius(Point3::new(0, 0, 0), 1)?;
//! let stats = world.rebuild_meshes()?;
//! assert_eq!(stats.chunks, 27);
//! # Ok::<(), voxel_terrain::TerrainError>(())
//! ```

use cgmath::Point3;
use log::{error, info};
use web_time::Instant;

pub mod config;
pub mod error;
pub mod generation;
pub mod meshing;
pub mod voxels;
pub mod world;

pub use config::EngineConfig;
pub use error::{Result, TerrainError};
pub use world::{GenerationMethod, MeshStats, VoxelWorld};

/// Runs the batch generator: loads the configuration named by the first
/// command-line argument (or the defaults), generates every chunk within the
/// configured radius of the origin, meshes them and logs the totals.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(err) = generate(std::env::args().nth(1)) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn generate(config_path: Option<String>) -> Result<()> {
    let config = match config_path {
        Some(path) => EngineConfig::from_path(path)?,
        None => {
            info!("No configuration file given, using defaults");
            EngineConfig::default()
        }
    };

    let start = Instant::now();
    let mut world = config.build_world()?;
    let loaded = world.load_radius(Point3::new(0, 0, 0), config.world.load_radius)?;
    let stats = world.rebuild_meshes()?;

    info!("Generated {} chunks in {:?}", loaded.len(), start.elapsed());
    info!("{stats}");
    Ok(())
}
