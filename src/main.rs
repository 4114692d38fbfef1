//! # Voxel Terrain Entry Point
//!
//! Calls into the library's `run()` function, which generates and meshes the
//! chunks around the origin and logs the results.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_terrain::run();
}
