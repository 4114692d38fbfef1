//! # Pipeline Tests
//!
//! End-to-end checks through the public API: configuration, chunk loading,
//! terrain generation and meshing working together.
//!
//! Run with: cargo test --test pipeline

use std::sync::mpsc::TryRecvError;

use cgmath::Point3;
use voxel_terrain::meshing::{GreedyMesher, Vertex};
use voxel_terrain::voxels::block::block_type::BlockType;
use voxel_terrain::voxels::chunk::{ChunkState, VoxelGrid};
use voxel_terrain::voxels::chunk_manager::{ChunkEvent, ChunkManager};
use voxel_terrain::{EngineConfig, GenerationMethod, TerrainError};

fn small_config() -> EngineConfig {
    EngineConfig::from_json_str(
        r#"{
            "world": { "chunk_size": 8, "load_radius": 1 },
            "terrain": { "base_height": 6.0 },
            "noise": {
                "base": { "kind": "perlin", "seed": 11, "scale": 40.0 },
                "mountain": { "kind": "ridged", "fractal": { "seed": 12, "scale": 70.0 } },
                "river": { "kind": "simplex", "seed": 13, "scale": 90.0 },
                "warp_layer": { "kind": "perlin", "seed": 14, "scale": 50.0 }
            },
            "materials": {
                "layers": [
                    { "until_depth": 1.0, "block_type": "GRASS" },
                    { "until_depth": 4.0, "block_type": "DIRT" }
                ],
                "fallback": "STONE"
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn generate_and_mesh_radius() {
    let config = small_config();
    let mut world = config.build_world().unwrap();
    assert!(world.generator().is_warped());

    let loaded = world
        .load_radius(Point3::new(0, 0, 0), config.world.load_radius)
        .unwrap();
    assert_eq!(loaded.len(), 27);
    assert!(world
        .manager()
        .chunks()
        .all(|chunk| chunk.state() == ChunkState::DataLoaded));

    let stats = world.rebuild_meshes().unwrap();
    assert_eq!(stats.chunks, 27);
    assert_eq!(stats.rebuilt, 27);
    assert!(stats.quads > 0);
    assert_eq!(stats.triangles, stats.quads * 2);
    assert_eq!(stats.vertices, stats.quads * 4);

    // the chunk below the origin holds ground made of the configured materials
    let below = world.chunk(Point3::new(0, -1, 0)).unwrap();
    let ground: Vec<BlockType> = below
        .voxels()
        .unwrap()
        .solid_voxels()
        .map(|(_, voxel)| voxel.block_type)
        .collect();
    assert!(!ground.is_empty());
    assert!(ground
        .iter()
        .all(|t| matches!(t, BlockType::GRASS | BlockType::DIRT | BlockType::STONE)));
}

#[test]
fn neighbouring_chunks_share_their_border_columns() {
    let config = small_config();
    let generator = config.build_generator().unwrap();

    // chunk -1 spans world x -8..=-1 and chunk 0 spans 0..=7 at size 8;
    // the size-16 grids below cover the same world columns on either side
    let left = generator.generate_grid(Point3::new(-1, 0, 0), 8, 1.0);
    let right = generator.generate_grid(Point3::new(0, 0, 0), 8, 1.0);
    let wide_left = generator.generate_grid(Point3::new(-1, 0, 0), 16, 1.0);
    let wide_right = generator.generate_grid(Point3::new(0, 0, 0), 16, 1.0);

    for z in 0..8 {
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(left.get(x, y, z), wide_left.get(x + 8, y, z), "world x {}", x as i32 - 8);
                assert_eq!(right.get(x, y, z), wide_right.get(x, y, z), "world x {x}");
            }
        }
    }

    // the columns either side of the border follow the world-space heightfield
    for z in 0..8 {
        let west = generator.height(-1.0, z as f64);
        let east = generator.height(0.0, z as f64);
        for y in 0..8 {
            assert_eq!(left.get(7, y, z).is_solid(), y as f64 <= west, "x -1, y {y}, z {z}");
            assert_eq!(right.get(0, y, z).is_solid(), y as f64 <= east, "x 0, y {y}, z {z}");
        }
    }
}

#[test]
fn meshes_are_reproducible() {
    let first = {
        let mut world = small_config().build_world().unwrap();
        world.load_chunk(Point3::new(1, 0, -1)).unwrap();
        world.rebuild_meshes().unwrap();
        world.chunk(Point3::new(1, 0, -1)).unwrap().mesh().unwrap().clone()
    };
    let second = {
        let mut world = small_config().build_world().unwrap();
        world.load_chunk(Point3::new(1, 0, -1)).unwrap();
        world.rebuild_meshes().unwrap();
        world.chunk(Point3::new(1, 0, -1)).unwrap().mesh().unwrap().clone()
    };
    assert_eq!(first, second);
}

#[test]
fn culling_never_adds_faces() {
    let config = small_config();
    let generator = config.build_generator().unwrap();
    let grid = generator.generate_grid(Point3::new(0, 0, 0), 8, 1.0);

    let all = GreedyMesher::new().generate_mesh(&grid).unwrap();
    let culled = GreedyMesher::new().with_culling(true).generate_mesh(&grid).unwrap();
    assert!(culled.quad_count() <= all.quad_count());

    let parallel = GreedyMesher::new()
        .with_parallel_sides(true)
        .generate_mesh(&grid)
        .unwrap();
    assert_eq!(parallel, all);
}

#[test]
fn gpu_vertices_match_mesh_buffers() {
    let mesh = GreedyMesher::new()
        .generate_mesh(&VoxelGrid::solid([2, 1, 1], BlockType::SAND))
        .unwrap();
    let vertices = mesh.gpu_vertices();
    assert_eq!(vertices.len(), mesh.vertices.len());
    assert_eq!(Vertex::as_bytes(&vertices).len(), vertices.len() * Vertex::STRIDE);
}

#[test]
fn manager_events_reach_subscribers() {
    let mut manager = ChunkManager::new(4, 1.0);
    let events = manager.subscribe();

    manager.load_chunk(Point3::new(0, 0, 0));
    manager.load_chunk(Point3::new(0, 0, 0));
    manager.unload_chunk(Point3::new(0, 0, 0));
    manager.clear_all();

    assert_eq!(events.try_recv(), Ok(ChunkEvent::Loaded(Point3::new(0, 0, 0))));
    assert_eq!(events.try_recv(), Ok(ChunkEvent::Unloaded(Point3::new(0, 0, 0))));
    assert_eq!(events.try_recv(), Ok(ChunkEvent::Cleared));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn pattern_methods_through_config() {
    let mut config = EngineConfig::default();
    config.world.chunk_size = 2;
    config.world.generation_method = GenerationMethod::Checkerboard;

    let mut world = config.build_world().unwrap();
    world.load_chunk(Point3::new(0, 0, 0)).unwrap();
    let stats = world.rebuild_meshes().unwrap();
    assert_eq!(stats.quads, 4 * 6);
}

#[test]
fn wrong_sized_grid_is_rejected() {
    let mut manager = ChunkManager::new(4, 1.0);
    let chunk = manager.load_chunk(Point3::new(0, 0, 0));
    let err = chunk.set_voxel_data(VoxelGrid::cubic(5)).unwrap_err();
    assert!(matches!(
        err,
        TerrainError::DimensionMismatch {
            expected: [4, 4, 4],
            found: [5, 5, 5]
        }
    ));
}
