//! Headless terrain pipeline: populate a grid of chunks, mesh each one, and
//! run a demo edit cycle with re-meshing.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use hashbrown::HashMap;
use log::info;

use marl_edit::{EditTracker, place_terrain, remove_terrain};
use marl_field::{FieldLookup, VoxelField, generate_field};
use marl_geom::Vec3;
use marl_materials::MaterialCatalog;
use marl_mesh_cpu::{ChunkMeshCpu, MeshSink, build_chunk_mesh};
use marl_world::{ChunkCoord, GenParams, HeightField, load_params_from_path};

#[derive(Parser, Debug)]
#[command(name = "marl", about = "Marching-cubes voxel terrain pipeline")]
struct Args {
    /// World seed for heights and material draws
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Chunks generated along X and Z
    #[arg(long, default_value_t = 4)]
    chunks: usize,
    /// Terrain generation config (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Material catalog (TOML)
    #[arg(long, default_value = "assets/voxels/materials.toml")]
    materials: PathBuf,
    /// Skip the demo edit pass
    #[arg(long)]
    no_edits: bool,
}

/// Owns every generated field, keyed by chunk origin. Population consults it
/// for already generated neighbors.
#[derive(Default)]
struct ChunkStore {
    chunks: HashMap<ChunkCoord, VoxelField>,
}

impl FieldLookup for ChunkStore {
    fn field_at(&self, coord: ChunkCoord) -> Option<&VoxelField> {
        self.chunks.get(&coord)
    }
}

/// Stand-in for the rendering/physics backend: counts what it is handed.
#[derive(Default)]
struct StatsSink {
    deliveries: usize,
    vertices: usize,
    triangles: usize,
}

impl MeshSink for StatsSink {
    fn replace_chunk_mesh(&mut self, mesh: &ChunkMeshCpu) {
        self.deliveries += 1;
        self.vertices += mesh.build.vertex_count();
        self.triangles += mesh.build.triangle_count();
        info!(
            "mesh chunk=({}, {}) verts={} tris={}",
            mesh.coord.wx,
            mesh.coord.wz,
            mesh.build.vertex_count(),
            mesh.build.triangle_count()
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = match &args.config {
        Some(path) => load_params_from_path(path)?,
        None => GenParams::default(),
    };
    let catalog = MaterialCatalog::from_path(&args.materials)?;
    let heights = HeightField::new(args.seed, &params);

    let w = params.chunk_width as i32;
    let mut coords = Vec::with_capacity(args.chunks * args.chunks);
    for cx in 0..args.chunks {
        for cz in 0..args.chunks {
            coords.push(ChunkCoord::new(cx as i32 * w, cz as i32 * w));
        }
    }

    // Generation order matters: later chunks see earlier ones as neighbors
    // and pick up their edge materials.
    let mut store = ChunkStore::default();
    for &coord in &coords {
        let result = generate_field(coord, &params, &heights, &catalog, &store, args.seed);
        info!(
            "populate chunk=({}, {}) occupancy={:?}",
            coord.wx, coord.wz, result.occupancy
        );
        store.chunks.insert(coord, result.field);
    }

    let mut sink = StatsSink::default();
    for &coord in &coords {
        if let Some(mesh) = build_chunk_mesh(&store.chunks[&coord], params.surface_threshold) {
            sink.replace_chunk_mesh(&mesh);
        }
    }

    if !args.no_edits {
        let mut tracker = EditTracker::new();
        // Carve a voxel out of the middle of the first chunk, put it back,
        // and re-mesh whatever the tracker flagged.
        let coord = coords[0];
        let cx = coord.wx as f32 + params.chunk_width as f32 * 0.5;
        let cz = coord.wz as f32 + params.chunk_width as f32 * 0.5;
        let cy = heights.height_at(cx as i32, cz as i32).floor();
        let pos = Vec3::new(cx, cy, cz);

        let field = store.chunks.get_mut(&coord).expect("chunk was generated");
        remove_terrain(field, pos)?;
        tracker.bump(coord);
        info!("remove at ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z);
        place_terrain(field, pos)?;
        tracker.bump(coord);
        info!("place at ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z);

        for &c in &coords {
            if tracker.needs_rebuild(c) {
                let rev = tracker.rev(c);
                if let Some(mesh) = build_chunk_mesh(&store.chunks[&c], params.surface_threshold) {
                    sink.replace_chunk_mesh(&mesh);
                }
                tracker.mark_built(c, rev);
            }
        }
    }

    info!(
        "done: {} meshes delivered, {} vertices, {} triangles",
        sink.deliveries, sink.vertices, sink.triangles
    );
    Ok(())
}
