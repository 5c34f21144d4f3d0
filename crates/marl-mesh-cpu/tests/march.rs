use marl_field::{NoNeighbors, VoxelField, VoxelSample, generate_field};
use marl_geom::Vec3;
use marl_materials::{MaterialCatalog, MaterialId};
use marl_mesh_cpu::tables::CORNER_OFFSETS;
use marl_mesh_cpu::{ChunkMeshCpu, MeshBuild, MeshSink, build_chunk_mesh, march_field_into};
use marl_world::{ChunkCoord, GenParams, HeightField};

const THRESHOLD: f32 = 0.5;

/// Single-cell field with the given density at each of the 8 cube corners.
fn cube_field(densities: [f32; 8]) -> VoxelField {
    let mut field = VoxelField::new(ChunkCoord::new(0, 0), 1, 1);
    for (i, off) in CORNER_OFFSETS.iter().enumerate() {
        field.set(
            off[0],
            off[1],
            off[2],
            VoxelSample {
                distance: densities[i],
                material: MaterialId(0),
            },
        );
    }
    field
}

fn terrain_params() -> GenParams {
    GenParams {
        chunk_width: 8,
        chunk_height: 8,
        surface_threshold: THRESHOLD,
        height_frequency: 0.05,
        min_y_ratio: 0.2,
        max_y_ratio: 0.8,
    }
}

fn terrain_field() -> VoxelField {
    let params = terrain_params();
    let heights = HeightField::new(7, &params);
    let catalog = MaterialCatalog::from_toml_str(
        r#"
        [materials]
        dirt = ["assets/textures/dirt.png"]
        grass = ["assets/textures/grass.png"]
        rock = ["assets/textures/rock.png"]
        "#,
    )
    .unwrap();
    generate_field(
        ChunkCoord::new(0, 0),
        &params,
        &heights,
        &catalog,
        &NoNeighbors,
        7,
    )
    .field
}

#[test]
fn uniform_fields_mesh_to_nothing() {
    let solid = cube_field([0.0; 8]);
    assert!(build_chunk_mesh(&solid, THRESHOLD).is_none());

    let empty = cube_field([1.0; 8]);
    assert!(build_chunk_mesh(&empty, THRESHOLD).is_none());
}

#[test]
fn single_corner_past_threshold_emits_one_triangle() {
    let mut densities = [0.0f32; 8];
    densities[0] = 1.0;
    let field = cube_field(densities);
    let mesh = build_chunk_mesh(&field, THRESHOLD).expect("one cut corner carries surface");
    assert_eq!(mesh.build.triangle_count(), 1);
    assert_eq!(mesh.build.vertex_count(), 3);
}

#[test]
fn face_split_cube_emits_a_midpoint_quad() {
    // Corners 0..3 sit past the threshold, 4..7 below: the cut runs through
    // the four ring-spanning edges, halfway along each.
    let field = cube_field([1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    let mesh = build_chunk_mesh(&field, THRESHOLD).expect("face split carries surface");

    assert_eq!(mesh.build.triangle_count(), 2);
    assert_eq!(mesh.build.vertex_count(), 4);
    assert_eq!(mesh.build.idx.len(), 6);

    let mut crossings: Vec<(f32, f32, f32)> = mesh
        .build
        .pos
        .iter()
        .map(|v| (v.x, v.y, v.z))
        .collect();
    crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        crossings,
        vec![
            (0.0, 0.0, 0.5),
            (0.0, 1.0, 0.5),
            (1.0, 0.0, 0.5),
            (1.0, 1.0, 0.5),
        ]
    );
}

#[test]
fn vertices_take_the_cell_corner_material() {
    let mut field = VoxelField::new(ChunkCoord::new(0, 0), 1, 1);
    for off in CORNER_OFFSETS {
        let distance = if off[2] == 0 { 1.0 } else { 0.0 };
        field.set(
            off[0],
            off[1],
            off[2],
            VoxelSample {
                distance,
                material: MaterialId(3),
            },
        );
    }
    let mesh = build_chunk_mesh(&field, THRESHOLD).unwrap();
    for (uv, mat) in mesh.build.uv.iter().zip(&mesh.build.mat) {
        assert_eq!(*mat, MaterialId(3));
        assert_eq!(*uv, [3.0, 0.0]);
    }
}

#[test]
fn generated_terrain_meshes_cleanly() {
    let field = terrain_field();
    let mesh = build_chunk_mesh(&field, THRESHOLD).expect("terrain band crosses the chunk");
    let build = &mesh.build;

    assert_eq!(build.idx.len() % 3, 0);
    assert!(!build.idx.is_empty());
    for &i in &build.idx {
        assert!((i as usize) < build.vertex_count());
    }
    assert_eq!(build.norm.len(), build.vertex_count());
    assert_eq!(build.uv.len(), build.vertex_count());
    assert_eq!(build.mat.len(), build.vertex_count());

    // Dedup contract: no two emitted vertices share coordinates
    for (i, a) in build.pos.iter().enumerate() {
        for b in build.pos.iter().skip(i + 1) {
            assert!(a != b, "duplicate vertex at {a:?}");
        }
    }

    for n in &build.norm {
        assert!(n.x.is_finite() && n.y.is_finite() && n.z.is_finite());
    }

    // Local positions stay inside the chunk cell volume, and offsetting by
    // the chunk origin lands inside the world-space bounds
    let w = field.width() as f32;
    let h = field.height() as f32;
    let origin = Vec3::new(mesh.coord.wx as f32, 0.0, mesh.coord.wz as f32);
    for p in &build.pos {
        assert!(p.x >= 0.0 && p.x <= w);
        assert!(p.y >= 0.0 && p.y <= h);
        assert!(p.z >= 0.0 && p.z <= w);
        assert!(mesh.bbox.contains(*p + origin));
    }
}

#[test]
fn meshing_twice_is_identical() {
    let field = terrain_field();
    let a = build_chunk_mesh(&field, THRESHOLD).unwrap();
    let b = build_chunk_mesh(&field, THRESHOLD).unwrap();

    assert_eq!(a.build.pos.len(), b.build.pos.len());
    for (va, vb) in a.build.pos.iter().zip(&b.build.pos) {
        assert_eq!(va, vb);
    }
    assert_eq!(a.build.idx, b.build.idx);
    assert_eq!(a.build.uv, b.build.uv);
    assert_eq!(a.build.mat, b.build.mat);
}

#[test]
fn reused_buffer_carries_no_stale_geometry() {
    let field = terrain_field();
    let mut build = MeshBuild::default();
    march_field_into(&field, THRESHOLD, &mut build);
    let first_pos = build.pos.clone();
    let first_idx = build.idx.clone();

    // A second pass into the same buffer must replace, not append
    march_field_into(&field, THRESHOLD, &mut build);
    assert_eq!(build.pos, first_pos);
    assert_eq!(build.idx, first_idx);

    // Meshing a surfaceless field into the dirty buffer empties it
    let solid = cube_field([0.0; 8]);
    march_field_into(&solid, THRESHOLD, &mut build);
    assert_eq!(build.vertex_count(), 0);
    assert!(build.idx.is_empty());
}

#[test]
fn sink_receives_replacement_meshes() {
    struct Last {
        coord: Option<ChunkCoord>,
        deliveries: usize,
        vertices: usize,
    }
    impl MeshSink for Last {
        fn replace_chunk_mesh(&mut self, mesh: &ChunkMeshCpu) {
            self.coord = Some(mesh.coord);
            self.deliveries += 1;
            self.vertices = mesh.build.vertex_count();
        }
    }

    let field = terrain_field();
    let mut sink = Last {
        coord: None,
        deliveries: 0,
        vertices: 0,
    };
    let mesh = build_chunk_mesh(&field, THRESHOLD).unwrap();
    sink.replace_chunk_mesh(&mesh);
    let mesh = build_chunk_mesh(&field, THRESHOLD).unwrap();
    sink.replace_chunk_mesh(&mesh);

    assert_eq!(sink.deliveries, 2);
    assert_eq!(sink.coord, Some(ChunkCoord::new(0, 0)));
    assert_eq!(sink.vertices, mesh.build.vertex_count());
}
