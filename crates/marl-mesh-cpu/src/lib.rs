//! CPU marching-cubes mesher for voxel density fields.
#![forbid(unsafe_code)]

mod mesh_build;
pub mod tables;

pub use mesh_build::MeshBuild;

use std::time::Instant;

use marl_field::VoxelField;
use marl_geom::{Aabb, Vec3};
use marl_world::ChunkCoord;

use tables::{CORNER_OFFSETS, EDGE_CORNERS, TRI_TABLE};

/// One chunk's triangulated surface, positioned by the chunk coordinate.
/// Vertex positions are chunk-local; `bbox` is world-space.
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub build: MeshBuild,
}

/// Rendering/physics consumer of finished chunk geometry. A delivery fully
/// replaces whatever the sink held for the same chunk coordinate.
pub trait MeshSink {
    fn replace_chunk_mesh(&mut self, mesh: &ChunkMeshCpu);
}

/// Surface crossing along a cell edge from `p1` to `p2` with densities `s1`
/// and `s2`. A zero gradient cannot be interpolated; the threshold value
/// doubles as the fraction then, which keeps the point finite but lands off
/// the midpoint for thresholds away from 0.5.
#[inline]
pub fn surface_crossing(p1: Vec3, p2: Vec3, s1: f32, s2: f32, threshold: f32) -> Vec3 {
    let difference = s2 - s1;
    let t = if difference == 0.0 {
        threshold
    } else {
        (threshold - s1) / difference
    };
    p1.lerp(p2, t)
}

/// Corner classification: bit `i` set when corner `i` lies past the
/// threshold. 0 and 255 carry no surface.
#[inline]
fn cell_configuration(cube: &[f32; 8], threshold: f32) -> u8 {
    let mut config = 0u8;
    for (i, d) in cube.iter().enumerate() {
        if *d > threshold {
            config |= 1 << i;
        }
    }
    config
}

#[inline]
fn corner_vec(corner: usize) -> Vec3 {
    let o = CORNER_OFFSETS[corner];
    Vec3::new(o[0] as f32, o[1] as f32, o[2] as f32)
}

fn march_cell(
    field: &VoxelField,
    threshold: f32,
    x: usize,
    y: usize,
    z: usize,
    build: &mut MeshBuild,
) {
    let mut cube = [0.0f32; 8];
    for (i, off) in CORNER_OFFSETS.iter().enumerate() {
        cube[i] = field.get(x + off[0], y + off[1], z + off[2]).distance;
    }
    let config = cell_configuration(&cube, threshold);
    if config == 0 || config == 255 {
        return;
    }

    // Texture selection is per cell: the sample at the cell's own corner,
    // not at the interpolated point.
    let cell_material = field.get(x, y, z).material;
    let origin = Vec3::new(x as f32, y as f32, z as f32);

    for slot in TRI_TABLE[config as usize] {
        if slot < 0 {
            break;
        }
        let [c1, c2] = EDGE_CORNERS[slot as usize];
        let p1 = origin + corner_vec(c1);
        let p2 = origin + corner_vec(c2);
        let point = surface_crossing(p1, p2, cube[c1], cube[c2], threshold);
        let index = build.vertex_for_point(point, cell_material);
        build.idx.push(index);
    }
}

/// Walks every cell of the field and emits the isosurface at `threshold`
/// into `build`. The buffer is cleared first; nothing from a prior pass
/// survives. Two passes over an unmodified field produce identical buffers.
pub fn march_field_into(field: &VoxelField, threshold: f32, build: &mut MeshBuild) {
    build.clear_keep_capacity();
    let w = field.width();
    let h = field.height();
    for x in 0..w {
        for y in 0..h {
            for z in 0..w {
                march_cell(field, threshold, x, y, z, build);
            }
        }
    }
    if !build.idx.is_empty() {
        build.recompute_normals();
    }
}

/// [`march_field_into`] plus packaging: a fresh buffer wrapped with the
/// chunk coordinate and world-space bounds. `None` when no cell crosses the
/// surface.
pub fn build_chunk_mesh(field: &VoxelField, threshold: f32) -> Option<ChunkMeshCpu> {
    let t_start = Instant::now();
    let mut build = MeshBuild::default();
    march_field_into(field, threshold, &mut build);
    if build.idx.is_empty() {
        return None;
    }

    let w = field.width();
    let h = field.height();
    let coord = field.coord();
    let ms = t_start.elapsed().as_millis();
    log::info!(
        target: "perf",
        "ms={} mesher_march_build verts={} tris={} dims=({}, {}, {}) origin=({}, {})",
        ms,
        build.vertex_count(),
        build.triangle_count(),
        w,
        h,
        w,
        coord.wx,
        coord.wz
    );

    let min = Vec3::new(coord.wx as f32, 0.0, coord.wz as f32);
    let max = Vec3::new(
        coord.wx as f32 + w as f32,
        h as f32,
        coord.wz as f32 + w as f32,
    );
    Some(ChunkMeshCpu {
        coord,
        bbox: Aabb::new(min, max),
        build,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_interpolates_between_samples() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 1.0, 0.0);
        // Samples 1.0 and 0.0 around a 0.5 threshold cross halfway
        let mid = surface_crossing(p1, p2, 1.0, 0.0, 0.5);
        assert_eq!(mid, Vec3::new(0.0, 0.5, 0.0));
        // Asymmetric gradient: t = (0.5 - 1.0) / (-2.0) = 0.25
        let quarter = surface_crossing(p1, p2, 1.0, -1.0, 0.5);
        assert_eq!(quarter, Vec3::new(0.0, 0.25, 0.0));
    }

    #[test]
    fn zero_gradient_falls_back_to_threshold_fraction() {
        let p1 = Vec3::new(2.0, 0.0, 0.0);
        let p2 = Vec3::new(3.0, 0.0, 0.0);
        let point = surface_crossing(p1, p2, 0.5, 0.5, 0.5);
        assert!(point.x.is_finite() && point.y.is_finite() && point.z.is_finite());
        // The fraction is the threshold itself, not a fixed midpoint
        assert_eq!(point, Vec3::new(2.5, 0.0, 0.0));
        let low = surface_crossing(p1, p2, 0.2, 0.2, 0.2);
        assert_eq!(low, Vec3::new(2.2, 0.0, 0.0));
    }

    #[test]
    fn configuration_sets_bits_past_threshold() {
        let cube = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(cell_configuration(&cube, 0.5), 0b0000_1111);
        let solid = [0.0f32; 8];
        assert_eq!(cell_configuration(&solid, 0.5), 0);
        let empty = [1.0f32; 8];
        assert_eq!(cell_configuration(&empty, 0.5), 255);
        // Exactly-at-threshold corners stay unset
        let on_edge = [0.5f32; 8];
        assert_eq!(cell_configuration(&on_edge, 0.5), 0);
    }
}
