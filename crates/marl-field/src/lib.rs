//! Per-chunk voxel density field and its population from the height source.
#![forbid(unsafe_code)]

use marl_materials::{MaterialCatalog, MaterialId};
use marl_world::{ChunkCoord, GenParams, HeightField};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// One grid point: signed distance to the terrain surface plus the material
/// applied to vertices emitted from cells cornered here. Distances below the
/// surface threshold are solid ground.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoxelSample {
    pub distance: f32,
    pub material: MaterialId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("sample ({x}, {y}, {z}) outside the chunk grid [0, {max_x}] x [0, {max_y}] x [0, {max_z}]")]
    OutOfBounds {
        x: i32,
        y: i32,
        z: i32,
        max_x: usize,
        max_y: usize,
        max_z: usize,
    },
}

/// Dense grid of `(width+1) x (height+1) x (width+1)` samples owned by one
/// chunk. Cells need all 8 corner samples, hence the extra sample per axis.
/// Created once at generation time and mutated in place by edits; never
/// resized.
#[derive(Clone, Debug)]
pub struct VoxelField {
    coord: ChunkCoord,
    width: usize,
    height: usize,
    samples: Vec<VoxelSample>,
}

impl VoxelField {
    pub fn new(coord: ChunkCoord, width: usize, height: usize) -> Self {
        let len = (width + 1) * (height + 1) * (width + 1);
        Self {
            coord,
            width,
            height,
            samples: vec![VoxelSample::default(); len],
        }
    }

    /// Builds a field from pre-computed samples, resizing to the exact grid
    /// length when the input disagrees.
    pub fn from_samples(
        coord: ChunkCoord,
        width: usize,
        height: usize,
        samples: Vec<VoxelSample>,
    ) -> Self {
        let mut s = samples;
        let expect = (width + 1) * (height + 1) * (width + 1);
        if s.len() != expect {
            s.resize(expect, VoxelSample::default());
        }
        Self {
            coord,
            width,
            height,
            samples: s,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Cell count per horizontal axis; samples run `[0, width]`.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell count on the vertical axis; samples run `[0, height]`.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn nx(&self) -> usize {
        self.width + 1
    }

    #[inline]
    fn ny(&self) -> usize {
        self.height + 1
    }

    #[inline]
    fn nz(&self) -> usize {
        self.width + 1
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.nz() + z) * self.nx() + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelSample {
        self.samples[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, sample: VoxelSample) {
        let i = self.idx(x, y, z);
        self.samples[i] = sample;
    }

    #[inline]
    pub fn contains_local(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.nx()
            && (y as usize) < self.ny()
            && (z as usize) < self.nz()
    }

    /// Checked distance write for editors working from converted world
    /// coordinates. Out-of-range indices are a caller contract violation and
    /// reported, never wrapped or clamped.
    pub fn try_set_distance(&mut self, x: i32, y: i32, z: i32, distance: f32) -> Result<(), FieldError> {
        if !self.contains_local(x, y, z) {
            return Err(FieldError::OutOfBounds {
                x,
                y,
                z,
                max_x: self.width,
                max_y: self.height,
                max_z: self.width,
            });
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.samples[i].distance = distance;
        Ok(())
    }
}

/// Read-only neighbor resolution, keyed by chunk coordinate arithmetic. A
/// miss means the neighbor has not been generated yet and is a normal
/// outcome, not a failure.
pub trait FieldLookup {
    fn field_at(&self, coord: ChunkCoord) -> Option<&VoxelField>;
}

/// Lookup that always misses; standalone generation and tests.
pub struct NoNeighbors;

impl FieldLookup for NoNeighbors {
    fn field_at(&self, _coord: ChunkCoord) -> Option<&VoxelField> {
        None
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldOccupancy {
    /// Every sample sits on one side of the threshold; no surface crosses
    /// this chunk and meshing it produces nothing.
    Uniform,
    /// Samples straddle the threshold; the chunk carries surface.
    Mixed,
}

impl FieldOccupancy {
    #[inline]
    pub fn has_surface(self) -> bool {
        matches!(self, FieldOccupancy::Mixed)
    }
}

#[derive(Clone, Debug)]
pub struct FieldGenerateResult {
    pub field: VoxelField,
    pub occupancy: FieldOccupancy,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// RNG derived from the world seed and the chunk coordinate, so population
/// is reproducible and independent of generation order.
fn chunk_rng(seed: i32, coord: ChunkCoord) -> ChaCha8Rng {
    let mixed = (seed as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (coord.wx as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (coord.wz as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    ChaCha8Rng::seed_from_u64(mixed)
}

/// Fills a fresh field for `coord`: one material draw per XZ column, distance
/// `y - height` per sample, and edge columns reconciled against already
/// generated neighbors so surface textures match across the boundary.
///
/// Edge reconciliation is a priority chain -- min X, then min Z, then max X,
/// then max Z -- and only the first matching edge is consulted, so a corner
/// column reconciles against a single neighbor. The top and bottom of the
/// chunk are never reconciled.
pub fn generate_field(
    coord: ChunkCoord,
    params: &GenParams,
    heights: &HeightField,
    catalog: &MaterialCatalog,
    neighbors: &dyn FieldLookup,
    seed: i32,
) -> FieldGenerateResult {
    let w = params.chunk_width;
    let h = params.chunk_height;
    let mut field = VoxelField::new(coord, w, h);
    let mut rng = chunk_rng(seed, coord);
    let mut min_distance = f32::MAX;
    let mut max_distance = f32::MIN;

    for x in 0..=w {
        for z in 0..=w {
            let column_material = MaterialId(rng.gen_range(0..catalog.len().max(1)) as u16);

            // First matching edge wins; the mirrored column is the
            // neighbor's outermost cell column on the facing side.
            let wi = w as i32;
            let edge_source: Option<(&VoxelField, usize, usize)> = if x == 0 {
                neighbors
                    .field_at(coord.offset(-wi, 0))
                    .map(|nf| (nf, w - 1, z))
            } else if z == 0 {
                neighbors
                    .field_at(coord.offset(0, -wi))
                    .map(|nf| (nf, x, w - 1))
            } else if x == w - 1 {
                neighbors.field_at(coord.offset(wi, 0)).map(|nf| (nf, 0, z))
            } else if z == w - 1 {
                neighbors.field_at(coord.offset(0, wi)).map(|nf| (nf, x, 0))
            } else {
                None
            };

            let terrain_height = heights.height_at(coord.wx + x as i32, coord.wz + z as i32);
            for y in 0..=h {
                let distance = y as f32 - terrain_height;
                min_distance = min_distance.min(distance);
                max_distance = max_distance.max(distance);
                let material = match edge_source {
                    Some((nf, mx, mz)) => nf.get(mx, y, mz).material,
                    None => column_material,
                };
                field.set(x, y, z, VoxelSample { distance, material });
            }
        }
    }

    let occupancy = if min_distance > params.surface_threshold
        || max_distance <= params.surface_threshold
    {
        FieldOccupancy::Uniform
    } else {
        FieldOccupancy::Mixed
    };
    log::debug!(
        target: "gen",
        "populate chunk=({}, {}) dims=({}, {}, {}) span=[{:.2}, {:.2}] occupancy={:?}",
        coord.wx,
        coord.wz,
        w,
        h,
        w,
        min_distance,
        max_distance,
        occupancy
    );

    FieldGenerateResult {
        field,
        occupancy,
        min_distance,
        max_distance,
    }
}
