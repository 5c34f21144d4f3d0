//! Single-voxel terrain edits and re-mesh bookkeeping.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use marl_field::{FieldError, VoxelField};
use marl_geom::Vec3;
use marl_world::ChunkCoord;

/// Distance written when material is placed; at or below any sensible
/// threshold, so the sample classifies as solid.
pub const PLACED_DISTANCE: f32 = 0.0;
/// Distance written when material is removed; past the threshold, so the
/// sample classifies as empty.
pub const REMOVED_DISTANCE: f32 = 1.0;

fn local_voxel(coord: ChunkCoord, pos: Vec3, round: fn(f32) -> f32) -> (i32, i32, i32) {
    (
        round(pos.x) as i32 - coord.wx,
        round(pos.y) as i32,
        round(pos.z) as i32 - coord.wz,
    )
}

/// Marks the grid sample at the ceiling of `world_pos` as solid. The caller
/// owns pre-validating that the position lands in this chunk; a miss is a
/// contract violation and comes back as `FieldError::OutOfBounds`.
///
/// Only this chunk's own field is touched. An edit on a shared boundary
/// column leaves the neighbor's copy of that face untouched, which can
/// reopen a seam there.
pub fn place_terrain(field: &mut VoxelField, world_pos: Vec3) -> Result<(), FieldError> {
    let (x, y, z) = local_voxel(field.coord(), world_pos, f32::ceil);
    field.try_set_distance(x, y, z, PLACED_DISTANCE)
}

/// Marks the grid sample at the floor of `world_pos` as empty. Same bounds
/// contract as [`place_terrain`].
pub fn remove_terrain(field: &mut VoxelField, world_pos: Vec3) -> Result<(), FieldError> {
    let (x, y, z) = local_voxel(field.coord(), world_pos, f32::floor);
    field.try_set_distance(x, y, z, REMOVED_DISTANCE)
}

/// Tracks which chunks carry edits newer than their last built mesh. Every
/// edit bumps its chunk; the driver re-meshes chunks whose revision is ahead
/// of the built stamp and marks them built again.
#[derive(Default)]
pub struct EditTracker {
    rev: HashMap<ChunkCoord, u64>,
    built: HashMap<ChunkCoord, u64>,
    counter: u64,
}

impl EditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a change to `coord`. Returns a new monotonically increasing
    /// stamp.
    pub fn bump(&mut self, coord: ChunkCoord) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        let stamp = self.counter;
        self.rev.insert(coord, stamp);
        stamp
    }

    pub fn rev(&self, coord: ChunkCoord) -> u64 {
        self.rev.get(&coord).copied().unwrap_or(0)
    }

    pub fn built_rev(&self, coord: ChunkCoord) -> u64 {
        self.built.get(&coord).copied().unwrap_or(0)
    }

    /// Marks `coord` as built at `rev`; stale stamps never move it backwards.
    pub fn mark_built(&mut self, coord: ChunkCoord, rev: u64) {
        let e = self.built.entry(coord).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn needs_rebuild(&self, coord: ChunkCoord) -> bool {
        self.rev(coord) > self.built_rev(coord)
    }
}
