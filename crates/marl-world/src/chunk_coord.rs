use serde::{Deserialize, Serialize};

/// World-space origin of a chunk on the XZ plane, always a multiple of the
/// configured chunk width on both axes. Chunks sit at y = 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub wx: i32,
    pub wz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(wx: i32, wz: i32) -> Self {
        Self { wx, wz }
    }

    /// Coordinate shifted by a world-space offset; neighbor lookups pass
    /// `±chunk_width` here.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            wx: self.wx + dx,
            wz: self.wz + dz,
        }
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.wx, value.wz)
    }
}
