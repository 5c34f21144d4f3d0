use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::GenParams;

/// Deterministic terrain height per world XZ column. The noise band is
/// remapped into `[chunk_height * min_y_ratio, chunk_height * max_y_ratio]`
/// so the surface always crosses the vertical sample range.
pub struct HeightField {
    terrain: FastNoiseLite,
    min_h: f32,
    span: f32,
}

impl HeightField {
    pub fn new(seed: i32, params: &GenParams) -> Self {
        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(params.height_frequency));
        let world_h = params.chunk_height as f32;
        let min_h = world_h * params.min_y_ratio;
        let max_h = world_h * params.max_y_ratio;
        Self {
            terrain,
            min_h,
            span: max_h - min_h,
        }
    }

    /// Pure: the same `(wx, wz)` always yields the same height, on every
    /// chunk that samples this column.
    #[inline]
    pub fn height_at(&self, wx: i32, wz: i32) -> f32 {
        let noise = self.terrain.get_noise_2d(wx as f32, wz as f32);
        self.min_h + (noise + 1.0) * 0.5 * self.span
    }
}
