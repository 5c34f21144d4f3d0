//! Chunk addressing, terrain parameters, and the height source.
#![forbid(unsafe_code)]

mod chunk_coord;
mod height;
pub mod worldgen;

pub use chunk_coord::ChunkCoord;
pub use height::HeightField;
pub use worldgen::{GenConfig, GenParams, load_params_from_path};
