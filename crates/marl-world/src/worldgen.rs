use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct GenConfig {
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            height: Height::default(),
            surface: Surface::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Grid {
    #[serde(default = "default_chunk_width")]
    pub chunk_width: usize,
    #[serde(default = "default_chunk_height")]
    pub chunk_height: usize,
}

fn default_chunk_width() -> usize {
    16
}

fn default_chunk_height() -> usize {
    16
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            chunk_width: default_chunk_width(),
            chunk_height: default_chunk_height(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_min_y_ratio")]
    pub min_y_ratio: f32,
    #[serde(default = "default_max_y_ratio")]
    pub max_y_ratio: f32,
}

fn default_frequency() -> f32 {
    0.02
}

fn default_min_y_ratio() -> f32 {
    0.2
}

fn default_max_y_ratio() -> f32 {
    0.8
}

impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            min_y_ratio: default_min_y_ratio(),
            max_y_ratio: default_max_y_ratio(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    0.5
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct GenParams {
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub surface_threshold: f32,
    pub height_frequency: f32,
    pub min_y_ratio: f32,
    pub max_y_ratio: f32,
}

impl GenParams {
    pub fn from_config(cfg: &GenConfig) -> Self {
        Self {
            chunk_width: cfg.grid.chunk_width,
            chunk_height: cfg.grid.chunk_height,
            surface_threshold: cfg.surface.threshold,
            height_frequency: cfg.height.frequency,
            min_y_ratio: cfg.height.min_y_ratio,
            max_y_ratio: cfg.height.max_y_ratio,
        }
    }
}

impl Default for GenParams {
    fn default() -> Self {
        Self::from_config(&GenConfig::default())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<GenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: GenConfig = toml::from_str(&s)?;
    Ok(GenParams::from_config(&cfg))
}
