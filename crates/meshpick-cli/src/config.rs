//! TOML configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use meshpick::{BvhSettings, CameraSettings};
use serde::Deserialize;

/// Settings read from `--config`. Every section and field is optional.
///
/// ```toml
/// [bvh]
/// max_leaf_faces = 4
///
/// [camera]
/// eye = [0.0, -6.0, 8.0]
/// width = 1280
/// height = 720
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bvh: BvhSettings,
    pub camera: CameraSettings,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.camera.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn override_bvh(&mut self, leaf_size: Option<usize>, max_depth: Option<usize>) {
        if let Some(n) = leaf_size {
            self.bvh.max_leaf_faces = n;
        }
        if let Some(d) = max_depth {
            self.bvh.max_depth = d;
        }
    }
}
