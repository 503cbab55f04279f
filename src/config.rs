use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builder::TagCloudBuilder;
use crate::render::DEFAULT_JPEG_QUALITY;
use crate::{ColorScheme, Error, Result, DEFAULT_FONT_SIZES};

/// Settings read from a JSON config file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudConfig {
    pub width: u32,
    pub height: u32,
    pub radius: f64,
    pub font_sizes: Vec<f32>,
    pub colors: Vec<String>,
    pub background: String,
    pub font: Option<PathBuf>,
    pub seed: Option<u64>,
    pub max_iterations: Option<usize>,
    pub quality: u8,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            radius: 25.0,
            font_sizes: DEFAULT_FONT_SIZES.to_vec(),
            colors: ColorScheme::Classic
                .colors()
                .into_iter()
                .map(String::from)
                .collect(),
            background: "#FFFFFF".into(),
            font: None,
            seed: None,
            max_iterations: None,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CloudConfig {
    /// Builder carrying every setting except the font bytes.
    pub fn builder(&self) -> TagCloudBuilder {
        let mut builder = TagCloudBuilder::new()
            .size(self.width, self.height)
            .radius(self.radius)
            .font_sizes(self.font_sizes.iter().copied())
            .colors(self.colors.iter().cloned())
            .background(self.background.clone());
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(limit) = self.max_iterations {
            builder = builder.max_iterations(limit);
        }
        builder
    }
}

pub fn parse_config(contents: &str) -> Result<CloudConfig> {
    serde_json::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<CloudConfig> {
    let Some(path) = path else {
        return Ok(CloudConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}
