use std::path::Path;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::layout::{layout, LayoutOptions};
use crate::measure::{FontMeasurer, TextMeasure};
use crate::render::TagCloud;
use crate::{ColorScheme, Error, Result, WeightedWord, DEFAULT_FONT_SIZES};

const FALLBACK_FAMILY: &str = "sans-serif";

fn extract_font_family_name(font_data: &[u8]) -> Option<String> {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_source(usvg::fontdb::Source::Binary(Arc::new(font_data.to_vec())));
    for face in db.faces() {
        if let Some((name, _)) = face.families.first() {
            return Some(name.clone());
        }
    }
    None
}

// =============================================================================
// Builder
// =============================================================================

pub struct TagCloudBuilder {
    width: u32,
    height: u32,
    radius: f64,
    background: String,
    colors: Vec<String>,
    font_data: Option<Vec<u8>>,
    font_sizes: Vec<f32>,
    seed: Option<u64>,
    max_iterations: Option<usize>,
}

impl Default for TagCloudBuilder {
    fn default() -> Self {
        let options = LayoutOptions::default();
        Self {
            width: options.width,
            height: options.height,
            radius: options.initial_radius,
            background: "#FFFFFF".into(),
            colors: ColorScheme::Classic
                .colors()
                .into_iter()
                .map(String::from)
                .collect(),
            font_data: None,
            font_sizes: DEFAULT_FONT_SIZES.to_vec(),
            seed: None,
            max_iterations: None,
        }
    }
}

impl TagCloudBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Radius the spiral search starts from.
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.colors = scheme.colors().into_iter().map(String::from).collect();
        self
    }

    pub fn colors(mut self, colors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.colors = colors.into_iter().map(|c| c.into()).collect();
        if self.colors.is_empty() {
            return self.color_scheme(ColorScheme::Classic);
        }
        self
    }

    pub fn font(mut self, font_data: Vec<u8>) -> Self {
        self.font_data = Some(font_data);
        self
    }

    pub fn font_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        Ok(self.font(data))
    }

    /// Font size per tier, smallest first. Empty input keeps the defaults.
    pub fn font_sizes(mut self, sizes: impl IntoIterator<Item = f32>) -> Self {
        let sizes: Vec<f32> = sizes.into_iter().filter(|s| *s > 0.0).collect();
        if !sizes.is_empty() {
            self.font_sizes = sizes;
        }
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Give up on a word after this many candidate positions.
    pub fn max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit.max(1));
        self
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            width: self.width,
            height: self.height,
            initial_radius: self.radius,
            font_sizes: self.font_sizes.clone(),
            palette_size: self.colors.len(),
            max_iterations: self.max_iterations,
            ..LayoutOptions::default()
        }
    }

    /// Lay out `words` measuring with the configured font.
    pub fn build(self, words: &[WeightedWord]) -> Result<TagCloud> {
        let font_data = self
            .font_data
            .as_deref()
            .ok_or_else(|| Error::Font("No font supplied".into()))?;
        let measurer = FontMeasurer::from_bytes(font_data)?;
        self.build_with(words, &measurer)
    }

    /// Lay out `words` with a caller supplied measurer. Without a font the
    /// result can still be exported as SVG.
    pub fn build_with<M: TextMeasure + ?Sized>(
        self,
        words: &[WeightedWord],
        measurer: &M,
    ) -> Result<TagCloud> {
        let options = self.layout_options();
        let rng = match self.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };

        let labels = layout(words, &options, measurer, rng)?;

        let font_data = self.font_data.unwrap_or_default();
        let font_family =
            extract_font_family_name(&font_data).unwrap_or_else(|| FALLBACK_FAMILY.to_string());
        let ascents = options
            .font_sizes
            .iter()
            .map(|size| measurer.ascent(*size))
            .collect();

        Ok(TagCloud {
            width: options.width,
            height: options.height,
            background: self.background,
            labels,
            font_sizes: options.font_sizes,
            colors: self.colors,
            ascents,
            font_data,
            font_family,
        })
    }
}
