/*!
 * Tagcloud
 *
 * Weighted tag clouds laid out on an expanding spiral: heavier words get
 * bigger font tiers, every word is walked outwards from the canvas centre
 * until it no longer overlaps anything placed before it.
 */

pub mod builder;
pub mod config;
pub mod input;
pub mod layout;
pub mod measure;
pub mod render;

#[cfg(feature = "cli")]
pub mod cli;

use thiserror::Error;

pub use builder::TagCloudBuilder;
pub use config::{load_config, CloudConfig};
pub use input::{parse_words, read_words, sort_by_weight};
pub use layout::{bucket, in_boundary, layout, overlaps, BoundingBox, LayoutOptions, LayoutSession};
pub use measure::{FontMeasurer, TextMeasure};
pub use render::{OutputFormat, TagCloud};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Error)]
pub enum Error {
    #[error("Font error: {0}")]
    Font(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Word list cannot be empty")]
    EmptyBatch,
    #[error("Could not place '{text}' after {attempts} attempts")]
    Placement { text: String, attempts: usize },
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// =============================================================================
// Public Data Types
// =============================================================================

/// Font size per tier, smallest first.
pub const DEFAULT_FONT_SIZES: [f32; 5] = [15.0, 17.0, 19.0, 21.0, 50.0];

/// A word and its weight, as read from the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedWord {
    pub text: String,
    pub weight: i64,
}

impl WeightedWord {
    pub fn new(text: impl Into<String>, weight: i64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// A word that found a free spot on the canvas.
///
/// `x`/`y` is the top-left corner of the measured text box; `tier` indexes
/// the font sizes and `color` the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub text: String,
    pub tier: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: usize,
}

impl PlacedLabel {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }
}

/// Preset palettes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Classic,
    Ocean,
    Sunset,
    Forest,
    Berry,
    Monochrome,
    Rainbow,
}

impl ColorScheme {
    pub fn colors(&self) -> Vec<&'static str> {
        match self {
            ColorScheme::Classic => vec![
                "#F2B701", "#E57D04", "#DC0030", "#B10058", "#7C378A", "#3465AA", "#09A275",
                "#85BC5F", "#39d", "#aab5f0",
            ],
            ColorScheme::Ocean => vec!["#264653", "#287271", "#2a9d8f", "#8ab17d", "#e9c46a"],
            ColorScheme::Sunset => vec!["#f94144", "#f3722c", "#f8961e", "#f9844a", "#f9c74f"],
            ColorScheme::Forest => vec!["#2d6a4f", "#40916c", "#52b788", "#74c69d", "#95d5b2"],
            ColorScheme::Berry => vec!["#7b2cbf", "#9d4edd", "#c77dff", "#e0aaff", "#ff6d00"],
            ColorScheme::Monochrome => vec!["#212529", "#495057", "#6c757d", "#adb5bd", "#ced4da"],
            ColorScheme::Rainbow => {
                vec![
                    "#e63946", "#f4a261", "#e9c46a", "#2a9d8f", "#457b9d", "#7b2cbf",
                ]
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Some(ColorScheme::Classic),
            "ocean" => Some(ColorScheme::Ocean),
            "sunset" => Some(ColorScheme::Sunset),
            "forest" => Some(ColorScheme::Forest),
            "berry" => Some(ColorScheme::Berry),
            "monochrome" => Some(ColorScheme::Monochrome),
            "rainbow" => Some(ColorScheme::Rainbow),
            _ => None,
        }
    }
}

/// Lay out `(text, weight)` pairs with default settings and the given font.
pub fn generate(words: &[(&str, i64)], font_data: Vec<u8>) -> Result<TagCloud> {
    let inputs: Vec<WeightedWord> = words
        .iter()
        .map(|(text, weight)| WeightedWord::new(*text, *weight))
        .collect();

    TagCloudBuilder::new().font(font_data).build(&inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_names_resolve() {
        assert_eq!(ColorScheme::from_name("Ocean"), Some(ColorScheme::Ocean));
        assert_eq!(ColorScheme::from_name("classic"), Some(ColorScheme::Classic));
        assert_eq!(ColorScheme::from_name("plaid"), None);
    }

    #[test]
    fn placed_label_bounds_match_fields() {
        let label = PlacedLabel {
            text: "a".into(),
            tier: 0,
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            color: 0,
        };
        assert_eq!(label.bounds(), BoundingBox::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn generate_rejects_bad_font() {
        assert!(matches!(
            generate(&[("x", 1)], b"nope".to_vec()),
            Err(Error::Font(_))
        ));
    }
}
