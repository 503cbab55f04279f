//! Drawing a finished layout and encoding it to disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use rand::Rng;
use tiny_skia::{Pixmap, Transform};
use tracing::debug;

use crate::{Error, PlacedLabel, Result, WeightedWord};

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

// =============================================================================
// Output Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Svg,
}

impl OutputFormat {
    /// Picks the format from the file extension; unknown or missing
    /// extensions fall back to JPEG.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => OutputFormat::Png,
            Some("svg") => OutputFormat::Svg,
            _ => OutputFormat::Jpeg,
        }
    }
}

/// Output file named after a randomly chosen word, e.g. `rust.jpg`.
pub fn default_output_path<R: Rng>(words: &[WeightedWord], rng: &mut R) -> Result<PathBuf> {
    if words.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let pick = &words[rng.random_range(0..words.len())];
    Ok(PathBuf::from(format!("{}.jpg", pick.text)))
}

// =============================================================================
// Tag Cloud
// =============================================================================

/// A laid out cloud together with everything needed to draw it.
pub struct TagCloud {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub labels: Vec<PlacedLabel>,
    pub font_sizes: Vec<f32>,
    pub colors: Vec<String>,
    /// Baseline offset from the top of the label box, per tier.
    pub(crate) ascents: Vec<f32>,
    pub(crate) font_data: Vec<u8>,
    pub(crate) font_family: String,
}

impl TagCloud {
    pub fn font_size(&self, label: &PlacedLabel) -> f32 {
        self.font_sizes.get(label.tier).copied().unwrap_or_default()
    }

    pub fn color(&self, label: &PlacedLabel) -> &str {
        self.colors
            .get(label.color)
            .map(String::as_str)
            .unwrap_or("#000000")
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(256 + self.labels.len() * 96);

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape_xml(&self.background)
        ));

        svg.push_str(&format!(
            r#"<style>text{{font-family:'{}',Arial,sans-serif}}</style>"#,
            escape_xml(&self.font_family)
        ));

        for label in &self.labels {
            let baseline = self.ascents.get(label.tier).copied().unwrap_or_default();
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{:.1}">{}</text>"#,
                label.x,
                label.y + baseline,
                self.color(label),
                self.font_size(label),
                escape_xml(&label.text)
            ));
        }

        svg.push_str("</svg>");
        svg
    }

    pub fn to_pixmap(&self, scale: f32) -> Result<Pixmap> {
        let svg_content = self.to_svg();
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_font_source(usvg::fontdb::Source::Binary(Arc::new(
            self.font_data.clone(),
        )));

        for face in fontdb.faces() {
            debug!(families = ?face.families, requested = %self.font_family, "font face loaded");
        }

        let options = usvg::Options {
            font_family: self.font_family.clone(),
            fontdb: Arc::new(fontdb),
            ..Default::default()
        };

        let tree =
            usvg::Tree::from_str(&svg_content, &options).map_err(|e| Error::Svg(e.to_string()))?;
        let size = tree.size().to_int_size();
        let out_width = (size.width() as f32 * scale).max(1.0) as u32;
        let out_height = (size.height() as f32 * scale).max(1.0) as u32;

        let mut pixmap = Pixmap::new(out_width, out_height)
            .ok_or_else(|| Error::Render("Failed to create pixel buffer".into()))?;

        if let Some(color) = parse_hex_color(&self.background) {
            pixmap.fill(color);
        }

        let transform = Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }

    pub fn to_png(&self, scale: f32) -> Result<Vec<u8>> {
        self.to_pixmap(scale)?
            .encode_png()
            .map_err(|e| Error::Render(e.to_string()))
    }

    /// JPEG has no alpha; transparent regions come out white.
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let pixmap = self.to_pixmap(1.0)?;
        let mut rgb = Vec::with_capacity((pixmap.width() * pixmap.height() * 3) as usize);
        // premultiplied source over white
        for px in pixmap.data().chunks_exact(4) {
            let cover = 255 - px[3];
            rgb.extend_from_slice(&[
                px[0].saturating_add(cover),
                px[1].saturating_add(cover),
                px[2].saturating_add(cover),
            ]);
        }

        let img = RgbImage::from_raw(pixmap.width(), pixmap.height(), rgb)
            .ok_or_else(|| Error::Image("Pixel buffer size mismatch".into()))?;
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
            .encode_image(&img)
            .map_err(|e| Error::Image(e.to_string()))?;
        Ok(out)
    }

    pub fn encode(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Jpeg => self.to_jpeg(quality),
            OutputFormat::Png => self.to_png(1.0),
            OutputFormat::Svg => Ok(self.to_svg().into_bytes()),
        }
    }

    /// Encode in the format implied by the extension and write to `path`.
    pub fn save(&self, path: impl AsRef<Path>, quality: u8) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path);
        let bytes = self.encode(format, quality)?;
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), ?format, "tag cloud written");
        Ok(())
    }
}

/// Accepts `#rgb` and `#rrggbb`.
fn parse_hex_color(hex: &str) -> Option<tiny_skia::Color> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(tiny_skia::Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        )),
        3 => {
            let short = |s: &str| channel(s).map(|v| v * 17);
            Some(tiny_skia::Color::from_rgba8(
                short(&hex[0..1])?,
                short(&hex[1..2])?,
                short(&hex[2..3])?,
                255,
            ))
        }
        _ => None,
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
