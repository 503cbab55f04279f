//! Text measurement.

use fontdue::{Font, FontSettings, LineMetrics};

use crate::{Error, Result};

/// Pixel footprint of a string rendered at a given font size.
///
/// Implementations must be deterministic: the same text and size always
/// measure the same.
pub trait TextMeasure {
    /// Returns `(width, height)` of the rendered text.
    fn measure(&self, text: &str, font_size: f32) -> (f32, f32);

    /// Distance from the top of the text box down to the baseline.
    fn ascent(&self, font_size: f32) -> f32 {
        font_size * 0.8
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, font_size: f32) -> (f32, f32) {
        (**self).measure(text, font_size)
    }

    fn ascent(&self, font_size: f32) -> f32 {
        (**self).ascent(font_size)
    }
}

/// Measures with glyph advances from a TrueType/OpenType font.
pub struct FontMeasurer {
    font: Font,
}

impl FontMeasurer {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| Error::Font(e.to_string()))?;
        Ok(Self { font })
    }

    fn line_metrics(&self, size: f32) -> LineMetrics {
        self.font
            .horizontal_line_metrics(size)
            .unwrap_or(LineMetrics {
                ascent: size * 0.8,
                descent: size * -0.2,
                line_gap: 0.0,
                new_line_size: size,
            })
    }
}

impl TextMeasure for FontMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> (f32, f32) {
        let width: f32 = text
            .chars()
            .map(|ch| self.font.metrics(ch, font_size).advance_width)
            .sum();
        let height = self.line_metrics(font_size).new_line_size;
        (width.ceil(), height.ceil())
    }

    fn ascent(&self, font_size: f32) -> f32 {
        self.line_metrics(font_size).ascent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Monospace;

    impl TextMeasure for Monospace {
        fn measure(&self, text: &str, font_size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * font_size * 0.5, font_size)
        }
    }

    #[test]
    fn default_ascent_is_most_of_the_size() {
        assert_eq!(Monospace.ascent(20.0), 16.0);
    }

    #[test]
    fn references_measure_like_the_target() {
        let measurer = &Monospace;
        assert_eq!(measurer.measure("abcd", 10.0), (20.0, 10.0));
        assert_eq!(TextMeasure::ascent(&measurer, 10.0), 8.0);
    }

    const TUFFY: &[u8] = include_bytes!("../tests/fixtures/Tuffy.ttf");

    #[test]
    fn font_width_is_rounded_up_advance_sum() {
        let measurer = FontMeasurer::from_bytes(TUFFY).unwrap();
        let font = Font::from_bytes(TUFFY, FontSettings::default()).unwrap();
        let advance: f32 = "hello"
            .chars()
            .map(|ch| font.metrics(ch, 50.0).advance_width)
            .sum();
        let line = font.horizontal_line_metrics(50.0).unwrap().new_line_size;

        assert_eq!(measurer.measure("hello", 50.0), (advance.ceil(), line.ceil()));
    }

    #[test]
    fn font_measurements_grow_with_text_and_size() {
        let measurer = FontMeasurer::from_bytes(TUFFY).unwrap();
        let (short, small_h) = measurer.measure("ab", 20.0);
        let (long, _) = measurer.measure("abcdef", 20.0);
        let (big, big_h) = measurer.measure("ab", 40.0);
        assert!(short > 0.0 && long > short);
        assert!(big > short && big_h > small_h);
        assert_eq!(measurer.measure("", 20.0).0, 0.0);

        let ascent = measurer.ascent(40.0);
        assert!(ascent > 0.0 && ascent < big_h);
    }

    #[test]
    fn garbage_font_bytes_are_a_font_error() {
        let err = FontMeasurer::from_bytes(b"definitely not a font").err();
        assert!(matches!(err, Some(Error::Font(_))));
    }
}
