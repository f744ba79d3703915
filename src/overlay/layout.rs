//! Font selection, line wrapping and shrink-to-fit
//!
//! Measurement sits behind the small [`TextMeasure`] trait so the wrap and
//! fit logic can be exercised with a fixed-advance fake; the production
//! implementation shapes with rustybuzz against a face picked from the
//! system font database.

use fontdb::{Database, Family, Query, Weight};
use thiserror::Error;

use crate::overlay::{BASE_FONT_PT, MIN_FONT_PT};

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no installed font matches family {family:?}")]
    NoMatch { family: String },
    #[error("font face data is unreadable")]
    Unreadable,
    #[error("font face failed to parse")]
    Parse,
}

/// A bold face selected from the system font database.
///
/// Owns the raw face bytes; [`LoadedFont::face`] hands out a borrowed
/// rustybuzz face for shaping and outlining.
pub struct LoadedFont {
    data: Vec<u8>,
    index: u32,
}

impl LoadedFont {
    pub fn load(family: Option<&str>) -> Result<Self, FontError> {
        let mut db = Database::new();
        db.load_system_fonts();

        let families: Vec<Family<'_>> = match family {
            Some(name) => vec![Family::Name(name), Family::SansSerif],
            None => vec![Family::SansSerif],
        };
        let query = Query {
            families: &families,
            weight: Weight::BOLD,
            ..Query::default()
        };

        let id = db.query(&query).ok_or_else(|| FontError::NoMatch {
            family: family.unwrap_or("sans-serif").to_owned(),
        })?;

        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or(FontError::Unreadable)?;

        Ok(Self { data, index })
    }

    pub fn face(&self) -> Result<rustybuzz::Face<'_>, FontError> {
        rustybuzz::Face::from_slice(&self.data, self.index).ok_or(FontError::Parse)
    }
}

/// Text measurement at a given pixel size.
pub trait TextMeasure {
    fn line_height(&self, px: f32) -> f32;
    fn width(&self, text: &str, px: f32) -> f32;
}

/// Shaping-backed measurement for a real face.
pub struct FaceMetrics<'a> {
    face: &'a rustybuzz::Face<'a>,
    upem: f32,
}

impl<'a> FaceMetrics<'a> {
    pub fn new(face: &'a rustybuzz::Face<'a>) -> Self {
        Self {
            face,
            upem: face.units_per_em() as f32,
        }
    }

    pub fn ascent(&self, px: f32) -> f32 {
        f32::from(self.face.ascender()) * px / self.upem
    }
}

impl TextMeasure for FaceMetrics<'_> {
    fn line_height(&self, px: f32) -> f32 {
        let units = i32::from(self.face.ascender()) - i32::from(self.face.descender())
            + i32::from(self.face.line_gap());
        units as f32 * px / self.upem
    }

    fn width(&self, text: &str, px: f32) -> f32 {
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let glyphs = rustybuzz::shape(self.face, &[], buffer);
        let advance: i32 = glyphs.glyph_positions().iter().map(|p| p.x_advance).sum();
        advance as f32 * px / self.upem
    }
}

/// Text wrapped and sized to a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub point_size: u16,
    pub px: f32,
    pub lines: Vec<String>,
    pub line_height: f32,
}

impl FittedText {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

pub fn pt_to_px(pt: u16) -> f32 {
    f32::from(pt) * (96.0 / 72.0)
}

/// Greedy word wrap: break at word boundaries, or anywhere within a word
/// that is wider than the box on its own. Explicit newlines are respected
/// and blank lines preserved.
pub fn wrap(measure: &dyn TextMeasure, text: &str, px: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            let joined = if line.is_empty() {
                word.to_owned()
            } else {
                format!("{line} {word}")
            };

            if measure.width(&joined, px) <= max_width {
                line = joined;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            if measure.width(word, px) <= max_width {
                line = word.to_owned();
            } else {
                line = break_anywhere(measure, word, px, max_width, &mut lines);
            }
        }

        lines.push(line);
    }

    lines
}

fn break_anywhere(
    measure: &dyn TextMeasure,
    word: &str,
    px: f32,
    max_width: f32,
    lines: &mut Vec<String>,
) -> String {
    let mut line = String::new();

    for ch in word.chars() {
        let mut candidate = line.clone();
        candidate.push(ch);

        if !line.is_empty() && measure.width(&candidate, px) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push(ch);
        } else {
            line = candidate;
        }
    }

    line
}

/// Shrink text until its wrapped height fits the box.
///
/// Starts at the base point size and decrements 1 pt at a time, stopping at
/// the 4 pt floor even if the text still overflows.
pub fn fit(measure: &dyn TextMeasure, text: &str, max_width: f32, max_height: f32) -> FittedText {
    let mut point_size = BASE_FONT_PT;

    loop {
        let px = pt_to_px(point_size);
        let lines = wrap(measure, text, px, max_width);
        let line_height = measure.line_height(px);
        let height = lines.len() as f32 * line_height;

        if height <= max_height || point_size <= MIN_FONT_PT {
            return FittedText {
                point_size,
                px,
                lines,
                line_height,
            };
        }

        point_size -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Half a pixel-size advance per character, 1.2× line height.
    struct FixedMetrics;

    impl TextMeasure for FixedMetrics {
        fn line_height(&self, px: f32) -> f32 {
            px * 1.2
        }

        fn width(&self, text: &str, px: f32) -> f32 {
            text.chars().count() as f32 * px * 0.5
        }
    }

    #[test]
    fn test_wrap_breaks_at_word_boundaries() {
        let lines = wrap(&FixedMetrics, "hello world", 10.0, 30.0);
        assert_eq!(lines, vec!["hello", "world"]);
    }

    #[test]
    fn test_wrap_keeps_short_text_on_one_line() {
        let lines = wrap(&FixedMetrics, "hi all", 10.0, 30.0);
        assert_eq!(lines, vec!["hi all"]);
    }

    #[test]
    fn test_wrap_breaks_long_word_anywhere() {
        // "abcdefghij" is 50 wide against a 30 box: split mid-word.
        let lines = wrap(&FixedMetrics, "abcdefghij", 10.0, 30.0);
        assert_eq!(lines, vec!["abcdef", "ghij"]);
    }

    #[test]
    fn test_wrap_preserves_blank_lines() {
        let lines = wrap(&FixedMetrics, "a\n\nb", 10.0, 30.0);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_empty_text_has_no_lines() {
        let lines = wrap(&FixedMetrics, "", 10.0, 30.0);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_fit_keeps_base_size_when_text_fits() {
        let fitted = fit(&FixedMetrics, "ok", 100.0, 100.0);
        assert_eq!(fitted.point_size, BASE_FONT_PT);
        assert_eq!(fitted.lines, vec!["ok"]);
    }

    #[test]
    fn test_fit_shrinks_until_height_fits() {
        // Three 4-char words, box 50 wide: one word per line at every size
        // here, so only the line height decides. 16 pt is 25.6 tall per
        // line (76.8 total), too much for 60; 12 pt gives 57.6.
        let fitted = fit(&FixedMetrics, "aaaa bbbb cccc", 50.0, 60.0);
        assert_eq!(fitted.point_size, 12);
        assert_eq!(fitted.lines.len(), 3);
        assert!(fitted.height() <= 60.0);
    }

    #[test]
    fn test_fit_never_goes_below_floor() {
        let text = "overflow ".repeat(200);
        let fitted = fit(&FixedMetrics, &text, 10.0, 5.0);
        assert_eq!(fitted.point_size, MIN_FONT_PT);
        assert!(fitted.height() > 5.0);
    }

    #[test]
    fn test_fit_empty_text() {
        let fitted = fit(&FixedMetrics, "", 50.0, 50.0);
        assert_eq!(fitted.point_size, BASE_FONT_PT);
        assert!(fitted.lines.is_empty());
        assert_eq!(fitted.height(), 0.0);
    }

    #[test]
    fn test_pt_to_px_uses_96_dpi() {
        assert!((pt_to_px(12) - 16.0).abs() < 1e-6);
        assert!((pt_to_px(BASE_FONT_PT) - 21.333_334).abs() < 1e-3);
    }
}
