//! tiny-skia painting for the overlay panel

use tiny_skia::{
    Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use rustybuzz::ttf_parser::{GlyphId, OutlineBuilder};

use crate::overlay::layout::{fit, FaceMetrics, FittedText, TextMeasure};
use crate::overlay::widget::OverlayWidget;
use crate::overlay::{CORNER_ROUNDNESS, PANEL_OPACITY, TEXT_INSET};

fn panel_fill(opacity: f32) -> Color {
    let mut color = Color::from_rgba8(30, 30, 30, (255.0 * PANEL_OPACITY) as u8);
    color.apply_opacity(opacity.clamp(0.0, 1.0));
    color
}

fn panel_border(opacity: f32) -> Color {
    let mut color = Color::from_rgba8(70, 70, 70, 255);
    color.apply_opacity(opacity.clamp(0.0, 1.0));
    color
}

fn text_color(opacity: f32) -> Color {
    let mut color = Color::from_rgba8(255, 255, 255, 255);
    color.apply_opacity(opacity.clamp(0.0, 1.0));
    color
}

/// Paint the whole widget (panel plus fitted text) into the parent-sized
/// pixmap at the widget's current position.
pub fn draw_widget(pixmap: &mut Pixmap, widget: &OverlayWidget, face: &rustybuzz::Face<'_>) {
    let (x, y) = widget.position();
    let (w, h) = widget.size();
    let opacity = widget.opacity();

    draw_panel(pixmap, x as f32, y as f32, w as f32, h as f32, opacity);

    let metrics = FaceMetrics::new(face);
    let content_w = w as f32 - 2.0 * TEXT_INSET;
    let content_h = h as f32 - 2.0 * TEXT_INSET;
    let fitted = fit(&metrics, widget.text(), content_w, content_h);

    draw_text(
        pixmap,
        face,
        &fitted,
        x as f32 + TEXT_INSET,
        y as f32 + TEXT_INSET,
        content_w,
        content_h,
        opacity,
    );
}

/// Rounded translucent panel with a thin border.
pub fn draw_panel(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, opacity: f32) {
    let Some(rect) = Rect::from_xywh(x, y, w, h) else {
        return;
    };
    let path = rounded_rect(rect, CORNER_ROUNDNESS);

    let mut paint = Paint::default();
    paint.set_color(panel_fill(opacity));
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    let mut border = Paint::default();
    border.set_color(panel_border(opacity));
    border.anti_alias = true;
    let stroke = Stroke {
        width: 0.5,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &border, &stroke, Transform::identity(), None);
}

/// Draw fitted lines centered in the content rect: each line centered
/// horizontally, the block centered vertically.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    pixmap: &mut Pixmap,
    face: &rustybuzz::Face<'_>,
    fitted: &FittedText,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    opacity: f32,
) {
    if fitted.lines.is_empty() {
        return;
    }

    let metrics = FaceMetrics::new(face);
    let upem = face.units_per_em() as f32;
    let scale = fitted.px / upem;
    let ascent = metrics.ascent(fitted.px);

    let mut paint = Paint::default();
    paint.set_color(text_color(opacity));
    paint.anti_alias = true;

    let block_top = y + (h - fitted.height()) / 2.0;

    for (i, line) in fitted.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }

        let line_width = metrics.width(line, fitted.px);
        let mut pen_x = x + (w - line_width) / 2.0;
        let baseline = block_top + i as f32 * fitted.line_height + ascent;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(line);
        let glyphs = rustybuzz::shape(face, &[], buffer);

        for (info, pos) in glyphs.glyph_infos().iter().zip(glyphs.glyph_positions()) {
            let glyph = GlyphId(info.glyph_id as u16);
            let mut sink = GlyphSink {
                builder: PathBuilder::new(),
            };
            if face.outline_glyph(glyph, &mut sink).is_some() {
                if let Some(path) = sink.builder.finish() {
                    let transform = Transform::from_row(
                        scale,
                        0.0,
                        0.0,
                        -scale,
                        pen_x + pos.x_offset as f32 * scale,
                        baseline - pos.y_offset as f32 * scale,
                    );
                    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
                }
            }
            pen_x += pos.x_advance as f32 * scale;
        }
    }
}

/// Collects a glyph outline into a tiny-skia path, in font units.
struct GlyphSink {
    builder: PathBuilder,
}

impl OutlineBuilder for GlyphSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn rounded_rect(rect: Rect, radius: f32) -> Path {
    let mut pb = PathBuilder::new();

    let x = rect.x();
    let y = rect.y();
    let w = rect.width();
    let h = rect.height();

    pb.move_to(x + radius, y);
    pb.line_to(x + w - radius, y);
    pb.quad_to(x + w, y, x + w, y + radius);
    pb.line_to(x + w, y + h - radius);
    pb.quad_to(x + w, y + h, x + w - radius, y + h);
    pb.line_to(x + radius, y + h);
    pb.quad_to(x, y + h, x, y + h - radius);
    pb.line_to(x, y + radius);
    pb.quad_to(x, y, x + radius, y);
    pb.close();

    pb.finish().unwrap_or_else(|| PathBuilder::from_rect(rect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_fills_interior_at_full_opacity() {
        let mut pixmap = Pixmap::new(100, 60).unwrap();
        draw_panel(&mut pixmap, 10.0, 10.0, 80.0, 40.0, 1.0);

        let center = pixmap.pixel(50, 30).unwrap();
        assert!(center.alpha() > 0);
    }

    #[test]
    fn test_panel_leaves_rounded_corners_empty() {
        let mut pixmap = Pixmap::new(100, 60).unwrap();
        draw_panel(&mut pixmap, 10.0, 10.0, 80.0, 40.0, 1.0);

        // Just inside the bounding box corner, outside the 8px rounding.
        let corner = pixmap.pixel(10, 10).unwrap();
        assert_eq!(corner.alpha(), 0);
        let outside = pixmap.pixel(0, 0).unwrap();
        assert_eq!(outside.alpha(), 0);
    }

    #[test]
    fn test_panel_is_invisible_at_zero_opacity() {
        let mut pixmap = Pixmap::new(100, 60).unwrap();
        draw_panel(&mut pixmap, 10.0, 10.0, 80.0, 40.0, 0.0);

        let center = pixmap.pixel(50, 30).unwrap();
        assert_eq!(center.alpha(), 0);
    }

    #[test]
    fn test_out_of_range_opacity_is_clamped_when_painting() {
        let mut pixmap = Pixmap::new(100, 60).unwrap();
        draw_panel(&mut pixmap, 10.0, 10.0, 80.0, 40.0, 3.0);

        // Clamped to 1.0: the fill stays at the panel alpha, not beyond.
        let center = pixmap.pixel(50, 30).unwrap();
        assert_eq!(center.alpha(), (255.0 * PANEL_OPACITY) as u8);
    }

    #[test]
    fn test_degenerate_rect_is_skipped() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        draw_panel(&mut pixmap, 0.0, 0.0, -5.0, 10.0, 1.0);
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }
}
