//! Software rasterizer over an RGBA8 framebuffer.

use std::f32::consts::TAU;
use std::sync::Arc;

use image::RgbaImage;
use rusttype::{point, Scale};

use crate::config::Color;
use crate::geometry::{Rect, RectF};
use crate::surface::{
    ArcStyle, FontFace, FontMetrics, PaintStyle, Surface, TextMetrics, TextStyle,
};

// ============================================================================
// PIXEL CANVAS
// ============================================================================

/// Immediate-mode rasterizer over an RGBA8 frame, row-major with no padding.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a FontFace>,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<&'a FontFace>) -> Self {
        self.font = font;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
            self.frame[idx + 3],
        ]
    }

    /// Source-over blend of `color` at `coverage` onto one pixel.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let alpha = (coverage * color.alpha()).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let dst = &mut self.frame[idx..idx + 4];
        let dst_alpha = dst[3] as f32 / 255.0;
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);
        let src = [color.r, color.g, color.b];
        for channel in 0..3 {
            let blended = (src[channel] as f32 * alpha
                + dst[channel] as f32 * dst_alpha * (1.0 - alpha))
                / out_alpha;
            dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_alpha * 255.0).round() as u8;
    }

    /// Pixel rows and columns touched by `oval`, clipped to the frame.
    fn pixel_bounds(&self, oval: RectF) -> (i32, i32, i32, i32) {
        let min_x = (oval.left.floor() as i32 - 1).max(0);
        let min_y = (oval.top.floor() as i32 - 1).max(0);
        let max_x = (oval.right.ceil() as i32 + 1).min(self.width as i32 - 1);
        let max_y = (oval.bottom.ceil() as i32 + 1).min(self.height as i32 - 1);
        (min_x, min_y, max_x, max_y)
    }

    fn fill_segment(&mut self, oval: RectF, start: f32, sweep: f32, color: Color) {
        let (cx, cy) = oval.center();
        let rx = oval.width() / 2.0;
        let ry = oval.height() / 2.0;
        let radius = rx.min(ry);

        let chord = if sweep >= 360.0 {
            None
        } else {
            Chord::new(start, sweep)
        };
        if chord.is_none() && sweep < 360.0 && sweep <= 180.0 {
            return;
        }

        let (min_x, min_y, max_x, max_y) = self.pixel_bounds(oval);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let u = (x as f32 + 0.5 - cx) / rx;
                let v = (y as f32 + 0.5 - cy) / ry;
                let dist = (u * u + v * v).sqrt();
                let radial = ((1.0 - dist) * radius + 0.5).clamp(0.0, 1.0);
                if radial <= 0.0 {
                    continue;
                }
                let side = chord
                    .as_ref()
                    .map_or(1.0, |chord| (chord.distance(u, v) * radius + 0.5).clamp(0.0, 1.0));
                let coverage = radial * side;
                if coverage > 0.01 {
                    self.blend_pixel(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_arc(&mut self, oval: RectF, start: f32, sweep: f32, width: f32, color: Color) {
        let (cx, cy) = oval.center();
        let rx = oval.width() / 2.0;
        let ry = oval.height() / 2.0;
        let radius = rx.min(ry);
        let start = start.to_radians().rem_euclid(TAU);
        let sweep = sweep.to_radians().min(TAU);
        let half_width = width / 2.0;

        let grown = RectF::new(
            oval.left - half_width,
            oval.top - half_width,
            oval.right + half_width,
            oval.bottom + half_width,
        );
        let (min_x, min_y, max_x, max_y) = self.pixel_bounds(grown);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let u = (x as f32 + 0.5 - cx) / rx;
                let v = (y as f32 + 0.5 - cy) / ry;
                let angle = v.atan2(u).rem_euclid(TAU);
                let in_arc = (angle - start).rem_euclid(TAU) <= sweep;
                if !in_arc {
                    continue;
                }
                let dist = ((u * u + v * v).sqrt() - 1.0).abs() * radius;
                let coverage = (half_width - dist + 0.5).clamp(0.0, 1.0);
                if coverage > 0.01 {
                    self.blend_pixel(x, y, color, coverage);
                }
            }
        }
    }
}

/// The chord closing an arc on the unit circle, oriented towards the arc.
struct Chord {
    origin: (f32, f32),
    normal: (f32, f32),
}

impl Chord {
    /// `None` when the endpoints coincide.
    fn new(start: f32, sweep: f32) -> Option<Self> {
        let start_rad = start.to_radians();
        let end_rad = (start + sweep).to_radians();
        let mid_rad = (start + sweep / 2.0).to_radians();

        let p1 = (start_rad.cos(), start_rad.sin());
        let p2 = (end_rad.cos(), end_rad.sin());
        let mid = (mid_rad.cos(), mid_rad.sin());

        let dir = (p2.0 - p1.0, p2.1 - p1.1);
        let len = (dir.0 * dir.0 + dir.1 * dir.1).sqrt();
        if len < 1e-6 {
            return None;
        }
        let mut normal = (-dir.1 / len, dir.0 / len);
        if normal.0 * (mid.0 - p1.0) + normal.1 * (mid.1 - p1.1) < 0.0 {
            normal = (-normal.0, -normal.1);
        }
        Some(Self { origin: p1, normal })
    }

    /// Signed distance from the chord line, positive on the arc's side.
    fn distance(&self, u: f32, v: f32) -> f32 {
        (u - self.origin.0) * self.normal.0 + (v - self.origin.1) * self.normal.1
    }
}

impl TextMetrics for PixelCanvas<'_> {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.font.map_or(0.0, |font| font.measure_text(text, size))
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        self.font
            .map_or_else(FontMetrics::default, |font| font.font_metrics(size))
    }
}

impl Surface for PixelCanvas<'_> {
    fn draw_arc(&mut self, oval: RectF, start: f32, sweep: f32, style: ArcStyle) {
        if sweep.is_nan() || sweep <= 0.0 || oval.width() <= 0.0 || oval.height() <= 0.0 {
            return;
        }
        match style.paint {
            PaintStyle::Fill => self.fill_segment(oval, start, sweep, style.color),
            PaintStyle::Stroke(width) => self.stroke_arc(oval, start, sweep, width, style.color),
        }
    }

    fn draw_image(&mut self, image: &Arc<RgbaImage>, src: Option<Rect>, dst: Rect) {
        let (image_width, image_height) = image.dimensions();
        let src = src.unwrap_or(Rect::new(0, 0, image_width as i32, image_height as i32));
        if src.is_empty() || dst.is_empty() {
            return;
        }
        for y in dst.top.max(0)..dst.bottom.min(self.height as i32) {
            let sy = src.top + (y - dst.top) * src.height() / dst.height();
            if sy < 0 || sy as u32 >= image_height {
                continue;
            }
            for x in dst.left.max(0)..dst.right.min(self.width as i32) {
                let sx = src.left + (x - dst.left) * src.width() / dst.width();
                if sx < 0 || sx as u32 >= image_width {
                    continue;
                }
                let [r, g, b, a] = image.get_pixel(sx as u32, sy as u32).0;
                if a > 0 {
                    self.blend_pixel(x, y, Color::rgba(r, g, b, a), 1.0);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let Some(font) = self.font else {
            return;
        };
        let scale = Scale::uniform(style.size);
        let glyphs: Vec<_> = font.font().layout(text, scale, point(x, y)).collect();
        for glyph in glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend_pixel(
                        bb.min.x + gx as i32,
                        bb.min.y + gy as i32,
                        style.color,
                        v,
                    );
                });
            }
        }
    }
}
