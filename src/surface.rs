//! The drawing surface the renderer paints onto.
//!
//! Angles are degrees, clockwise from +x in a y-down frame. Styles are
//! passed by value with every call; a surface keeps no paint state between
//! calls.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use rusttype::{point, Font, Scale};

use crate::config::Color;
use crate::error::{Error, Result};
use crate::geometry::{Rect, RectF};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStyle {
    /// Fill the circular segment between the arc and its chord.
    Fill,
    /// Stroke the arc itself with the given width.
    Stroke(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStyle {
    pub color: Color,
    pub paint: PaintStyle,
}

impl ArcStyle {
    pub const fn fill(color: Color) -> Self {
        Self {
            color,
            paint: PaintStyle::Fill,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
}

/// Vertical font metrics in y-down coordinates: `ascent` is negative
/// (above the baseline), `descent` positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

pub trait TextMetrics {
    /// Advance width of `text` at `size` pixels.
    fn measure_text(&self, text: &str, size: f32) -> f32;

    fn font_metrics(&self, size: f32) -> FontMetrics;
}

pub trait Surface: TextMetrics {
    /// Draws an open arc of the oval inscribed in `oval`. A sweep of 360 or
    /// more covers the whole oval; a sweep of zero draws nothing.
    fn draw_arc(&mut self, oval: RectF, start: f32, sweep: f32, style: ArcStyle);

    /// Blits `image`, or its `src` sub-rectangle, into `dst`.
    fn draw_image(&mut self, image: &Arc<RgbaImage>, src: Option<Rect>, dst: Rect);

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

// ============================================================================
// FONTS
// ============================================================================

/// A parsed font used for label metrics and glyph rendering.
#[derive(Clone)]
pub struct FontFace {
    font: Font<'static>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(data).ok_or(Error::InvalidFont)?;
        Ok(Self { font })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }
}

impl TextMetrics for FontFace {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        let scale = Scale::uniform(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map_or(0.0, |glyph| {
                glyph.position().x + glyph.unpositioned().h_metrics().advance_width
            })
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        let v_metrics = self.font.v_metrics(Scale::uniform(size));
        FontMetrics {
            ascent: -v_metrics.ascent,
            descent: -v_metrics.descent,
        }
    }
}

/// Metrics of an absent font: nothing has width or height.
impl<T: TextMetrics> TextMetrics for Option<T> {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.as_ref().map_or(0.0, |face| face.measure_text(text, size))
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        self.as_ref()
            .map_or_else(FontMetrics::default, |face| face.font_metrics(size))
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for Arc<T> {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        (**self).measure_text(text, size)
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        (**self).font_metrics(size)
    }
}
