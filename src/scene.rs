//! Recorded drawing, replayed onto another surface.

use std::sync::Arc;

use image::RgbaImage;

use crate::geometry::{Rect, RectF};
use crate::surface::{ArcStyle, FontMetrics, Surface, TextMetrics, TextStyle};

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Arc {
        oval: RectF,
        start: f32,
        sweep: f32,
        style: ArcStyle,
    },
    Image {
        image: Arc<RgbaImage>,
        src: Option<Rect>,
        dst: Rect,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

/// A surface that records what is drawn on it.
///
/// Text is measured through the wrapped metrics so that label placement is
/// the same as when drawing immediately.
pub struct Scene<'m> {
    metrics: &'m dyn TextMetrics,
    commands: Vec<DrawCommand>,
}

impl<'m> Scene<'m> {
    pub fn new(metrics: &'m dyn TextMetrics) -> Self {
        Self {
            metrics,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Plays the recorded commands onto another surface, in order.
    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Arc {
                    oval,
                    start,
                    sweep,
                    style,
                } => target.draw_arc(*oval, *start, *sweep, *style),
                DrawCommand::Image { image, src, dst } => target.draw_image(image, *src, *dst),
                DrawCommand::Text { text, x, y, style } => target.draw_text(text, *x, *y, *style),
            }
        }
    }
}

impl TextMetrics for Scene<'_> {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.metrics.measure_text(text, size)
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        self.metrics.font_metrics(size)
    }
}

impl Surface for Scene<'_> {
    fn draw_arc(&mut self, oval: RectF, start: f32, sweep: f32, style: ArcStyle) {
        self.commands.push(DrawCommand::Arc {
            oval,
            start,
            sweep,
            style,
        });
    }

    fn draw_image(&mut self, image: &Arc<RgbaImage>, src: Option<Rect>, dst: Rect) {
        self.commands.push(DrawCommand::Image {
            image: Arc::clone(image),
            src,
            dst,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}
