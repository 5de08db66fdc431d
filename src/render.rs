//! One redraw of the indicator.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, trace};

use crate::config::Color;
use crate::geometry::{ArcGeometry, Rect, RectF, Size};
use crate::mask::MaskCache;
use crate::resources::{ImageResolver, ResourceId};
use crate::surface::{ArcStyle, Surface, TextStyle};

/// Everything one redraw needs, captured at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressConfig {
    pub progress_ratio: f32,
    pub progress: i32,
    pub bounds: Size,
    pub finished_color: Color,
    pub unfinished_color: Color,
    pub text_color: Color,
    pub text_size: f32,
    pub prefix_text: String,
    pub suffix_text: String,
    /// Disc-masked, already at `bounds` size.
    pub finished_image: Option<Arc<RgbaImage>>,
    /// Disc-masked, already at `bounds` size.
    pub unfinished_image: Option<Arc<RgbaImage>>,
}

impl ProgressConfig {
    pub fn draw_text(&self) -> String {
        format!("{}{}{}", self.prefix_text, self.progress, self.suffix_text)
    }
}

/// Composes the arcs, skins and label of the indicator onto a surface, and
/// owns the disc-masked skins it draws.
#[derive(Debug, Default)]
pub struct Renderer {
    masks: MaskCache,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the cached skins if the bounds or either resource changed.
    pub fn prepare(
        &mut self,
        bounds: Size,
        finished: Option<ResourceId>,
        unfinished: Option<ResourceId>,
        resolver: &dyn ImageResolver,
    ) {
        self.masks
            .prepare(bounds.to_pixels(), finished, unfinished, resolver);
    }

    /// Forgets the cached skins.
    pub fn invalidate(&mut self) {
        self.masks.invalidate();
    }

    pub fn finished_image(&self) -> Option<Arc<RgbaImage>> {
        self.masks.finished().cloned()
    }

    pub fn unfinished_image(&self) -> Option<Arc<RgbaImage>> {
        self.masks.unfinished().cloned()
    }

    /// Draws one frame. Returns `false` when the bounds are not measured yet
    /// and nothing was drawn.
    pub fn draw<S: Surface + ?Sized>(&self, config: &ProgressConfig, surface: &mut S) -> bool {
        let bounds = config.bounds;
        let Some(geometry) = ArcGeometry::compute(config.progress_ratio, bounds.width) else {
            debug!(?bounds, "surface not measured, skipping draw");
            return false;
        };
        if bounds.height <= 0.0 {
            debug!(?bounds, "surface not measured, skipping draw");
            return false;
        }
        trace!(?geometry, ratio = config.progress_ratio, "drawing progress");

        let oval = RectF::from_size(bounds);
        let full = Rect::from_size(bounds);

        let unfinished = geometry.unfinished();
        surface.draw_arc(
            oval,
            unfinished.start,
            unfinished.sweep,
            ArcStyle::fill(config.unfinished_color),
        );

        if let Some(image) = &config.unfinished_image {
            surface.draw_image(image, None, full);
        }

        let finished = geometry.finished();
        surface.draw_arc(
            oval,
            finished.start,
            finished.sweep,
            ArcStyle::fill(config.finished_color),
        );

        if let Some(image) = &config.finished_image {
            let region = geometry.finished_region(bounds);
            surface.draw_image(image, Some(region), region);
        }

        let text = config.draw_text();
        if !text.is_empty() {
            let metrics = surface.font_metrics(config.text_size);
            let text_height = metrics.descent + metrics.ascent;
            let x = (bounds.width - surface.measure_text(&text, config.text_size)) / 2.0;
            let y = (bounds.width - text_height) / 2.0;
            surface.draw_text(
                &text,
                x,
                y,
                TextStyle {
                    color: config.text_color,
                    size: config.text_size,
                },
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawCommand, Scene};
    use crate::surface::{FontMetrics, PaintStyle, TextMetrics};
    use pretty_assertions::assert_eq;

    /// Every glyph is half as wide as the text is tall.
    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn measure_text(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size / 2.0
        }

        fn font_metrics(&self, size: f32) -> FontMetrics {
            FontMetrics {
                ascent: -0.75 * size,
                descent: 0.25 * size,
            }
        }
    }

    fn config(ratio: f32, side: f32) -> ProgressConfig {
        ProgressConfig {
            progress_ratio: ratio,
            progress: (ratio * 100.0) as i32,
            bounds: Size::square(side),
            finished_color: Color::rgb(66, 145, 241),
            unfinished_color: Color::rgb(204, 204, 204),
            text_color: Color::WHITE,
            text_size: 20.0,
            prefix_text: String::new(),
            suffix_text: "%".to_string(),
            finished_image: None,
            unfinished_image: None,
        }
    }

    fn record(config: &ProgressConfig) -> Vec<DrawCommand> {
        let mut scene = Scene::new(&FixedMetrics);
        Renderer::new().draw(config, &mut scene);
        scene.into_commands()
    }

    #[test]
    fn zero_progress_draws_full_unfinished_circle_and_label() {
        let commands = record(&config(0.0, 100.0));
        let oval = RectF::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            commands,
            vec![
                DrawCommand::Arc {
                    oval,
                    start: 90.0,
                    sweep: 360.0,
                    style: ArcStyle::fill(Color::rgb(204, 204, 204)),
                },
                DrawCommand::Arc {
                    oval,
                    start: 90.0,
                    sweep: 0.0,
                    style: ArcStyle::fill(Color::rgb(66, 145, 241)),
                },
                DrawCommand::Text {
                    text: "0%".to_string(),
                    x: 40.0,
                    y: 55.0,
                    style: TextStyle {
                        color: Color::WHITE,
                        size: 20.0,
                    },
                },
            ]
        );
    }

    #[test]
    fn unmeasured_surface_draws_nothing() {
        let mut scene = Scene::new(&FixedMetrics);
        assert!(!Renderer::new().draw(&config(0.4, 0.0), &mut scene));
        assert!(scene.is_empty());
    }

    #[test]
    fn full_fill_still_issues_the_empty_unfinished_arc() {
        let commands = record(&config(1.0, 100.0));
        match &commands[0] {
            DrawCommand::Arc { sweep, .. } => assert!(sweep.abs() < 1e-3),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn arcs_are_filled_segments() {
        for command in record(&config(0.3, 64.0)) {
            if let DrawCommand::Arc { style, .. } = command {
                assert_eq!(style.paint, PaintStyle::Fill);
            }
        }
    }

    #[test]
    fn skins_are_layered_between_the_arcs() {
        let mut frame = config(0.25, 40.0);
        let skin = Arc::new(RgbaImage::new(40, 40));
        frame.unfinished_image = Some(Arc::clone(&skin));
        frame.finished_image = Some(Arc::clone(&skin));

        let commands = record(&frame);
        assert_eq!(commands.len(), 5);
        assert!(matches!(commands[0], DrawCommand::Arc { .. }));
        assert_eq!(
            commands[1],
            DrawCommand::Image {
                image: Arc::clone(&skin),
                src: None,
                dst: Rect::new(0, 0, 40, 40),
            }
        );
        assert!(matches!(commands[2], DrawCommand::Arc { .. }));
        assert_eq!(
            commands[3],
            DrawCommand::Image {
                image: skin,
                src: Some(Rect::new(0, 30, 40, 40)),
                dst: Rect::new(0, 30, 40, 40),
            }
        );
        assert!(matches!(commands[4], DrawCommand::Text { .. }));
    }

    #[test]
    fn bare_number_label_is_still_drawn() {
        let mut frame = config(0.5, 80.0);
        frame.prefix_text.clear();
        frame.suffix_text.clear();
        frame.progress = 0;
        assert_eq!(frame.draw_text(), "0");

        let commands = record(&frame);
        assert!(matches!(commands.last(), Some(DrawCommand::Text { .. })));
    }

    #[test]
    fn label_is_centered_on_the_width() {
        let mut frame = config(0.42, 120.0);
        frame.bounds = Size::new(120.0, 300.0);
        frame.progress = 42;
        let commands = record(&frame);
        let Some(DrawCommand::Text { text, x, y, .. }) = commands.last() else {
            panic!("label missing");
        };
        assert_eq!(text, "42%");
        assert_eq!(*x, (120.0 - 30.0) / 2.0);
        assert_eq!(*y, (120.0 + 10.0) / 2.0);
    }
}
