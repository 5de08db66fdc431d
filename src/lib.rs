//! A circular "liquid-fill" progress indicator.
//!
//! The disc fills from the bottom like a glass of liquid: the level sits at
//! `progress / max` of the diameter and is drawn as two filled circular
//! segments sharing one chord. Optional skin images are clipped to the disc,
//! and a centered `prefix + progress + suffix` label is drawn on top.
//!
//! ```
//! use circle_progress::{CircleProgress, CircleProgressConfig, Scene, Size};
//!
//! let mut progress = CircleProgress::new(CircleProgressConfig::default());
//! progress.set_progress(150);
//! assert_eq!(progress.progress(), 50);
//!
//! progress.on_size_changed(Size::square(120.0));
//! let font = progress.font();
//! let mut scene = Scene::new(&font);
//! assert!(progress.render(&mut scene));
//! assert_eq!(scene.commands().len(), 3);
//! ```

// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod mask;
pub mod render;
pub mod resources;
pub mod scene;
pub mod snapshot;
pub mod surface;
mod window;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

pub use canvas::PixelCanvas;
pub use config::{CircleProgressConfig, Color};
pub use error::{Error, Result};
pub use geometry::{ArcGeometry, Rect, RectF, Size};
pub use host::{Detached, Host};
pub use render::{ProgressConfig, Renderer};
pub use resources::{ImageResolver, ImageSource, ResourceId, ResourceRegistry};
pub use scene::{DrawCommand, Scene};
pub use snapshot::ProgressSnapshot;
pub use surface::{ArcStyle, FontFace, FontMetrics, PaintStyle, Surface, TextMetrics, TextStyle};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for type-safe indicator updates from other threads.
#[derive(Debug, Clone)]
pub enum ProgressCommand {
    SetProgress(i32),
    SetMax(i32),
    SetProgressAndMax(i32, i32), // progress, max
    SetFinishedColor(Color),
    SetUnfinishedColor(Color),
    SetTextColor(Color),
    SetTextSize(f32),
    SetPrefixText(String),
    SetSuffixText(String),
    SetFinishedDrawable(Option<ResourceId>),
    SetUnfinishedDrawable(Option<ResourceId>),
    Restore(ProgressSnapshot),
}

#[derive(Debug, Clone)]
struct WindowSettings {
    title: String,
    size: u32,
    background: Color,
    max_framerate: f64,
}

/// The indicator: its attributes, the surface size it was given, and the
/// renderer holding its disc-masked skins.
pub struct CircleProgress {
    progress: i32,
    max: i32,
    text_size: f32,
    text_color: Color,
    finished_color: Color,
    unfinished_color: Color,
    finished_drawable: Option<ResourceId>,
    unfinished_drawable: Option<ResourceId>,
    prefix_text: String,
    suffix_text: String,

    min_side: f32,
    bounds: Size,
    needs_redraw: bool,

    font: Option<Arc<FontFace>>,
    renderer: Renderer,
    resources: Box<dyn ImageResolver>,
    host: Box<dyn Host>,
    settings: WindowSettings,
}

impl fmt::Debug for CircleProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircleProgress")
            .field("progress", &self.progress)
            .field("max", &self.max)
            .field("bounds", &self.bounds)
            .field("finished_drawable", &self.finished_drawable)
            .field("unfinished_drawable", &self.unfinished_drawable)
            .field("needs_redraw", &self.needs_redraw)
            .finish_non_exhaustive()
    }
}

impl CircleProgress {
    pub fn new(config: CircleProgressConfig) -> Self {
        let font = config
            .font_data
            .clone()
            .and_then(|data| match FontFace::from_bytes(data) {
                Ok(face) => Some(Arc::new(face)),
                Err(err) => {
                    warn!(error = %err, "label font unusable, drawing without text");
                    None
                }
            });

        let mut progress = Self {
            progress: 0,
            max: crate::config::DEFAULT_MAX,
            text_size: config.resolved_text_size(),
            text_color: config.text_color,
            finished_color: config.finished_color,
            unfinished_color: config.unfinished_color,
            finished_drawable: config.finished_drawable,
            unfinished_drawable: config.unfinished_drawable,
            prefix_text: config.prefix_text.clone(),
            suffix_text: config.suffix_text.clone(),
            min_side: config.min_side(),
            bounds: Size::ZERO,
            needs_redraw: true,
            font,
            renderer: Renderer::new(),
            resources: Box::new(ResourceRegistry::new()),
            host: Box::new(Detached),
            settings: WindowSettings {
                title: config.title.clone(),
                size: config.window_size,
                background: config.background_color,
                max_framerate: config.max_framerate,
            },
        };
        progress.set_max(config.max);
        progress.set_progress(config.progress);
        progress
    }

    /// Uses `resources` to look up drawable ids from now on.
    pub fn with_resources(mut self, resources: impl ImageResolver + 'static) -> Self {
        self.resources = Box::new(resources);
        self.renderer.invalidate();
        self.resize(self.bounds);
        self
    }

    /// Attaches the indicator to a host and asks it for a first redraw.
    pub fn with_host(mut self, host: impl Host + 'static) -> Self {
        self.host = Box::new(host);
        self.needs_redraw = false;
        self.invalidate();
        self
    }

    pub fn with_font(mut self, font: FontFace) -> Self {
        self.font = Some(Arc::new(font));
        self
    }

    pub fn font(&self) -> Option<Arc<FontFace>> {
        self.font.clone()
    }

    // ------------------------------------------------------------------------
    // Progress and range
    // ------------------------------------------------------------------------

    pub fn progress(&self) -> i32 {
        self.progress
    }

    /// Stores `progress`, wrapping it into `[0, max)`. Negative values are
    /// clamped to zero.
    pub fn set_progress(&mut self, progress: i32) {
        let progress = if progress < 0 {
            debug!(progress, "clamping negative progress to zero");
            0
        } else {
            progress
        };
        self.progress = if progress >= self.max {
            progress % self.max
        } else {
            progress
        };
        self.invalidate();
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Accepts only positive values; anything else leaves the range as is.
    pub fn set_max(&mut self, max: i32) {
        if max <= 0 {
            debug!(max, current = self.max, "ignoring non-positive max");
            return;
        }
        self.max = max;
        if self.progress >= max {
            self.progress %= max;
        }
        self.invalidate();
    }

    /// Fraction of the disc that is filled.
    pub fn progress_percentage(&self) -> f32 {
        self.progress as f32 / self.max as f32
    }

    // ------------------------------------------------------------------------
    // Appearance
    // ------------------------------------------------------------------------

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn set_text_size(&mut self, text_size: f32) {
        if !config::is_valid_text_size(text_size) {
            debug!(text_size, "ignoring non-positive text size");
            return;
        }
        self.text_size = text_size;
        self.invalidate();
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.invalidate();
    }

    pub fn finished_color(&self) -> Color {
        self.finished_color
    }

    pub fn set_finished_color(&mut self, color: Color) {
        self.finished_color = color;
        self.invalidate();
    }

    pub fn unfinished_color(&self) -> Color {
        self.unfinished_color
    }

    pub fn set_unfinished_color(&mut self, color: Color) {
        self.unfinished_color = color;
        self.invalidate();
    }

    pub fn finished_drawable(&self) -> Option<ResourceId> {
        self.finished_drawable
    }

    pub fn set_finished_drawable(&mut self, drawable: Option<ResourceId>) {
        self.finished_drawable = drawable;
        self.resize(self.bounds);
        self.invalidate();
    }

    pub fn unfinished_drawable(&self) -> Option<ResourceId> {
        self.unfinished_drawable
    }

    pub fn set_unfinished_drawable(&mut self, drawable: Option<ResourceId>) {
        self.unfinished_drawable = drawable;
        self.resize(self.bounds);
        self.invalidate();
    }

    pub fn prefix_text(&self) -> &str {
        &self.prefix_text
    }

    pub fn set_prefix_text(&mut self, prefix: impl Into<String>) {
        self.prefix_text = prefix.into();
        self.invalidate();
    }

    pub fn suffix_text(&self) -> &str {
        &self.suffix_text
    }

    pub fn set_suffix_text(&mut self, suffix: impl Into<String>) {
        self.suffix_text = suffix.into();
        self.invalidate();
    }

    /// The label: prefix, current progress, suffix.
    pub fn draw_text(&self) -> String {
        format!("{}{}{}", self.prefix_text, self.progress, self.suffix_text)
    }

    /// Applies one queued update.
    pub fn apply(&mut self, command: ProgressCommand) {
        match command {
            ProgressCommand::SetProgress(progress) => self.set_progress(progress),
            ProgressCommand::SetMax(max) => self.set_max(max),
            ProgressCommand::SetProgressAndMax(progress, max) => {
                self.set_max(max);
                self.set_progress(progress);
            }
            ProgressCommand::SetFinishedColor(color) => self.set_finished_color(color),
            ProgressCommand::SetUnfinishedColor(color) => self.set_unfinished_color(color),
            ProgressCommand::SetTextColor(color) => self.set_text_color(color),
            ProgressCommand::SetTextSize(size) => self.set_text_size(size),
            ProgressCommand::SetPrefixText(prefix) => self.set_prefix_text(prefix),
            ProgressCommand::SetSuffixText(suffix) => self.set_suffix_text(suffix),
            ProgressCommand::SetFinishedDrawable(id) => self.set_finished_drawable(id),
            ProgressCommand::SetUnfinishedDrawable(id) => self.set_unfinished_drawable(id),
            ProgressCommand::Restore(snapshot) => self.restore_state(snapshot),
        }
    }

    // ------------------------------------------------------------------------
    // Layout and drawing
    // ------------------------------------------------------------------------

    /// Side of the smallest square this indicator wants.
    pub fn suggested_minimum_side(&self) -> f32 {
        self.min_side
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Takes the new surface size and rebuilds the disc-masked skins for it
    /// before returning.
    pub fn on_size_changed(&mut self, bounds: Size) {
        self.resize(bounds);
        self.invalidate();
    }

    fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.renderer.prepare(
            bounds,
            self.finished_drawable,
            self.unfinished_drawable,
            self.resources.as_ref(),
        );
    }

    /// Whether state changed since the last [`CircleProgress::render`].
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    fn invalidate(&mut self) {
        if !self.needs_redraw {
            self.needs_redraw = true;
            self.host.request_redraw();
        }
    }

    /// The snapshot the next redraw will draw.
    pub fn progress_config(&self) -> ProgressConfig {
        ProgressConfig {
            progress_ratio: self.progress_percentage(),
            progress: self.progress,
            bounds: self.bounds,
            finished_color: self.finished_color,
            unfinished_color: self.unfinished_color,
            text_color: self.text_color,
            text_size: self.text_size,
            prefix_text: self.prefix_text.clone(),
            suffix_text: self.suffix_text.clone(),
            finished_image: self.renderer.finished_image(),
            unfinished_image: self.renderer.unfinished_image(),
        }
    }

    /// Draws the current state. Returns `false` if the indicator has no size
    /// yet and nothing was drawn.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let host_bounds = self.host.current_bounds();
        if !host_bounds.is_empty() && host_bounds != self.bounds {
            self.resize(host_bounds);
        }
        self.renderer.prepare(
            self.bounds,
            self.finished_drawable,
            self.unfinished_drawable,
            self.resources.as_ref(),
        );

        let config = self.progress_config();
        self.needs_redraw = false;
        self.renderer.draw(&config, surface)
    }

    // ------------------------------------------------------------------------
    // Persisted state
    // ------------------------------------------------------------------------

    pub fn save_state(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            text_color: self.text_color.to_argb(),
            text_size: self.text_size,
            finished_color: self.finished_color.to_argb(),
            unfinished_color: self.unfinished_color.to_argb(),
            finished_drawable: ResourceId::to_raw(self.finished_drawable),
            // Long-standing layout of the record: this slot carries the
            // unfinished color, not the unfinished drawable.
            unfinished_drawable: self.unfinished_color.to_argb() as i32,
            max: self.max,
            progress: self.progress,
            suffix_text: self.suffix_text.clone(),
            prefix_text: self.prefix_text.clone(),
        }
    }

    /// Restores a saved record. Skins are re-derived from the restored
    /// drawable ids at the current size.
    pub fn restore_state(&mut self, snapshot: ProgressSnapshot) {
        self.text_color = Color::from_argb(snapshot.text_color);
        if config::is_valid_text_size(snapshot.text_size) {
            self.text_size = snapshot.text_size;
        } else {
            debug!(
                text_size = snapshot.text_size,
                "keeping current text size over invalid saved one"
            );
        }
        self.finished_color = Color::from_argb(snapshot.finished_color);
        self.unfinished_color = Color::from_argb(snapshot.unfinished_color);
        self.finished_drawable = ResourceId::from_raw(snapshot.finished_drawable);
        self.unfinished_drawable = ResourceId::from_raw(snapshot.unfinished_drawable);
        self.set_max(snapshot.max);
        self.set_progress(snapshot.progress);
        self.prefix_text = snapshot.prefix_text;
        self.suffix_text = snapshot.suffix_text;

        self.renderer.invalidate();
        self.resize(self.bounds);
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CountingHost {
        requests: Rc<Cell<usize>>,
    }

    impl Host for CountingHost {
        fn request_redraw(&self) {
            self.requests.set(self.requests.get() + 1);
        }

        fn current_bounds(&self) -> Size {
            Size::ZERO
        }
    }

    fn indicator() -> CircleProgress {
        CircleProgress::new(CircleProgressConfig::default())
    }

    #[test]
    fn progress_wraps_at_max() {
        let mut progress = indicator();
        progress.set_progress(100);
        assert_eq!(progress.progress(), 0);
        progress.set_progress(150);
        assert_eq!(progress.progress(), 50);
        progress.set_progress(99);
        assert_eq!(progress.progress(), 99);
    }

    #[test]
    fn negative_progress_clamps_to_zero() {
        let mut progress = indicator();
        progress.set_progress(-20);
        assert_eq!(progress.progress(), 0);
    }

    #[test]
    fn invalid_max_is_ignored() {
        let mut progress = indicator();
        progress.set_max(40);
        progress.set_max(0);
        assert_eq!(progress.max(), 40);
        progress.set_max(-5);
        assert_eq!(progress.max(), 40);
    }

    #[test]
    fn shrinking_max_rewraps_progress() {
        let mut progress = indicator();
        progress.set_progress(75);
        progress.set_max(50);
        assert_eq!(progress.progress(), 25);
        assert!(progress.progress_percentage() < 1.0);
    }

    #[test]
    fn config_progress_is_normalized_on_construction() {
        let progress = CircleProgress::new(
            CircleProgressConfig::builder()
                .max(0)
                .progress(130)
                .build(),
        );
        assert_eq!(progress.max(), 100);
        assert_eq!(progress.progress(), 30);
    }

    #[test]
    fn configured_text_size_must_be_positive() {
        let config = CircleProgressConfig::builder().text_size(-4.0).build();
        assert_eq!(CircleProgress::new(config).text_size(), 18.0);

        let config = CircleProgressConfig::builder().text_size(24.0).build();
        let progress = CircleProgress::new(config);
        assert_eq!(progress.text_size(), 24.0);
    }

    #[test]
    fn restore_keeps_text_size_when_saved_one_is_invalid() {
        let mut progress = indicator();
        progress.set_text_size(30.0);
        let mut snapshot = progress.save_state();
        snapshot.text_size = 0.0;
        snapshot.progress = 9;

        progress.restore_state(snapshot);
        assert_eq!(progress.text_size(), 30.0);
        assert_eq!(progress.progress(), 9);
    }

    #[test]
    fn label_composition() {
        let mut progress = indicator();
        progress.set_prefix_text("Loaded: ");
        progress.set_progress(7);
        progress.set_suffix_text("/10");
        assert_eq!(progress.draw_text(), "Loaded: 7/10");
    }

    #[test]
    fn mutations_coalesce_into_one_redraw_request() {
        let host = CountingHost::default();
        let requests = Rc::clone(&host.requests);
        let mut progress = indicator().with_host(host);
        assert_eq!(requests.get(), 1);

        progress.set_progress(10);
        progress.set_finished_color(Color::BLACK);
        progress.set_suffix_text("");
        assert_eq!(requests.get(), 1);

        let font = progress.font();
        progress.on_size_changed(Size::square(50.0));
        progress.render(&mut Scene::new(&font));
        assert!(!progress.needs_redraw());

        progress.set_progress(11);
        progress.set_progress(12);
        assert_eq!(requests.get(), 2);
        assert!(progress.needs_redraw());
    }

    #[test]
    fn unmeasured_indicator_draws_nothing() {
        let mut progress = indicator();
        let font = progress.font();
        let mut scene = Scene::new(&font);
        assert!(!progress.render(&mut scene));
        assert!(scene.is_empty());
    }

    #[test]
    fn commands_route_to_setters() {
        let mut progress = indicator();
        progress.apply(ProgressCommand::SetProgressAndMax(15, 10));
        assert_eq!((progress.progress(), progress.max()), (5, 10));
        progress.apply(ProgressCommand::SetTextColor(Color::BLACK));
        assert_eq!(progress.text_color(), Color::BLACK);
        progress.apply(ProgressCommand::SetTextSize(-1.0));
        assert_eq!(progress.text_size(), 18.0);
        progress.apply(ProgressCommand::SetPrefixText("~".to_string()));
        assert_eq!(progress.draw_text(), "~5%");
    }

    #[test]
    fn snapshot_records_unfinished_color_in_drawable_slot() {
        let mut progress = indicator();
        progress.set_unfinished_drawable(Some(ResourceId(12)));
        let snapshot = progress.save_state();
        assert_eq!(snapshot.unfinished_drawable, 0xffccccccu32 as i32);
        assert_eq!(snapshot.unfinished_color, 0xffcccccc);
        assert_eq!(snapshot.finished_drawable, -1);
    }
}
