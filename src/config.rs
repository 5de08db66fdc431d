//! Colors, defaults and the indicator configuration builder.

use bon::Builder;

use crate::resources::ResourceId;

// ============================================================================
// COLOR
// ============================================================================

/// RGBA color of an indicator element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Color = Color::rgba(0x00, 0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks a `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }
}

// ============================================================================
// DEFAULTS
// ============================================================================

pub const DEFAULT_FINISHED_COLOR: Color = Color::rgb(66, 145, 241);
pub const DEFAULT_UNFINISHED_COLOR: Color = Color::rgb(204, 204, 204);
pub const DEFAULT_TEXT_COLOR: Color = Color::WHITE;
pub const DEFAULT_MAX: i32 = 100;
/// Label size in scale-independent points.
pub const DEFAULT_TEXT_SIZE_SP: f32 = 18.0;
/// Side of the suggested minimum square, in density-independent units.
pub const MIN_SIZE_DP: f32 = 100.0;

pub fn dp_to_px(dp: f32, density: f32) -> f32 {
    dp * density
}

pub fn sp_to_px(sp: f32, scaled_density: f32) -> f32 {
    sp * scaled_density
}

/// Label sizes must be positive; NaN is rejected too.
pub fn is_valid_text_size(size: f32) -> bool {
    size > 0.0
}

// ============================================================================
// INDICATOR CONFIGURATION
// ============================================================================

/// Initial attributes of a [`crate::CircleProgress`].
///
/// ```
/// use circle_progress::{CircleProgressConfig, Color};
///
/// let config = CircleProgressConfig::builder()
///     .finished_color(Color::rgb(0x42, 0x91, 0xf1))
///     .max(10)
///     .progress(7)
///     .prefix_text("Loaded: ".to_string())
///     .suffix_text("/10".to_string())
///     .build();
/// assert_eq!(config.max, 10);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct CircleProgressConfig {
    #[builder(default = DEFAULT_FINISHED_COLOR)]
    pub finished_color: Color,
    #[builder(default = DEFAULT_UNFINISHED_COLOR)]
    pub unfinished_color: Color,
    #[builder(default = DEFAULT_TEXT_COLOR)]
    pub text_color: Color,
    /// Label size in pixels; derived from the density when unset.
    pub text_size: Option<f32>,

    #[builder(default = DEFAULT_MAX)]
    pub max: i32,
    #[builder(default = 0)]
    pub progress: i32,

    #[builder(default = String::new())]
    pub prefix_text: String,
    #[builder(default = "%".to_string())]
    pub suffix_text: String,

    pub finished_drawable: Option<ResourceId>,
    pub unfinished_drawable: Option<ResourceId>,

    /// Pixels per density-independent unit.
    #[builder(default = 1.0)]
    pub density: f32,

    /// TrueType/OpenType font used for the label.
    pub font_data: Option<Vec<u8>>,

    // Window configuration
    #[builder(default = "Circle Progress".to_string())]
    pub title: String,
    #[builder(default = 300)]
    pub window_size: u32,
    #[builder(default = Color::rgb(0x30, 0x30, 0x30))]
    pub background_color: Color,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
}

impl Default for CircleProgressConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CircleProgressConfig {
    /// The configured label size, or the density-scaled default when it is
    /// unset or not a positive number.
    pub fn resolved_text_size(&self) -> f32 {
        self.text_size
            .filter(|&size| is_valid_text_size(size))
            .unwrap_or_else(|| sp_to_px(DEFAULT_TEXT_SIZE_SP, self.density))
    }

    pub fn min_side(&self) -> f32 {
        crate::host::suggested_minimum_side(self.density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing() {
        let color = Color::from_argb(0xff4291f1);
        assert_eq!(color, DEFAULT_FINISHED_COLOR);
        assert_eq!(DEFAULT_UNFINISHED_COLOR.to_argb(), 0xffcccccc);
        assert_eq!(Color::from_argb(0x80102030), Color::rgba(0x10, 0x20, 0x30, 0x80));
        assert_eq!(Color::TRANSPARENT.to_argb(), 0);
    }

    #[test]
    fn builder_defaults() {
        let config = CircleProgressConfig::default();
        assert_eq!(config.finished_color, Color::rgb(66, 145, 241));
        assert_eq!(config.unfinished_color, Color::rgb(204, 204, 204));
        assert_eq!(config.text_color, Color::WHITE);
        assert_eq!(config.max, 100);
        assert_eq!(config.progress, 0);
        assert_eq!(config.prefix_text, "");
        assert_eq!(config.suffix_text, "%");
        assert_eq!(config.finished_drawable, None);
        assert_eq!(config.unfinished_drawable, None);
        assert_eq!(config.resolved_text_size(), 18.0);
        assert_eq!(config.min_side(), 100.0);
    }

    #[test]
    fn sizes_scale_with_density() {
        let config = CircleProgressConfig::builder().density(2.0).build();
        assert_eq!(config.resolved_text_size(), 36.0);
        assert_eq!(config.min_side(), 200.0);

        let explicit = CircleProgressConfig::builder()
            .density(2.0)
            .text_size(12.0)
            .build();
        assert_eq!(explicit.resolved_text_size(), 12.0);
    }

    #[test]
    fn invalid_text_size_falls_back_to_default() {
        for size in [0.0, -4.0, f32::NAN] {
            let config = CircleProgressConfig::builder()
                .density(2.0)
                .text_size(size)
                .build();
            assert_eq!(config.resolved_text_size(), 36.0);
        }
    }
}
