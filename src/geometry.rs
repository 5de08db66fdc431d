//! Progress-to-geometry mapping.
//!
//! A liquid level at height `fill` from the bottom of a circle is the chord
//! at distance `radius - fill` from the center. The chord's endpoints sit at
//! a half angle `acos((radius - fill) / radius)` either side of the downward
//! vertical, so two arcs sharing those endpoints describe the empty and the
//! filled part of the disc. Angles follow the drawing frame: degrees,
//! clockwise from +x with y pointing down, so 90° is the bottom of the circle.

// ============================================================================
// SIZES AND RECTANGLES
// ============================================================================

/// Width and height of a drawing area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// True when there is nothing to draw into yet.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Size rounded down to whole pixels.
    pub fn to_pixels(self) -> (u32, u32) {
        (self.width.max(0.0) as u32, self.height.max(0.0) as u32)
    }
}

/// Floating-point rectangle, used as the oval bounds of an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// Integer pixel rectangle, right and bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(size: Size) -> Self {
        let (width, height) = size.to_pixels();
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

// ============================================================================
// ARC GEOMETRY
// ============================================================================

/// One arc, as a start angle and a clockwise sweep, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start: f32,
    pub sweep: f32,
}

/// Half angle of the chord at `ratio * side` above the bottom of a circle
/// of diameter `side`, in degrees.
///
/// Ranges over `[0, 180]` for `ratio` in `[0, 1]`, reaching 90 at half fill.
/// A zero `side` has no circle to speak of and yields NaN.
pub fn half_angle_degrees(ratio: f32, side: f32) -> f32 {
    let fill_height = ratio * side;
    let radius = side / 2.0;
    let cos = (radius - fill_height) / radius;
    if cos.is_nan() {
        return f32::NAN;
    }
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Arc parameters for one frame of the indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub angle_deg: f32,
    pub unfinished_start: f32,
    pub unfinished_sweep: f32,
    /// Start of the finished arc in a frame rotated 180° about the center.
    pub finished_start: f32,
    pub finished_sweep: f32,
    pub fill_height: f32,
}

impl ArcGeometry {
    /// Maps a fill ratio, already normalized into `[0, 1]`, onto a circle of
    /// diameter `side`. Returns `None` when the surface has no size yet.
    pub fn compute(ratio: f32, side: f32) -> Option<Self> {
        let angle = half_angle_degrees(ratio, side);
        if !angle.is_finite() {
            return None;
        }
        Some(Self {
            angle_deg: angle,
            unfinished_start: 90.0 + angle,
            unfinished_sweep: 360.0 - 2.0 * angle,
            finished_start: 270.0 - angle,
            finished_sweep: 2.0 * angle,
            fill_height: ratio * side,
        })
    }

    pub fn unfinished(&self) -> ArcSpan {
        ArcSpan {
            start: self.unfinished_start,
            sweep: self.unfinished_sweep,
        }
    }

    /// The finished arc in the rotated frame, for surfaces that draw it
    /// under a 180° rotation about the center.
    pub fn finished_rotated(&self) -> ArcSpan {
        ArcSpan {
            start: self.finished_start,
            sweep: self.finished_sweep,
        }
    }

    /// The same finished arc expressed in the unrotated frame.
    pub fn finished(&self) -> ArcSpan {
        ArcSpan {
            start: 90.0 - self.angle_deg,
            sweep: self.finished_sweep,
        }
    }

    /// Region of a `bounds`-sized raster that lies below the liquid level.
    pub fn finished_region(&self, bounds: Size) -> Rect {
        let (width, height) = bounds.to_pixels();
        let (width, height) = (width as i32, height as i32);
        Rect::new(0, height - self.fill_height as i32, width, height)
    }
}
