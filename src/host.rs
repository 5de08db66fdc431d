//! The widget host an indicator lives in.

use crate::config::{dp_to_px, MIN_SIZE_DP};
use crate::geometry::Size;

/// Services the surrounding view system provides to an indicator.
pub trait Host {
    /// Asks for a redraw at the host's next opportunity. May be called
    /// any number of times; the host draws the latest state once.
    fn request_redraw(&self);

    /// Bounds currently assigned to the indicator.
    fn current_bounds(&self) -> Size;
}

/// Host of an indicator that is not attached to anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl Host for Detached {
    fn request_redraw(&self) {}

    fn current_bounds(&self) -> Size {
        Size::ZERO
    }
}

/// Squares the proposed bounds on their smaller side.
pub fn measure(proposed: Size) -> Size {
    Size::square(proposed.width.min(proposed.height).max(0.0))
}

/// Side of the smallest square the indicator wants, in pixels.
pub fn suggested_minimum_side(density: f32) -> f32 {
    dp_to_px(MIN_SIZE_DP, density)
}
