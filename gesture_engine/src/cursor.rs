//! Index-fingertip → screen cursor mapping with exponential smoothing.

use crate::config::ScreenSize;
use crate::landmark::LandmarkPoint;

/// A cursor position in screen pixels.  Kept fractional between frames so
/// the smoother converges instead of stalling on integer truncation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self { ScreenPoint { x, y } }

    /// Nearest whole pixel, clamped into the screen rectangle.
    pub fn to_pixel(self, screen: ScreenSize) -> (i32, i32) {
        let max_x = screen.width.saturating_sub(1) as f32;
        let max_y = screen.height.saturating_sub(1) as f32;
        (
            self.x.round().clamp(0.0, max_x) as i32,
            self.y.round().clamp(0.0, max_y) as i32,
        )
    }
}

/// Exponential smoother: `new = α·previous + (1 − α)·raw`.
#[derive(Clone, Copy, Debug)]
pub struct CursorSmoother {
    alpha: f32,
}

impl CursorSmoother {
    pub fn new(alpha: f32) -> Self {
        CursorSmoother { alpha: alpha.clamp(0.0, 1.0) }
    }

    /// Scale a normalized landmark straight onto the screen.
    pub fn raw_target(tip: &LandmarkPoint, screen: ScreenSize) -> ScreenPoint {
        ScreenPoint::new(tip.x * screen.width as f32, tip.y * screen.height as f32)
    }

    /// Next smoothed position given the previous one and this frame's tip.
    pub fn smooth(&self, previous: ScreenPoint, tip: &LandmarkPoint, screen: ScreenSize) -> ScreenPoint {
        let raw = Self::raw_target(tip, screen);
        let a = self.alpha;
        ScreenPoint::new(
            a * previous.x + (1.0 - a) * raw.x,
            a * previous.y + (1.0 - a) * raw.y,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
