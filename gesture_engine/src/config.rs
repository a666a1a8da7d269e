//! Gesture thresholds and mapping ranges.

use std::time::Duration;

use crate::landmark::Handedness;

/// Target screen size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width:  u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        ScreenSize { width, height }
    }
}

impl Default for ScreenSize {
    fn default() -> Self { ScreenSize::new(1920, 1080) }
}

/// Every tunable the engine reads.  Distances are in normalized image units.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Weight of the previous cursor position in the exponential smoother.
    /// 0.0 follows the finger exactly; values near 1.0 barely move.
    pub smoothing_alpha: f32,

    /// Index tip ↔ middle tip distance below which a left click fires.
    pub left_click_distance: f32,

    /// Index tip ↔ thumb tip distance below which a right click fires.
    pub right_click_distance: f32,

    /// Minimum time between two clicks of the same button.  Zero re-arms the
    /// click on every frame.
    pub click_cooldown: Duration,

    /// Thumb tip ↔ thumb IP distance below which the thumb counts as tucked
    /// for the fist test.
    pub fist_thumb_distance: f32,

    /// Hand whose pose drives volume and brightness.
    pub analog_hand: Handedness,

    /// Volume for index-tip y = 0 and y = 1.
    pub volume_range: (f32, f32),

    /// Brightness percentage for thumb-tip y = 0 and y = 1.
    pub brightness_range: (f32, f32),
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            smoothing_alpha:      0.8,
            left_click_distance:  0.03,
            right_click_distance: 0.03,
            click_cooldown:       Duration::ZERO,
            fist_thumb_distance:  0.05,
            analog_hand:          Handedness::Left,
            volume_range:         (1.0, 0.0),
            brightness_range:     (100.0, 0.0),
        }
    }
}
