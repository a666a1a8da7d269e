//! Left-hand analog controls: index-tip height → volume, thumb-tip height →
//! brightness.  Both are pure functions of this frame's landmarks; no
//! smoothing, dead zone, or rate limit.

use crate::geometry::interp;
use crate::landmark::{HandLandmark, HandObservation, Handedness};

/// Analog levels derived from one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalogLevels {
    /// Master volume scalar, 0.0–1.0.
    pub volume:     f32,
    /// Display brightness percentage, 0–100.
    pub brightness: u8,
}

impl AnalogLevels {
    /// Volume as a whole percentage, truncated.
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0) as u8
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AnalogMapper {
    hand:             Handedness,
    volume_range:     (f32, f32),
    brightness_range: (f32, f32),
}

impl AnalogMapper {
    pub fn new(hand: Handedness, volume_range: (f32, f32), brightness_range: (f32, f32)) -> Self {
        AnalogMapper { hand, volume_range, brightness_range }
    }

    /// Levels for `hand`, or `None` if it is not the controlling hand.
    pub fn map(&self, hand: &HandObservation) -> Option<AnalogLevels> {
        if hand.handedness != self.hand {
            return None;
        }
        Some(self.levels(hand))
    }

    /// Levels regardless of handedness.
    pub fn levels(&self, hand: &HandObservation) -> AnalogLevels {
        let index_y = hand.point(HandLandmark::IndexTip).y;
        let thumb_y = hand.point(HandLandmark::ThumbTip).y;
        let volume = interp(index_y, (0.0, 1.0), self.volume_range).clamp(0.0, 1.0);
        let brightness = interp(thumb_y, (0.0, 1.0), self.brightness_range).clamp(0.0, 100.0);
        AnalogLevels { volume, brightness: brightness as u8 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
