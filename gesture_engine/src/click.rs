//! Pinch clicks with per-button cooldown.
//!
//! Two pinches are watched each frame:
//!
//! | Pinch | Landmarks | Event |
//! |---|---|---|
//! | index + middle | `IndexTip` ↔ `MiddleTip` | [`ClickEvent::Left`] |
//! | index + thumb  | `IndexTip` ↔ `ThumbTip`  | [`ClickEvent::Right`] |
//!
//! The index+middle pinch is tested first.  When it is closed the
//! index+thumb pinch is not considered at all for that frame, even if the
//! left button is still cooling down, so one frame yields at most one click.

use std::time::Duration;

use crate::geometry::distance;
use crate::landmark::{HandLandmark, HandObservation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickEvent { Left, Right }

/// When each button last fired.  `None` means never, which is always armed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickTimers {
    pub last_left:  Option<Duration>,
    pub last_right: Option<Duration>,
}

#[derive(Clone, Copy, Debug)]
pub struct ClickDetector {
    left_distance:  f32,
    right_distance: f32,
    cooldown:       Duration,
}

impl ClickDetector {
    pub fn new(left_distance: f32, right_distance: f32, cooldown: Duration) -> Self {
        ClickDetector { left_distance, right_distance, cooldown }
    }

    /// Test both pinches for `hand` at time `now`, updating `timers` when a
    /// click fires.
    pub fn detect(
        &self,
        timers: &mut ClickTimers,
        hand:   &HandObservation,
        now:    Duration,
    ) -> Option<ClickEvent> {
        let index = hand.point(HandLandmark::IndexTip);
        let pinch_click = distance(index, hand.point(HandLandmark::MiddleTip));
        let pinch_right = distance(index, hand.point(HandLandmark::ThumbTip));
        self.decide(timers, pinch_click, pinch_right, now)
    }

    /// The decision itself, on precomputed pinch distances.
    pub fn decide(
        &self,
        timers:      &mut ClickTimers,
        pinch_click: f32,
        pinch_right: f32,
        now:         Duration,
    ) -> Option<ClickEvent> {
        if pinch_click < self.left_distance {
            if self.armed(timers.last_left, now) {
                timers.last_left = Some(now);
                return Some(ClickEvent::Left);
            }
        } else if pinch_right < self.right_distance && self.armed(timers.last_right, now) {
            timers.last_right = Some(now);
            return Some(ClickEvent::Right);
        }
        None
    }

    fn armed(&self, last: Option<Duration>, now: Duration) -> bool {
        match last {
            None       => true,
            Some(last) => now.checked_sub(last).map_or(false, |dt| dt > self.cooldown),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
