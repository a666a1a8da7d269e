//! The per-frame gesture engine.
//!
//! [`GestureEngine`] owns all cross-frame state and turns one frame's hand
//! observations into [`ControlOutputs`].  Each handedness has its own cursor,
//! click timers, and drag machine; a hand that is absent from a frame leaves
//! its state untouched.

use std::time::Duration;

use crate::analog::{AnalogLevels, AnalogMapper};
use crate::click::{ClickDetector, ClickEvent, ClickTimers};
use crate::config::{GestureConfig, ScreenSize};
use crate::cursor::{CursorSmoother, ScreenPoint};
use crate::drag::{is_fist, DragEvent, DragMachine};
use crate::landmark::{HandLandmark, HandObservation, Handedness};

// ════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════

/// Everything remembered about one hand between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandState {
    /// Smoothed cursor, screen pixels.  Starts at the origin.
    pub cursor: ScreenPoint,
    pub clicks: ClickTimers,
    pub drag:   DragMachine,
}

/// Engine state: one [`HandState`] per handedness.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineState {
    left:  HandState,
    right: HandState,
}

impl EngineState {
    pub fn hand(&self, handedness: Handedness) -> &HandState {
        match handedness {
            Handedness::Left  => &self.left,
            Handedness::Right => &self.right,
        }
    }

    fn hand_mut(&mut self, handedness: Handedness) -> &mut HandState {
        match handedness {
            Handedness::Left  => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    /// True if either hand is holding the primary button.
    pub fn any_dragging(&self) -> bool {
        self.left.drag.is_dragging() || self.right.drag.is_dragging()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Outputs
// ════════════════════════════════════════════════════════════════════════════

/// What one observed hand asks the actuators to do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandOutputs {
    pub handedness: Handedness,
    /// Smoothed cursor target, screen pixels.
    pub cursor:     ScreenPoint,
    pub click:      Option<ClickEvent>,
    pub drag:       Option<DragEvent>,
    pub analog:     Option<AnalogLevels>,
}

/// All outputs of one frame, in observation order.  Empty when no hand was
/// seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlOutputs {
    pub hands: Vec<HandOutputs>,
}

impl ControlOutputs {
    pub fn is_empty(&self) -> bool { self.hands.is_empty() }

    pub fn clicks(&self) -> impl Iterator<Item = ClickEvent> + '_ {
        self.hands.iter().filter_map(|h| h.click)
    }

    pub fn drags(&self) -> impl Iterator<Item = DragEvent> + '_ {
        self.hands.iter().filter_map(|h| h.drag)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureEngine {
    config:   GestureConfig,
    screen:   ScreenSize,
    smoother: CursorSmoother,
    clicks:   ClickDetector,
    analog:   AnalogMapper,
    state:    EngineState,
}

impl GestureEngine {
    pub fn new(config: GestureConfig, screen: ScreenSize) -> Self {
        let smoother = CursorSmoother::new(config.smoothing_alpha);
        let clicks = ClickDetector::new(
            config.left_click_distance,
            config.right_click_distance,
            config.click_cooldown,
        );
        let analog = AnalogMapper::new(
            config.analog_hand,
            config.volume_range,
            config.brightness_range,
        );
        GestureEngine {
            config,
            screen,
            smoother,
            clicks,
            analog,
            state: EngineState::default(),
        }
    }

    pub fn screen(&self) -> ScreenSize   { self.screen }
    pub fn state(&self)  -> &EngineState { &self.state }

    /// Process one frame.  `now` is a monotonic timestamp used only for click
    /// cooldowns.
    pub fn process(&mut self, hands: &[HandObservation], now: Duration) -> ControlOutputs {
        let outputs = hands
            .iter()
            .map(|hand| self.process_hand(hand, now))
            .collect();
        ControlOutputs { hands: outputs }
    }

    fn process_hand(&mut self, hand: &HandObservation, now: Duration) -> HandOutputs {
        let screen = self.screen;
        let fist = is_fist(hand, self.config.fist_thumb_distance);
        let state = self.state.hand_mut(hand.handedness);

        // ── cursor ────────────────────────────────────────────────────────
        let tip = hand.point(HandLandmark::IndexTip);
        state.cursor = self.smoother.smooth(state.cursor, tip, screen);

        // ── click / drag (independent; both may fire) ────────────────────
        let click = self.clicks.detect(&mut state.clicks, hand, now);
        let drag = state.drag.update(fist);

        HandOutputs {
            handedness: hand.handedness,
            cursor:     state.cursor,
            click,
            drag,
            analog:     self.analog.map(hand),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
