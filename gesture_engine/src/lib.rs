//! # gesture_engine
//!
//! Turns per-frame hand landmarks into mouse and media controls.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Index fingertip position | Either | Smoothed cursor target |
//! | Index + middle tips pinched | Either | Left click |
//! | Index + thumb tips pinched | Either | Right click (only if no left pinch) |
//! | Fist closes | Either | Drag start (primary button down) |
//! | Fist opens | Either | Drag end (primary button up) |
//! | Index fingertip height | Left | Volume, 1.0 at top of frame → 0.0 at bottom |
//! | Thumb tip height | Left | Brightness, 100 at top → 0 at bottom |
//!
//! The engine does no I/O.  Feed [`GestureEngine::process`] the hands seen in
//! one frame and apply the returned [`ControlOutputs`] yourself.
//!
//! ```
//! use std::time::Duration;
//! use gesture_engine::{GestureConfig, GestureEngine, HandObservation, Handedness,
//!                      LandmarkPoint, ScreenSize};
//!
//! let mut engine = GestureEngine::new(GestureConfig::default(), ScreenSize::new(1920, 1080));
//! let hand = HandObservation::new(Handedness::Right, [LandmarkPoint::new(0.5, 0.5, 0.0); 21]);
//! let out = engine.process(&[hand], Duration::from_millis(16));
//! assert_eq!(out.hands.len(), 1);
//! ```

pub mod geometry;
pub mod landmark;
pub mod config;
pub mod cursor;
pub mod click;
pub mod drag;
pub mod analog;
pub mod engine;

pub use analog::{AnalogLevels, AnalogMapper};
pub use click::{ClickDetector, ClickEvent, ClickTimers};
pub use config::{GestureConfig, ScreenSize};
pub use cursor::{CursorSmoother, ScreenPoint};
pub use drag::{is_fist, DragEvent, DragMachine, DragPhase};
pub use engine::{ControlOutputs, EngineState, GestureEngine, HandOutputs, HandState};
pub use geometry::{distance, interp};
pub use landmark::{Finger, HandLandmark, HandObservation, Handedness, LandmarkPoint};
