//! # gesture_mouse
//!
//! Hand-gesture virtual mouse.  Hand landmarks from a camera detector (or a
//! LeapMotion, or the built-in simulator) drive the desktop cursor, mouse
//! buttons, master volume and display brightness, with a live overlay of
//! the tracked hands.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Index fingertip position | Any | Cursor follows (smoothed) |
//! | Index + middle tips together | Any | Left click |
//! | Index tip + thumb tip together | Any | Right click |
//! | Fist (fingers curled, thumb tucked) | Any | Hold left button (drag) |
//! | Open the fist | Any | Release left button |
//! | Index tip height | Left | Master volume (top = 100%) |
//! | Thumb tip height | Left | Display brightness (top = 100%) |
//!
//! ## Sources
//!
//! * `sim` (default) — synthetic hand steered from the overlay window.
//! * `jsonl` — one JSON object per frame from an external detector.
//! * `leap` — LeapMotion via LeapC (build with `--features leap`).
//!
//! ### Simulation controls
//!
//! | Input | Gesture |
//! |---|---|
//! | Mouse over the window | Index fingertip |
//! | `C` / left mouse button | Left-click pinch |
//! | `R` | Right-click pinch |
//! | `F` (hold) | Fist |
//! | `Space` (hold) | Hide the hand |
//! | `L` | Toggle Left / Right hand |
//! | `Q` / `Escape` | Quit |

pub mod actuator;
pub mod source;
pub mod overlay;
pub mod args;
pub mod app;
