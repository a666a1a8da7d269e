//! Fist detection and the drag state machine.
//!
//! ```text
//!            fist
//!   NotDragging ─────▶ Dragging        emits DragEvent::Start (button down)
//!   NotDragging ◀───── Dragging        emits DragEvent::End   (button up)
//!            !fist
//! ```
//!
//! Staying in either state emits nothing, so a fist held for N frames
//! produces exactly one `Start`.

use tracing::debug;

use crate::geometry::distance;
use crate::landmark::{Finger, HandLandmark, HandObservation};

/// True when all four fingers are curled (tip below its PIP joint in image
/// coordinates, where y grows downward) and the thumb tip is within
/// `thumb_distance` of the thumb IP joint.
pub fn is_fist(hand: &HandObservation, thumb_distance: f32) -> bool {
    let curled = Finger::ALL
        .iter()
        .all(|f| hand.point(f.tip()).y > hand.point(f.base()).y);
    curled
        && distance(hand.point(HandLandmark::ThumbTip), hand.point(HandLandmark::ThumbIp))
            < thumb_distance
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    NotDragging,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent { Start, End }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragMachine {
    phase: DragPhase,
}

impl DragMachine {
    pub fn new() -> Self { Self::default() }

    pub fn phase(&self) -> DragPhase { self.phase }

    pub fn is_dragging(&self) -> bool { self.phase == DragPhase::Dragging }

    /// Feed this frame's fist predicate; returns the edge, if any.
    pub fn update(&mut self, fist: bool) -> Option<DragEvent> {
        match (self.phase, fist) {
            (DragPhase::NotDragging, true) => {
                self.phase = DragPhase::Dragging;
                debug!("drag machine: NotDragging -> Dragging");
                Some(DragEvent::Start)
            }
            (DragPhase::Dragging, false) => {
                self.phase = DragPhase::NotDragging;
                debug!("drag machine: Dragging -> NotDragging");
                Some(DragEvent::End)
            }
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
