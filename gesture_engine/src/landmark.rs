//! Hand landmark model.
//!
//! A [`HandObservation`] is one detected hand in one frame: 21 named points
//! in normalized image coordinates (x → right, y → down, both 0–1) plus the
//! detector's left/right label.  The point layout follows the common
//! 21-landmark hand topology (wrist, four thumb joints, four joints per
//! finger).

use std::fmt;
use std::str::FromStr;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkPoint
// ════════════════════════════════════════════════════════════════════════════

/// A single landmark.  `z` is relative depth and is carried but not used by
/// any gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        LandmarkPoint { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmark — named indices
// ════════════════════════════════════════════════════════════════════════════

/// Named landmark indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Number of landmarks per hand.
    pub const COUNT: usize = 21;

    pub const fn index(self) -> usize { self as usize }
}

/// A non-thumb finger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger { Index, Middle, Ring, Pinky }

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Index  => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring   => HandLandmark::RingTip,
            Finger::Pinky  => HandLandmark::PinkyTip,
        }
    }

    /// The joint a curled fingertip drops below (the PIP joint).
    pub fn base(self) -> HandLandmark {
        match self {
            Finger::Index  => HandLandmark::IndexPip,
            Finger::Middle => HandLandmark::MiddlePip,
            Finger::Ring   => HandLandmark::RingPip,
            Finger::Pinky  => HandLandmark::PinkyPip,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

/// Detector-assigned label for which physical hand an observation is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness { Left, Right }

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left  => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Handedness::Left  => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a handedness label is neither "Left" nor "Right".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownHandedness(pub String);

impl fmt::Display for UnknownHandedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown handedness label {:?}", self.0)
    }
}

impl std::error::Error for UnknownHandedness {}

impl FromStr for Handedness {
    type Err = UnknownHandedness;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left"  => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            _       => Err(UnknownHandedness(s.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand in one frame.  Built fresh every frame, never retained
/// by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub landmarks:  [LandmarkPoint; HandLandmark::COUNT],
    pub handedness: Handedness,
}

impl HandObservation {
    pub fn new(handedness: Handedness, landmarks: [LandmarkPoint; HandLandmark::COUNT]) -> Self {
        HandObservation { landmarks, handedness }
    }

    /// Build from a detector's point list.  Returns `None` unless exactly
    /// [`HandLandmark::COUNT`] points are given.
    pub fn from_points(handedness: Handedness, points: &[LandmarkPoint]) -> Option<Self> {
        let landmarks: [LandmarkPoint; HandLandmark::COUNT] = points.try_into().ok()?;
        Some(HandObservation { landmarks, handedness })
    }

    #[inline]
    pub fn point(&self, which: HandLandmark) -> &LandmarkPoint {
        &self.landmarks[which.index()]
    }

    #[inline]
    pub fn point_mut(&mut self, which: HandLandmark) -> &mut LandmarkPoint {
        &mut self.landmarks[which.index()]
    }

    /// Horizontally mirrored copy: x ↦ 1 − x and the label swapped, as if
    /// the frame had been flipped before detection.
    pub fn mirrored(&self) -> Self {
        let mut out = self.clone();
        for p in out.landmarks.iter_mut() {
            p.x = 1.0 - p.x;
        }
        out.handedness = self.handedness.opposite();
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
