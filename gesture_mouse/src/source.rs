//! Landmark sources — where hand observations come from.
//!
//! Capture and detection are external, so both sit behind one seam,
//! [`LandmarkSource`].  The run loop does not know whether hands came from
//! the keyboard/mouse simulator, a JSON-lines stream written by an external
//! detector, or a LeapMotion controller.
//!
//! ## Simulation controls
//!
//! | Input | Pose |
//! |---|---|
//! | Mouse pointer | Index fingertip position |
//! | `C` or left mouse button (hold) | Index + middle pinch |
//! | `R` (hold) | Index + thumb pinch |
//! | `F` (hold) | Fist |
//! | `Space` (hold) | Hide hand |
//! | `L` | Toggle handedness label (Left drives volume/brightness) |

use std::io::BufRead;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use gesture_engine::{HandLandmark, HandObservation, Handedness, LandmarkPoint};
use serde::Deserialize;
use tracing::{debug, warn};

// ════════════════════════════════════════════════════════════════════════════
// SourceFrame / SourceError / LandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Everything the detector reported for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceFrame {
    pub hands:     Vec<HandObservation>,
    /// Source-provided timestamp.  When absent the run loop uses its own
    /// monotonic clock.
    pub timestamp: Option<Duration>,
}

impl SourceFrame {
    pub fn live(hands: Vec<HandObservation>) -> Self {
        SourceFrame { hands, timestamp: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read landmark stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed landmark frame on line {line}: {source}")]
    Parse {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("tracking device error: {0}")]
    Device(String),
}

/// A blocking supplier of detected hands.
pub trait LandmarkSource {
    /// Next frame, or `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<SourceFrame>, SourceError>;

    fn name(&self) -> &'static str;
}

// ════════════════════════════════════════════════════════════════════════════
// JsonlSource — one JSON object per line
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct FrameJson {
    #[serde(default)]
    timestamp_ms: Option<u64>,
    #[serde(default)]
    hands:        Vec<HandJson>,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    #[serde(default = "full_confidence")]
    score:      f32,
    landmarks:  Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

fn full_confidence() -> f32 { 1.0 }

/// Reads frames such as
///
/// ```text
/// {"timestamp_ms": 1234, "hands": [{"handedness": "Left", "score": 0.93,
///   "landmarks": [{"x": 0.51, "y": 0.62, "z": -0.01}, ... 21 entries]}]}
/// ```
///
/// Hands below `min_confidence`, with an unknown label, or without exactly
/// 21 landmarks are dropped.  Blank lines are skipped.
pub struct JsonlSource<R> {
    reader:         R,
    min_confidence: f32,
    line:           usize,
    buf:            String,
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(reader: R, min_confidence: f32) -> Self {
        JsonlSource { reader, min_confidence, line: 0, buf: String::new() }
    }

    fn convert(&self, frame: FrameJson) -> SourceFrame {
        let hands = frame.hands
            .into_iter()
            .filter_map(|hand| self.convert_hand(hand))
            .collect();
        SourceFrame {
            hands,
            timestamp: frame.timestamp_ms.map(Duration::from_millis),
        }
    }

    fn convert_hand(&self, hand: HandJson) -> Option<HandObservation> {
        if hand.score < self.min_confidence {
            debug!(line = self.line, score = hand.score, "hand below confidence threshold");
            return None;
        }
        let handedness = match hand.handedness.parse::<Handedness>() {
            Ok(h)  => h,
            Err(e) => {
                warn!(line = self.line, "{}", e);
                return None;
            }
        };
        let points: Vec<LandmarkPoint> = hand.landmarks
            .iter()
            .map(|l| LandmarkPoint::new(l.x, l.y, l.z))
            .collect();
        let obs = HandObservation::from_points(handedness, &points);
        if obs.is_none() {
            warn!(
                line = self.line,
                "expected {} landmarks, got {}", HandLandmark::COUNT, points.len()
            );
        }
        obs
    }
}

impl<R: BufRead> LandmarkSource for JsonlSource<R> {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            let frame: FrameJson = serde_json::from_str(text)
                .map_err(|source| SourceError::Parse { line: self.line, source })?;
            return Ok(Some(self.convert(frame)));
        }
    }

    fn name(&self) -> &'static str { "jsonl" }
}

// ════════════════════════════════════════════════════════════════════════════
// SimSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the overlay window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalized to the window.
    Pointer { x: f32, y: f32 },
    /// Pointer left the window.
    PointerLost,
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated controls (mapped from minifb keys and mouse buttons).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    LeftPinch,      // C / left mouse button
    RightPinch,     // R
    Fist,           // F
    Hide,           // Space
    ToggleHand,     // L
}

/// Pose knobs for the synthetic hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimPose {
    /// Where the index fingertip goes, normalized.
    pub tip:         (f32, f32),
    pub handedness:  Handedness,
    pub left_pinch:  bool,
    pub right_pinch: bool,
    pub fist:        bool,
}

impl SimPose {
    pub fn open(handedness: Handedness, x: f32, y: f32) -> Self {
        SimPose { tip: (x, y), handedness, left_pinch: false, right_pinch: false, fist: false }
    }
}

// Offsets from the index tip, in normalized units, for a right hand facing
// the camera.  Order follows `HandLandmark`.
const OPEN_HAND: [(f32, f32); HandLandmark::COUNT] = [
    ( 0.060,  0.300),                                                   // wrist
    (-0.020,  0.260), (-0.050,  0.210), (-0.080,  0.170), (-0.100,  0.120), // thumb
    ( 0.000,  0.160), ( 0.000,  0.100), ( 0.000,  0.050), ( 0.000,  0.000), // index
    ( 0.040,  0.160), ( 0.040,  0.090), ( 0.040,  0.040), ( 0.040, -0.010), // middle
    ( 0.080,  0.170), ( 0.080,  0.110), ( 0.080,  0.060), ( 0.080,  0.020), // ring
    ( 0.115,  0.190), ( 0.115,  0.140), ( 0.115,  0.100), ( 0.115,  0.070), // pinky
];

const FIST_HAND: [(f32, f32); HandLandmark::COUNT] = [
    ( 0.060,  0.200),
    ( 0.000,  0.180), ( 0.010,  0.100), ( 0.030,  0.050), ( 0.050,  0.050),
    ( 0.000, -0.020), ( 0.000, -0.050), ( 0.000, -0.030), ( 0.000,  0.000),
    ( 0.040, -0.020), ( 0.040, -0.055), ( 0.040, -0.035), ( 0.040,  0.000),
    ( 0.080, -0.015), ( 0.080, -0.045), ( 0.080, -0.025), ( 0.080,  0.005),
    ( 0.115,  0.000), ( 0.115, -0.030), ( 0.115, -0.015), ( 0.115,  0.015),
];

/// Build a full 21-point hand for `pose`.
pub fn sim_hand(pose: &SimPose) -> HandObservation {
    let (tx, ty) = pose.tip;
    let shape = if pose.fist { &FIST_HAND } else { &OPEN_HAND };
    // A left hand is the mirror image: thumb on the other side.
    let flip = if pose.handedness == Handedness::Left { -1.0 } else { 1.0 };

    let mut landmarks = [LandmarkPoint::default(); HandLandmark::COUNT];
    for (p, &(dx, dy)) in landmarks.iter_mut().zip(shape.iter()) {
        *p = LandmarkPoint::new(tx + flip * dx, ty + dy, 0.0);
    }
    let mut hand = HandObservation::new(pose.handedness, landmarks);

    if pose.left_pinch {
        *hand.point_mut(HandLandmark::MiddleTip) = LandmarkPoint::new(tx + flip * 0.010, ty, 0.0);
    }
    if pose.right_pinch {
        *hand.point_mut(HandLandmark::ThumbTip) = LandmarkPoint::new(tx, ty + 0.015, 0.0);
    }
    hand
}

/// Gesture source driven by [`SimInput`] events from the overlay window.
///
/// The window sends raw input over the channel; this source keeps the pose
/// and emits one synthetic hand per frame.
pub struct SimSource {
    rx:          Receiver<SimInput>,
    pointer:     Option<(f32, f32)>,
    handedness:  Handedness,
    left_pinch:  bool,
    right_pinch: bool,
    fist:        bool,
    hidden:      bool,
}

impl SimSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimSource {
            rx,
            pointer:     None,
            handedness:  Handedness::Right,
            left_pinch:  false,
            right_pinch: false,
            fist:        false,
            hidden:      false,
        }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y }          => self.pointer = Some((x, y)),
            SimInput::PointerLost               => self.pointer = None,
            SimInput::KeyDown(SimKey::LeftPinch)  => self.left_pinch  = true,
            SimInput::KeyUp(SimKey::LeftPinch)    => self.left_pinch  = false,
            SimInput::KeyDown(SimKey::RightPinch) => self.right_pinch = true,
            SimInput::KeyUp(SimKey::RightPinch)   => self.right_pinch = false,
            SimInput::KeyDown(SimKey::Fist)     => self.fist   = true,
            SimInput::KeyUp(SimKey::Fist)       => self.fist   = false,
            SimInput::KeyDown(SimKey::Hide)     => self.hidden = true,
            SimInput::KeyUp(SimKey::Hide)       => self.hidden = false,
            SimInput::KeyDown(SimKey::ToggleHand) => {
                self.handedness = self.handedness.opposite();
                debug!(hand = %self.handedness, "simulated handedness toggled");
            }
            SimInput::KeyUp(SimKey::ToggleHand) => {}
        }
    }

    pub fn pose(&self) -> Option<SimPose> {
        if self.hidden {
            return None;
        }
        self.pointer.map(|tip| SimPose {
            tip,
            handedness:  self.handedness,
            left_pinch:  self.left_pinch,
            right_pinch: self.right_pinch,
            fist:        self.fist,
        })
    }
}

impl LandmarkSource for SimSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>, SourceError> {
        loop {
            match self.rx.try_recv() {
                Ok(input)                       => self.apply(input),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => return Ok(None),
            }
        }
        let hands = self.pose().map(|p| sim_hand(&p)).into_iter().collect();
        Ok(Some(SourceFrame::live(hands)))
    }

    fn name(&self) -> &'static str { "sim" }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Joint positions (millimetres, y up) are projected into the normalized
/// frame: x ∈ [−200, 200] mm → [0, 1], y ∈ [100, 500] mm → [1, 0].
#[cfg(feature = "leap")]
pub struct LeapSource {
    connection: leaprs::Connection,
}

#[cfg(feature = "leap")]
impl LeapSource {
    const X_MIN_MM:  f32 = -200.0;
    const Y_MIN_MM:  f32 = 100.0;
    const SPAN_MM:   f32 = 400.0;
    const POLL_MS:   u32 = 100;

    pub fn open() -> Result<Self, SourceError> {
        use leaprs::*;
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| SourceError::Device(format!("failed to open LeapC connection: {:?}", e)))?;
        connection
            .open()
            .map_err(|e| SourceError::Device(format!("failed to open LeapMotion device: {:?}", e)))?;
        Ok(LeapSource { connection })
    }

    fn project(x: f32, y: f32, z: f32) -> LandmarkPoint {
        LandmarkPoint::new(
            (x - Self::X_MIN_MM) / Self::SPAN_MM,
            1.0 - (y - Self::Y_MIN_MM) / Self::SPAN_MM,
            z / Self::SPAN_MM,
        )
    }

    fn observe(hand: &leaprs::Hand) -> Option<HandObservation> {
        use leaprs::HandType;

        let handedness = if hand.hand_type() == HandType::Left {
            Handedness::Left
        } else {
            Handedness::Right
        };

        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 { return None; }

        let mut points = Vec::with_capacity(HandLandmark::COUNT);
        let palm = hand.palm().position();
        points.push(Self::project(palm.x, palm.y, palm.z));
        // Per digit: knuckle, middle joint, last joint, tip.  For the thumb
        // LeapC's proximal bone is the anatomical metacarpal.
        for digit in &digits {
            for j in [
                digit.proximal().prev_joint(),
                digit.intermediate().prev_joint(),
                digit.distal().prev_joint(),
                digit.distal().next_joint(),
            ] {
                points.push(Self::project(j.x, j.y, j.z));
            }
        }
        HandObservation::from_points(handedness, &points)
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>, SourceError> {
        use leaprs::Event;

        // Timeouts and non-tracking messages yield an empty frame so the run
        // loop keeps polling its cancel key.
        let msg = match self.connection.poll(Self::POLL_MS) {
            Ok(m)  => m,
            Err(_) => return Ok(Some(SourceFrame::default())),
        };
        if let Event::Tracking(frame) = msg.event() {
            let hands = frame.hands()
                .filter_map(|h| Self::observe(&h))
                .collect();
            return Ok(Some(SourceFrame::live(hands)));
        }
        Ok(Some(SourceFrame::default()))
    }

    fn name(&self) -> &'static str { "leap" }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
