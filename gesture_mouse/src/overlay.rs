//! Front ends: the software-rendered landmark overlay and a headless stub.
//!
//! Layout of the overlay window:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                                              │
//! │   camera-frame space: hand skeletons,        │
//! │   cursor crosshair                           │
//! │                                              │
//! ├──────────────────────────────────────────────┤
//! │  status: source, hands, drag, vol, bri, evt  │
//! │  key legend                                  │
//! └──────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use gesture_engine::{HandLandmark, HandObservation, Handedness};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::source::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Frontend trait + HUD snapshot
// ════════════════════════════════════════════════════════════════════════════

/// What the status bar shows.  Updated by the run loop after each frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    pub source:     &'static str,
    pub dragging:   bool,
    pub last_event: String,
    pub volume:     Option<u8>,
    pub brightness: Option<u8>,
    /// Cursor target in screen pixels.
    pub cursor:     Option<(i32, i32)>,
    /// Cursor target as a fraction of the screen, for the crosshair.
    pub cursor_rel: Option<(f32, f32)>,
}

/// Human-facing side of the run loop: the cancel key and landmark display.
pub trait Frontend {
    /// Handle window input.  Returns false when the user asked to quit.
    fn poll_input(&mut self) -> bool;

    /// Show this frame's hands and status.
    fn present(&mut self, hands: &[HandObservation], hud: &Hud);
}

/// No window: never asks to quit, draws nothing.
#[derive(Debug, Default)]
pub struct Headless;

impl Frontend for Headless {
    fn poll_input(&mut self) -> bool { true }
    fn present(&mut self, _hands: &[HandObservation], _hud: &Hud) {}
}

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_TITLE:   &str  = "Virtual Mouse with Gestures";
pub const FRAME_W:     usize = 640;
pub const FRAME_H:     usize = 480;
const STATUS_H:        usize = 40;
pub const WIN_W:       usize = FRAME_W;
pub const WIN_H:       usize = FRAME_H + STATUS_H;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const FRAME_BG:        u32   = 0xFF101018;
const TEXT_BG:         u32   = 0xFF0F3460;
const LEFT_COLOR:      u32   = 0xFF66CCFF;
const RIGHT_COLOR:     u32   = 0xFFFF9966;
const JOINT_COLOR:     u32   = 0xFFEEEEEE;
const CURSOR_COLOR:    u32   = 0xFFFFD700;
const DRAG_COLOR:      u32   = 0xFFFF4444;

/// Bone segments of the 21-point hand, as landmark index pairs.
const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),  (1, 2),   (2, 3),   (3, 4),
    (0, 5),  (5, 6),   (6, 7),   (7, 8),
    (5, 9),  (9, 10),  (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

const FINGERTIPS: [HandLandmark; 5] = [
    HandLandmark::ThumbTip,
    HandLandmark::IndexTip,
    HandLandmark::MiddleTip,
    HandLandmark::RingTip,
    HandLandmark::PinkyTip,
];

// ════════════════════════════════════════════════════════════════════════════
// Overlay
// ════════════════════════════════════════════════════════════════════════════

pub struct Overlay {
    window:     Window,
    buf:        Vec<u32>,
    /// Present only when the simulator is the landmark source.
    sim_tx:     Option<Sender<SimInput>>,
    pinch_held: bool,
}

impl Overlay {
    pub fn new(sim_tx: Option<Sender<SimInput>>) -> Result<Self, String> {
        let mut window = Window::new(
            WIN_TITLE,
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.set_target_fps(60);

        Ok(Overlay {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            pinch_held: false,
        })
    }

    /// Translate pointer and keys into [`SimInput`] events.
    fn forward_sim_input(&mut self) {
        let Some(tx) = &self.sim_tx else { return };

        match self.window.get_mouse_pos(MouseMode::Discard) {
            Some((mx, my)) if (my as usize) < FRAME_H => {
                let _ = tx.send(SimInput::Pointer {
                    x: mx / FRAME_W as f32,
                    y: my / FRAME_H as f32,
                });
            }
            _ => { let _ = tx.send(SimInput::PointerLost); }
        }

        // Mouse button and C both hold the left pinch.
        let down = self.window.get_mouse_down(MouseButton::Left)
                || self.window.is_key_down(Key::C);
        if down != self.pinch_held {
            let evt = if down { SimInput::KeyDown(SimKey::LeftPinch) } else { SimInput::KeyUp(SimKey::LeftPinch) };
            let _ = tx.send(evt);
            self.pinch_held = down;
        }

        for (key, sim) in [(Key::R, SimKey::RightPinch), (Key::F, SimKey::Fist), (Key::Space, SimKey::Hide)] {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                let _ = tx.send(SimInput::KeyDown(sim));
            }
            if self.window.is_key_released(key) {
                let _ = tx.send(SimInput::KeyUp(sim));
            }
        }
        if self.window.is_key_pressed(Key::L, KeyRepeat::No) {
            let _ = tx.send(SimInput::KeyDown(SimKey::ToggleHand));
        }
    }

    // ── Hands ─────────────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: &HandObservation) {
        let color = match hand.handedness {
            Handedness::Left  => LEFT_COLOR,
            Handedness::Right => RIGHT_COLOR,
        };
        let px = |i: usize| {
            let p = &hand.landmarks[i];
            ((p.x * FRAME_W as f32) as isize, (p.y * FRAME_H as f32) as isize)
        };

        for &(a, b) in &HAND_CONNECTIONS {
            let (x0, y0) = px(a);
            let (x1, y1) = px(b);
            self.draw_line(x0, y0, x1, y1, color);
        }
        for i in 0..HandLandmark::COUNT {
            let (x, y) = px(i);
            self.fill_square(x, y, 1, JOINT_COLOR);
        }
        for tip in FINGERTIPS {
            let (x, y) = px(tip.index());
            self.fill_square(x, y, 3, color);
        }

        let (wx, wy) = px(HandLandmark::Wrist.index());
        if wx >= 0 && wy >= 0 {
            self.draw_label(hand.handedness.label(), wx as usize + 6, wy as usize, color);
        }
    }

    fn draw_crosshair(&mut self, rel: (f32, f32), dragging: bool) {
        let cx = (rel.0 * FRAME_W as f32) as isize;
        let cy = (rel.1 * FRAME_H as f32) as isize;
        let color = if dragging { DRAG_COLOR } else { CURSOR_COLOR };
        self.draw_line(cx - 8, cy, cx + 8, cy, color);
        self.draw_line(cx, cy - 8, cx, cy + 8, color);
    }

    // ── Status bar ────────────────────────────────────────────────────────

    fn draw_status(&mut self, hand_count: usize, hud: &Hud) {
        self.fill_rect(0, FRAME_H, WIN_W, STATUS_H, TEXT_BG);

        let pct = |v: Option<u8>| v.map_or_else(|| "-".to_string(), |v| format!("{}%", v));
        let cursor = hud.cursor.map_or_else(|| "-".to_string(), |(x, y)| format!("{},{}", x, y));
        let line = format!(
            "source {}  hands {}  cursor {}  drag {}  vol {}  bri {}",
            hud.source,
            hand_count,
            cursor,
            if hud.dragging { "on" } else { "off" },
            pct(hud.volume),
            pct(hud.brightness),
        );
        self.draw_label(&line, 10, FRAME_H + 8, 0xFFEEEEEE);
        self.draw_label(&hud.last_event, WIN_W - 90, FRAME_H + 8, CURSOR_COLOR);

        let legend = if self.sim_tx.is_some() {
            "mouse=move  C/click=pinch  R=right  F=fist  L=hand  Space=hide  Q=quit"
        } else {
            "Q=quit"
        };
        self.draw_label(legend, 10, WIN_H - 12, 0xFF888888);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x_end = (x + w).min(WIN_W);
        for row in self.buf.chunks_exact_mut(WIN_W).skip(y).take(h) {
            if x < x_end {
                row[x..x_end].fill(color);
            }
        }
    }

    /// Square of side `2r+1` centred on `(cx, cy)`, clipped to the frame.
    fn fill_square(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                self.set_frame_pixel(x, y, color);
            }
        }
    }

    /// Bresenham line, clipped to the frame area.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let dx =  (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_frame_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn set_frame_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < FRAME_W && (y as usize) < FRAME_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W {
            if let Some(px) = self.buf.get_mut(y * WIN_W + x) {
                *px = color;
            }
        }
    }

    /// 3×5 bitmap text, 4 px advance, clipped at the right edge.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let columns = (WIN_W.saturating_sub(x)) / 4;
        for (i, ch) in text.chars().take(columns).enumerate() {
            let left = x + 4 * i;
            for (dy, bits) in char_glyph(ch).into_iter().enumerate() {
                for dx in (0..3).filter(|dx| bits & (0b100 >> dx) != 0) {
                    self.set_pixel(left + dx, y + dy, color);
                }
            }
        }
    }
}

impl Frontend for Overlay {
    fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return false;
        }

        self.forward_sim_input();
        true
    }

    fn present(&mut self, hands: &[HandObservation], hud: &Hud) {
        self.buf.fill(BG_COLOR);
        self.fill_rect(0, 0, FRAME_W, FRAME_H, FRAME_BG);

        for hand in hands {
            self.draw_hand(hand);
        }
        if let Some(rel) = hud.cursor_rel {
            self.draw_crosshair(rel, hud.dragging);
        }
        self.draw_status(hands.len(), hud);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
