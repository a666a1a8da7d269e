use clap::{Parser, ValueEnum};
use gesture_engine::ScreenSize;

use crate::actuator::CommandTemplate;

/// Hand-gesture virtual mouse.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Where hand landmarks come from
    #[arg(long, value_enum, default_value_t = SourceKind::Sim)]
    pub source: SourceKind,

    /// JSON-lines landmark stream for `--source jsonl` ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Flip landmarks horizontally and swap handedness (selfie camera)
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// Ignore detected hands scored below this confidence
    #[arg(long, default_value_t = 0.7)]
    pub min_confidence: f32,

    /// Screen size as WIDTHxHEIGHT (default: main display)
    #[arg(long, value_parser = parse_screen)]
    pub screen: Option<ScreenSize>,

    /// Log actions instead of moving the mouse or touching volume/brightness
    #[arg(long)]
    pub dry_run: bool,

    /// No overlay window
    #[arg(long)]
    pub headless: bool,

    /// Volume setter command; `{percent}` and `{scalar}` are substituted
    #[arg(long)]
    pub volume_cmd: Option<CommandTemplate>,

    /// Brightness setter command; `{percent}` and `{scalar}` are substituted
    #[arg(long)]
    pub brightness_cmd: Option<CommandTemplate>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Synthetic hand driven from the overlay window
    Sim,
    /// JSON-lines landmarks from an external detector
    Jsonl,
    /// LeapMotion controller (needs the `leap` feature)
    Leap,
}

/// Parse `1920x1080`.
pub fn parse_screen(s: &str) -> Result<ScreenSize, String> {
    let (w, h) = s
        .trim()
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("bad width {:?}: {}", w, e))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("bad height {:?}: {}", h, e))?;
    if width == 0 || height == 0 {
        return Err("screen dimensions must be non-zero".to_string());
    }
    Ok(ScreenSize::new(width, height))
}
