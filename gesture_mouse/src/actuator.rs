//! Output side: cursor, mouse buttons, volume, brightness.
//!
//! [`Actuators`] is the only way the run loop touches the desktop.  Two
//! backends:
//!
//! * [`DesktopActuators`] — `enigo` for the pointer, external commands for
//!   volume and brightness.
//! * [`DryRunActuators`] — logs every call and does nothing.
//!
//! Every call is synchronous and assumed immediately effective.  Nothing is
//! retried; an error ends the session.

use std::fmt;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::str::FromStr;

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use gesture_engine::ScreenSize;
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// ActuatorError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("input backend unavailable: {0}")]
    Init(String),

    #[error("mouse input rejected: {0}")]
    Input(String),

    #[error("no {0} command configured for this platform (pass --{0}-cmd)")]
    NotConfigured(&'static str),

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source:  io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

// ════════════════════════════════════════════════════════════════════════════
// Actuators trait
// ════════════════════════════════════════════════════════════════════════════

pub trait Actuators {
    /// Move the pointer to absolute screen pixel `(x, y)`.
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError>;
    fn click(&mut self) -> Result<(), ActuatorError>;
    fn right_click(&mut self) -> Result<(), ActuatorError>;
    /// Press and hold the primary button.
    fn mouse_down(&mut self) -> Result<(), ActuatorError>;
    /// Release the primary button.
    fn mouse_up(&mut self) -> Result<(), ActuatorError>;
    /// Master volume, 0.0–1.0.
    fn set_volume_scalar(&mut self, level: f32) -> Result<(), ActuatorError>;
    /// Display brightness, 0–100.
    fn set_brightness(&mut self, percent: u8) -> Result<(), ActuatorError>;
}

// ════════════════════════════════════════════════════════════════════════════
// CommandTemplate — one external setter command
// ════════════════════════════════════════════════════════════════════════════

/// A program plus arguments, with `{percent}` (0–100) and `{scalar}`
/// (0.00–1.00) substituted at call time.  No shell is involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args:    Vec<String>,
}

impl CommandTemplate {
    pub fn new<I, S>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = parts.into_iter().map(Into::into);
        let program = parts.next()?;
        Some(CommandTemplate { program, args: parts.collect() })
    }

    pub fn program(&self) -> &str { &self.program }

    /// Arguments with placeholders filled in.
    pub fn render_args(&self, scalar: f32, percent: u8) -> Vec<String> {
        let scalar = format!("{:.2}", scalar);
        let percent = percent.to_string();
        self.args
            .iter()
            .map(|a| a.replace("{percent}", &percent).replace("{scalar}", &scalar))
            .collect()
    }

    pub fn run(&self, scalar: f32, percent: u8) -> Result<(), ActuatorError> {
        let args = self.render_args(scalar, percent);
        debug!(program = %self.program, ?args, "running setter command");
        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| ActuatorError::Spawn { program: self.program.clone(), source })?;
        if status.success() {
            Ok(())
        } else {
            Err(ActuatorError::Failed { program: self.program.clone(), status })
        }
    }
}

/// Parses a whitespace-separated command line (no quoting).
impl FromStr for CommandTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandTemplate::new(s.split_whitespace()).ok_or_else(|| "empty command".to_string())
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for a in &self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AnalogCommands — volume + brightness setters
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalogCommands {
    pub volume:     Option<CommandTemplate>,
    pub brightness: Option<CommandTemplate>,
}

impl AnalogCommands {
    /// Stock setters for the host OS, where one is commonly installed.
    pub fn platform_default() -> Self {
        #[cfg(target_os = "linux")]
        {
            AnalogCommands {
                volume:     CommandTemplate::new(["pactl", "set-sink-volume", "@DEFAULT_SINK@", "{percent}%"]),
                brightness: CommandTemplate::new(["brightnessctl", "--quiet", "set", "{percent}%"]),
            }
        }
        #[cfg(target_os = "macos")]
        {
            AnalogCommands {
                volume:     CommandTemplate::new(["osascript", "-e", "set volume output volume {percent}"]),
                brightness: CommandTemplate::new(["brightness", "{scalar}"]),
            }
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            AnalogCommands::default()
        }
    }

    pub fn set_volume(&self, level: f32) -> Result<(), ActuatorError> {
        let cmd = self.volume.as_ref().ok_or(ActuatorError::NotConfigured("volume"))?;
        let level = level.clamp(0.0, 1.0);
        cmd.run(level, (level * 100.0) as u8)
    }

    pub fn set_brightness(&self, percent: u8) -> Result<(), ActuatorError> {
        let cmd = self.brightness.as_ref().ok_or(ActuatorError::NotConfigured("brightness"))?;
        let percent = percent.min(100);
        cmd.run(percent as f32 / 100.0, percent)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DesktopActuators — enigo + commands
// ════════════════════════════════════════════════════════════════════════════

pub struct DesktopActuators {
    enigo:  Enigo,
    analog: AnalogCommands,
}

impl DesktopActuators {
    pub fn new(analog: AnalogCommands) -> Result<Self, ActuatorError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| ActuatorError::Init(format!("{:?}", e)))?;
        Ok(DesktopActuators { enigo, analog })
    }

    /// Size of the main display as reported by the input backend.
    pub fn screen_size(&self) -> Result<ScreenSize, ActuatorError> {
        let (w, h) = self.enigo
            .main_display()
            .map_err(|e| ActuatorError::Input(format!("{:?}", e)))?;
        Ok(ScreenSize::new(w.max(1) as u32, h.max(1) as u32))
    }

    fn button(&mut self, button: Button, direction: Direction) -> Result<(), ActuatorError> {
        self.enigo
            .button(button, direction)
            .map_err(|e| ActuatorError::Input(format!("{:?}", e)))
    }
}

impl Actuators for DesktopActuators {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| ActuatorError::Input(format!("{:?}", e)))
    }

    fn click(&mut self)       -> Result<(), ActuatorError> { self.button(Button::Left,  Direction::Click) }
    fn right_click(&mut self) -> Result<(), ActuatorError> { self.button(Button::Right, Direction::Click) }
    fn mouse_down(&mut self)  -> Result<(), ActuatorError> { self.button(Button::Left,  Direction::Press) }
    fn mouse_up(&mut self)    -> Result<(), ActuatorError> { self.button(Button::Left,  Direction::Release) }

    fn set_volume_scalar(&mut self, level: f32) -> Result<(), ActuatorError> {
        self.analog.set_volume(level)
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), ActuatorError> {
        self.analog.set_brightness(percent)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DryRunActuators — log only
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct DryRunActuators;

impl Actuators for DryRunActuators {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
        debug!(x, y, "[dry-run] move cursor");
        Ok(())
    }
    fn click(&mut self) -> Result<(), ActuatorError> {
        debug!("[dry-run] left click");
        Ok(())
    }
    fn right_click(&mut self) -> Result<(), ActuatorError> {
        debug!("[dry-run] right click");
        Ok(())
    }
    fn mouse_down(&mut self) -> Result<(), ActuatorError> {
        debug!("[dry-run] mouse down");
        Ok(())
    }
    fn mouse_up(&mut self) -> Result<(), ActuatorError> {
        debug!("[dry-run] mouse up");
        Ok(())
    }
    fn set_volume_scalar(&mut self, level: f32) -> Result<(), ActuatorError> {
        debug!(level, "[dry-run] set volume");
        Ok(())
    }
    fn set_brightness(&mut self, percent: u8) -> Result<(), ActuatorError> {
        debug!(percent, "[dry-run] set brightness");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_placeholders() {
        let t: CommandTemplate = "setvol --level {percent}% --raw {scalar}".parse().unwrap();
        assert_eq!(t.program(), "setvol");
        assert_eq!(t.render_args(0.5, 50), vec!["--level", "50%", "--raw", "0.50"]);
    }

    #[test]
    fn template_rejects_empty() {
        assert!("   ".parse::<CommandTemplate>().is_err());
        assert!(CommandTemplate::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn template_display_round_trips_words() {
        let t: CommandTemplate = "brightnessctl set {percent}%".parse().unwrap();
        assert_eq!(t.to_string(), "brightnessctl set {percent}%");
    }

    #[test]
    fn missing_command_is_an_error() {
        let cmds = AnalogCommands::default();
        assert!(matches!(cmds.set_volume(0.5),   Err(ActuatorError::NotConfigured("volume"))));
        assert!(matches!(cmds.set_brightness(50), Err(ActuatorError::NotConfigured("brightness"))));
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_is_ok() {
        let cmds = AnalogCommands {
            volume:     "true {percent}".parse().ok(),
            brightness: "true {scalar}".parse().ok(),
        };
        assert!(cmds.set_volume(0.3).is_ok());
        assert!(cmds.set_brightness(70).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_status() {
        let cmds = AnalogCommands { volume: "false".parse().ok(), brightness: None };
        assert!(matches!(cmds.set_volume(0.3), Err(ActuatorError::Failed { .. })));
    }

    #[test]
    fn unknown_program_reports_spawn_error() {
        let cmds = AnalogCommands {
            volume:     "definitely-not-a-real-setter-binary".parse().ok(),
            brightness: None,
        };
        assert!(matches!(cmds.set_volume(0.3), Err(ActuatorError::Spawn { .. })));
    }

    #[test]
    fn dry_run_accepts_everything() {
        let mut a = DryRunActuators;
        assert!(a.move_cursor(10, 20).is_ok());
        assert!(a.click().is_ok());
        assert!(a.mouse_down().is_ok());
        assert!(a.mouse_up().is_ok());
        assert!(a.set_volume_scalar(0.4).is_ok());
        assert!(a.set_brightness(40).is_ok());
    }
}
