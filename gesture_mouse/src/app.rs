//! The control loop.
//!
//! One iteration is one frame, run to completion before the next:
//!
//! ```text
//! poll()  ──▶  GestureEngine::process()  ──▶  apply()  ──▶  Frontend::present()
//! ```
//!
//! The loop owns the engine (and so all cross-frame state).  It ends on the
//! cancel key, at end of stream, or on the first source/actuator error.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use gesture_engine::{
    ClickEvent, ControlOutputs, DragEvent, GestureConfig, GestureEngine, HandObservation,
    ScreenSize,
};
use tracing::{debug, info};

use crate::actuator::{ActuatorError, Actuators, AnalogCommands, DesktopActuators, DryRunActuators};
use crate::args::{Args, SourceKind};
use crate::overlay::{Frontend, Headless, Hud, Overlay};
use crate::source::{JsonlSource, LandmarkSource, SimInput, SimSource, SourceError, SourceFrame};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for one control session.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub screen:  ScreenSize,
    /// Flip landmarks horizontally (and swap handedness) before the engine
    /// sees them.
    pub mirror:  bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gesture: GestureConfig::default(),
            screen:  ScreenSize::default(),
            mirror:  false,
        }
    }
}

/// Totals reported when a session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub clicks: usize,
    pub drags:  usize,
}

// ════════════════════════════════════════════════════════════════════════════
// poll / apply
// ════════════════════════════════════════════════════════════════════════════

/// Result of one poll.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOrSignal {
    Frame(SourceFrame),
    EndOfStream,
    Quit,
}

/// Check the cancel key, then fetch the next frame.
pub fn poll(
    frontend: &mut dyn Frontend,
    source:   &mut dyn LandmarkSource,
) -> Result<FrameOrSignal, SourceError> {
    if !frontend.poll_input() {
        return Ok(FrameOrSignal::Quit);
    }
    Ok(match source.next_frame()? {
        Some(frame) => FrameOrSignal::Frame(frame),
        None        => FrameOrSignal::EndOfStream,
    })
}

/// The one primary button all hands share.  Pressed while any hand drags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimaryButton {
    held: bool,
}

impl PrimaryButton {
    pub fn is_held(&self) -> bool { self.held }

    fn press(&mut self, actuators: &mut dyn Actuators) -> Result<(), ActuatorError> {
        if !self.held {
            actuators.mouse_down()?;
            self.held = true;
        }
        Ok(())
    }

    fn release(&mut self, actuators: &mut dyn Actuators) -> Result<(), ActuatorError> {
        if self.held {
            actuators.mouse_up()?;
            self.held = false;
        }
        Ok(())
    }
}

/// Apply one frame's outputs, hand by hand: cursor, click, drag edge, then
/// volume and brightness.
///
/// `dragging` is whether any hand is still dragging after this frame.  A
/// hand's drag end only releases `button` once no hand drags.
pub fn apply(
    outputs:   &ControlOutputs,
    screen:    ScreenSize,
    dragging:  bool,
    button:    &mut PrimaryButton,
    actuators: &mut dyn Actuators,
) -> Result<(), ActuatorError> {
    for hand in &outputs.hands {
        let (x, y) = hand.cursor.to_pixel(screen);
        actuators.move_cursor(x, y)?;

        match hand.click {
            Some(ClickEvent::Left) => {
                actuators.click()?;
                info!(hand = %hand.handedness, "Left Click");
            }
            Some(ClickEvent::Right) => {
                actuators.right_click()?;
                info!(hand = %hand.handedness, "Right Click");
            }
            None => {}
        }

        match hand.drag {
            Some(DragEvent::Start) => {
                button.press(actuators)?;
                info!(hand = %hand.handedness, "Drag Started");
            }
            Some(DragEvent::End) => {
                if !dragging {
                    button.release(actuators)?;
                }
                info!(hand = %hand.handedness, "Drag Ended");
            }
            None => {}
        }

        if let Some(levels) = hand.analog {
            actuators.set_volume_scalar(levels.volume)?;
            info!("Volume: {}%", levels.volume_percent());
            actuators.set_brightness(levels.brightness)?;
            info!("Brightness: {}%", levels.brightness);
        }
    }
    Ok(())
}

/// Engine time for each frame.
///
/// Consecutive stamped frames advance by the difference of their source
/// stamps; any step involving an unstamped frame advances by local clock
/// time.  The result never jumps between time bases, and a stamp that goes
/// backwards advances nothing.
#[derive(Clone, Copy, Debug, Default)]
struct FrameClock {
    last: Option<Tick>,
}

#[derive(Clone, Copy, Debug)]
struct Tick {
    stamp: Option<Duration>,
    wall:  Duration,
    now:   Duration,
}

impl FrameClock {
    fn tick(&mut self, stamp: Option<Duration>, wall: Duration) -> Duration {
        let now = match self.last {
            None => stamp.unwrap_or(wall),
            Some(prev) => {
                let step = match (prev.stamp, stamp) {
                    (Some(a), Some(b)) => b.saturating_sub(a),
                    _                  => wall.saturating_sub(prev.wall),
                };
                prev.now + step
            }
        };
        self.last = Some(Tick { stamp, wall, now });
        now
    }
}

fn update_hud(hud: &mut Hud, outputs: &ControlOutputs, engine: &GestureEngine) {
    let screen = engine.screen();
    hud.dragging = engine.state().any_dragging();
    for hand in &outputs.hands {
        hud.cursor = Some(hand.cursor.to_pixel(screen));
        hud.cursor_rel = Some((
            hand.cursor.x / screen.width.max(1) as f32,
            hand.cursor.y / screen.height.max(1) as f32,
        ));
        if let Some(click) = hand.click {
            hud.last_event = match click {
                ClickEvent::Left  => "LEFT CLICK".to_string(),
                ClickEvent::Right => "RIGHT CLICK".to_string(),
            };
        }
        if let Some(drag) = hand.drag {
            hud.last_event = match drag {
                DragEvent::Start => "DRAG START".to_string(),
                DragEvent::End   => "DRAG END".to_string(),
            };
        }
        if let Some(levels) = hand.analog {
            hud.volume = Some(levels.volume_percent());
            hud.brightness = Some(levels.brightness);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run_loop — the frame loop proper
// ════════════════════════════════════════════════════════════════════════════

/// Drive `source` through the engine into `actuators` until the front end
/// quits or the stream ends.
pub fn run_loop(
    cfg:       &AppConfig,
    source:    &mut dyn LandmarkSource,
    frontend:  &mut dyn Frontend,
    actuators: &mut dyn Actuators,
) -> anyhow::Result<RunSummary> {
    let mut engine = GestureEngine::new(cfg.gesture.clone(), cfg.screen);
    let started = Instant::now();
    let mut clock = FrameClock::default();
    let mut button = PrimaryButton::default();
    let mut hud = Hud { source: source.name(), ..Hud::default() };
    let mut summary = RunSummary::default();

    loop {
        let frame = match poll(frontend, source).context("landmark source failed")? {
            FrameOrSignal::Frame(frame) => frame,
            FrameOrSignal::EndOfStream  => { info!("landmark stream ended"); break; }
            FrameOrSignal::Quit         => { info!("quit requested");       break; }
        };

        let now = clock.tick(frame.timestamp, started.elapsed());
        let hands: Vec<HandObservation> = if cfg.mirror {
            frame.hands.iter().map(HandObservation::mirrored).collect()
        } else {
            frame.hands
        };

        let outputs = engine.process(&hands, now);
        let dragging = engine.state().any_dragging();
        apply(&outputs, cfg.screen, dragging, &mut button, actuators)
            .with_context(|| format!("actuator failed on frame {}", summary.frames))?;

        summary.frames += 1;
        summary.clicks += outputs.clicks().count();
        summary.drags  += outputs.drags().filter(|d| *d == DragEvent::Start).count();

        update_hud(&mut hud, &outputs, &engine);
        frontend.present(&hands, &hud);
    }

    // Leave no button held behind on a clean exit.
    if button.is_held() {
        button.release(actuators).context("failed to release held button")?;
        info!("Drag Ended (shutdown)");
    }
    debug!(?summary, "loop finished");
    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// run() — wire CLI choices to concrete parts
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Entry point called from `main.rs`: picks actuators, screen size, source,
/// and front end from `args`, then drives [`run_loop`].
pub fn run(args: Args) -> anyhow::Result<()> {
    let (mut actuators, screen) = build_actuators(&args)?;
    info!(width = screen.width, height = screen.height, dry_run = args.dry_run, "screen");

    let cfg = AppConfig {
        gesture: GestureConfig::default(),
        screen,
        mirror:  args.mirror,
    };

    let summary = match args.source {
        SourceKind::Sim => {
            if args.headless {
                bail!("the simulated source is driven from the overlay window; drop --headless");
            }
            let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
            let mut source = SimSource::new(sim_rx);
            let mut frontend = build_frontend(false, Some(sim_tx))?;
            run_loop(&cfg, &mut source, frontend.as_mut(), actuators.as_mut())?
        }
        SourceKind::Jsonl => {
            let reader: Box<dyn BufRead> = if args.input == "-" {
                Box::new(io::stdin().lock())
            } else {
                let file = File::open(&args.input)
                    .with_context(|| format!("cannot open landmark stream {}", args.input))?;
                Box::new(BufReader::new(file))
            };
            let mut source = JsonlSource::new(reader, args.min_confidence);
            let mut frontend = build_frontend(args.headless, None)?;
            run_loop(&cfg, &mut source, frontend.as_mut(), actuators.as_mut())?
        }
        SourceKind::Leap => run_leap(&cfg, &args, actuators.as_mut())?,
    };

    info!(frames = summary.frames, clicks = summary.clicks, drags = summary.drags, "session ended");
    Ok(())
}

fn build_actuators(args: &Args) -> anyhow::Result<(Box<dyn Actuators>, ScreenSize)> {
    if args.dry_run {
        return Ok((Box::new(DryRunActuators), args.screen.unwrap_or_default()));
    }

    let mut analog = AnalogCommands::platform_default();
    if let Some(cmd) = &args.volume_cmd {
        analog.volume = Some(cmd.clone());
    }
    if let Some(cmd) = &args.brightness_cmd {
        analog.brightness = Some(cmd.clone());
    }
    debug!(?analog, "analog setters");

    let desktop = DesktopActuators::new(analog).context("failed to initialise mouse control")?;
    let screen = match args.screen {
        Some(s) => s,
        None    => desktop.screen_size().context("could not query display size; pass --screen")?,
    };
    Ok((Box::new(desktop), screen))
}

fn build_frontend(
    headless: bool,
    sim_tx:   Option<Sender<SimInput>>,
) -> anyhow::Result<Box<dyn Frontend>> {
    if headless {
        return Ok(Box::new(Headless));
    }
    let overlay = Overlay::new(sim_tx)
        .map_err(anyhow::Error::msg)
        .context("failed to open overlay window")?;
    Ok(Box::new(overlay))
}

#[cfg(feature = "leap")]
fn run_leap(cfg: &AppConfig, args: &Args, actuators: &mut dyn Actuators) -> anyhow::Result<RunSummary> {
    let mut source = crate::source::LeapSource::open()?;
    let mut frontend = build_frontend(args.headless, None)?;
    run_loop(cfg, &mut source, frontend.as_mut(), actuators)
}

#[cfg(not(feature = "leap"))]
fn run_leap(_cfg: &AppConfig, _args: &Args, _actuators: &mut dyn Actuators) -> anyhow::Result<RunSummary> {
    bail!("built without LeapMotion support; rebuild with `--features leap`")
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{sim_hand, SimPose};
    use gesture_engine::{AnalogLevels, Handedness, HandOutputs, ScreenPoint};
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Move(i32, i32),
        Click,
        RightClick,
        Down,
        Up,
        Volume(f32),
        Brightness(u8),
    }

    #[derive(Default)]
    struct Recorder {
        calls:          Vec<Call>,
        fail_on_volume: bool,
    }

    impl Recorder {
        fn without_moves(&self) -> Vec<Call> {
            self.calls.iter().filter(|c| !matches!(c, Call::Move(..))).cloned().collect()
        }
    }

    impl Actuators for Recorder {
        fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
            self.calls.push(Call::Move(x, y));
            Ok(())
        }
        fn click(&mut self) -> Result<(), ActuatorError> {
            self.calls.push(Call::Click);
            Ok(())
        }
        fn right_click(&mut self) -> Result<(), ActuatorError> {
            self.calls.push(Call::RightClick);
            Ok(())
        }
        fn mouse_down(&mut self) -> Result<(), ActuatorError> {
            self.calls.push(Call::Down);
            Ok(())
        }
        fn mouse_up(&mut self) -> Result<(), ActuatorError> {
            self.calls.push(Call::Up);
            Ok(())
        }
        fn set_volume_scalar(&mut self, level: f32) -> Result<(), ActuatorError> {
            if self.fail_on_volume {
                return Err(ActuatorError::NotConfigured("volume"));
            }
            self.calls.push(Call::Volume(level));
            Ok(())
        }
        fn set_brightness(&mut self, percent: u8) -> Result<(), ActuatorError> {
            self.calls.push(Call::Brightness(percent));
            Ok(())
        }
    }

    /// Replays canned frames.
    struct VecSource(VecDeque<SourceFrame>);

    impl VecSource {
        fn stamped(frames: Vec<(Option<Duration>, Vec<HandObservation>)>) -> Self {
            VecSource(
                frames.into_iter()
                    .map(|(timestamp, hands)| SourceFrame { hands, timestamp })
                    .collect(),
            )
        }

        fn new(frames: Vec<Vec<HandObservation>>) -> Self {
            VecSource(
                frames.into_iter()
                    .enumerate()
                    .map(|(i, hands)| SourceFrame {
                        hands,
                        timestamp: Some(Duration::from_millis(33 * (i as u64 + 1))),
                    })
                    .collect(),
            )
        }
    }

    impl LandmarkSource for VecSource {
        fn next_frame(&mut self) -> Result<Option<SourceFrame>, SourceError> {
            let frame = self.0.pop_front();
            // Unstamped frames run on the local clock; make sure it moves.
            if matches!(frame, Some(SourceFrame { timestamp: None, .. })) {
                std::thread::sleep(Duration::from_millis(2));
            }
            Ok(frame)
        }
        fn name(&self) -> &'static str { "vec" }
    }

    /// Quits after `frames` polls.
    struct QuitAfter { frames: usize, presented: usize }

    impl Frontend for QuitAfter {
        fn poll_input(&mut self) -> bool {
            if self.frames == 0 { return false; }
            self.frames -= 1;
            true
        }
        fn present(&mut self, _hands: &[HandObservation], _hud: &Hud) {
            self.presented += 1;
        }
    }

    fn pose(handedness: Handedness) -> SimPose {
        SimPose::open(handedness, 0.5, 0.5)
    }

    fn cfg() -> AppConfig {
        AppConfig { screen: ScreenSize::new(1000, 1000), ..AppConfig::default() }
    }

    #[test]
    fn apply_orders_calls_per_hand() {
        let outputs = ControlOutputs {
            hands: vec![HandOutputs {
                handedness: Handedness::Left,
                cursor:     ScreenPoint::new(100.4, 200.6),
                click:      Some(ClickEvent::Right),
                drag:       Some(DragEvent::Start),
                analog:     Some(AnalogLevels { volume: 0.25, brightness: 60 }),
            }],
        };
        let mut rec = Recorder::default();
        let mut button = PrimaryButton::default();
        apply(&outputs, ScreenSize::new(1000, 1000), true, &mut button, &mut rec).unwrap();
        assert!(button.is_held());
        assert_eq!(rec.calls, vec![
            Call::Move(100, 201),
            Call::RightClick,
            Call::Down,
            Call::Volume(0.25),
            Call::Brightness(60),
        ]);
    }

    #[test]
    fn empty_frame_touches_nothing() {
        let mut rec = Recorder::default();
        apply(&ControlOutputs::default(), ScreenSize::default(), false, &mut PrimaryButton::default(), &mut rec).unwrap();
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn fist_held_three_frames_then_opened() {
        let fist = sim_hand(&SimPose { fist: true, ..pose(Handedness::Right) });
        let open = sim_hand(&pose(Handedness::Right));
        let mut src = VecSource::new(vec![
            vec![fist.clone()], vec![fist.clone()], vec![fist], vec![open],
        ]);
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();

        assert_eq!(summary, RunSummary { frames: 4, clicks: 0, drags: 1 });
        assert_eq!(rec.without_moves(), vec![Call::Down, Call::Up]);
    }

    #[test]
    fn frames_without_hands_do_not_move_cursor() {
        let open = sim_hand(&pose(Handedness::Right));
        let mut src = VecSource::new(vec![vec![open], vec![], vec![]]);
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(rec.calls.len(), 1);
    }

    #[test]
    fn held_pinch_clicks_every_frame_with_zero_cooldown() {
        let pinch = sim_hand(&SimPose { left_pinch: true, ..pose(Handedness::Right) });
        let mut src = VecSource::new(vec![vec![pinch.clone()], vec![pinch.clone()], vec![pinch]]);
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        assert_eq!(summary.clicks, 3);
        assert_eq!(rec.without_moves(), vec![Call::Click, Call::Click, Call::Click]);
    }

    #[test]
    fn left_hand_sets_volume_and_brightness_each_frame() {
        let left = sim_hand(&pose(Handedness::Left));
        let mut src = VecSource::new(vec![vec![left.clone()], vec![left]]);
        let mut rec = Recorder::default();
        run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        let analog: Vec<_> = rec.without_moves();
        assert_eq!(analog.len(), 4);
        assert_eq!(analog[0], analog[2]);
        assert_eq!(analog[1], analog[3]);
        assert!(matches!(analog[0], Call::Volume(_)));
    }

    #[test]
    fn mirror_swaps_handedness() {
        let right = sim_hand(&pose(Handedness::Right));
        let mut src = VecSource::new(vec![vec![right]]);
        let mut rec = Recorder::default();
        let cfg = AppConfig { mirror: true, ..cfg() };
        run_loop(&cfg, &mut src, &mut Headless, &mut rec).unwrap();
        assert!(rec.calls.iter().any(|c| matches!(c, Call::Volume(_))));
    }

    #[test]
    fn actuator_failure_aborts_the_loop() {
        let left = sim_hand(&pose(Handedness::Left));
        let mut src = VecSource::new(vec![vec![left.clone()], vec![left]]);
        let mut rec = Recorder { fail_on_volume: true, ..Recorder::default() };
        let err = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap_err();
        assert!(format!("{:#}", err).contains("frame 0"));
        assert_eq!(rec.calls.len(), 1);
    }

    #[test]
    fn quit_key_stops_before_next_frame() {
        let open = sim_hand(&pose(Handedness::Right));
        let mut src = VecSource::new(vec![vec![open.clone()]; 10]);
        let mut fe = QuitAfter { frames: 2, presented: 0 };
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut fe, &mut rec).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(fe.presented, 2);
        assert_eq!(src.0.len(), 8);
    }

    #[test]
    fn held_drag_is_released_on_exit() {
        let fist = sim_hand(&SimPose { fist: true, ..pose(Handedness::Right) });
        let mut src = VecSource::new(vec![vec![fist]]);
        let mut rec = Recorder::default();
        run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        assert_eq!(rec.without_moves(), vec![Call::Down, Call::Up]);
    }

    #[test]
    fn jsonl_stream_end_to_end() {
        let point = |x: f32, y: f32| serde_json::json!({ "x": x, "y": y, "z": 0.0 });
        let hand = sim_hand(&SimPose { left_pinch: true, ..pose(Handedness::Right) });
        let landmarks: Vec<_> = hand.landmarks.iter().map(|p| point(p.x, p.y)).collect();
        let line = serde_json::json!({
            "timestamp_ms": 100,
            "hands": [{ "handedness": "Right", "score": 0.95, "landmarks": landmarks }],
        });
        let text = format!("{}\n{{\"hands\": []}}\n", line);

        let mut src = JsonlSource::new(Cursor::new(text.into_bytes()), 0.7);
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        assert_eq!(summary, RunSummary { frames: 2, clicks: 1, drags: 0 });
        assert_eq!(rec.calls[0], Call::Move(100, 100));
        assert_eq!(rec.calls[1], Call::Click);
    }

    #[test]
    fn malformed_stream_is_an_error() {
        let mut src = JsonlSource::new(Cursor::new(b"{oops\n".to_vec()), 0.7);
        let mut rec = Recorder::default();
        assert!(run_loop(&cfg(), &mut src, &mut Headless, &mut rec).is_err());
    }

    fn button_calls(rec: &Recorder) -> Vec<Call> {
        rec.calls.iter().filter(|c| matches!(c, Call::Down | Call::Up)).cloned().collect()
    }

    #[test]
    fn two_fists_share_one_button() {
        let fist = |h| sim_hand(&SimPose { fist: true, ..pose(h) });
        let open = |h| sim_hand(&pose(h));
        let mut src = VecSource::new(vec![
            vec![fist(Handedness::Left), fist(Handedness::Right)],
            vec![fist(Handedness::Left), open(Handedness::Right)],
            vec![open(Handedness::Left), open(Handedness::Right)],
        ]);
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();

        assert_eq!(summary.drags, 2);
        assert_eq!(button_calls(&rec), vec![Call::Down, Call::Up]);
        // The release lands on the third frame, after the left hand opens.
        let up_at = rec.calls.iter().position(|c| *c == Call::Up).unwrap();
        let moves_before_up = rec.calls[..up_at].iter().filter(|c| matches!(c, Call::Move(..))).count();
        assert_eq!(moves_before_up, 5);
    }

    #[test]
    fn button_released_once_when_both_hands_open_together() {
        let fist = |h| sim_hand(&SimPose { fist: true, ..pose(h) });
        let open = |h| sim_hand(&pose(h));
        let mut src = VecSource::new(vec![
            vec![fist(Handedness::Right)],
            vec![fist(Handedness::Right), fist(Handedness::Left)],
            vec![open(Handedness::Right), open(Handedness::Left)],
        ]);
        let mut rec = Recorder::default();
        run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        assert_eq!(button_calls(&rec), vec![Call::Down, Call::Up]);
    }

    #[test]
    fn apply_keeps_button_while_another_hand_drags() {
        let ending = HandOutputs {
            handedness: Handedness::Right,
            cursor:     ScreenPoint::new(10.0, 10.0),
            click:      None,
            drag:       Some(DragEvent::End),
            analog:     None,
        };
        let outputs = ControlOutputs { hands: vec![ending] };
        let mut button = PrimaryButton::default();
        let mut rec = Recorder::default();
        button.press(&mut rec).unwrap();

        apply(&outputs, ScreenSize::new(100, 100), true, &mut button, &mut rec).unwrap();
        assert!(button.is_held());
        apply(&outputs, ScreenSize::new(100, 100), false, &mut button, &mut rec).unwrap();
        assert!(!button.is_held());
        assert_eq!(button_calls(&rec), vec![Call::Down, Call::Up]);
    }

    #[test]
    fn unstamped_frames_continue_from_source_time() {
        let pinch = sim_hand(&SimPose { left_pinch: true, ..pose(Handedness::Right) });
        let open = sim_hand(&pose(Handedness::Right));
        let epoch = Some(Duration::from_millis(1_700_000_000_000));
        let mut src = VecSource::stamped(vec![
            (epoch, vec![pinch.clone()]),
            (None,  vec![open]),
            (None,  vec![pinch]),
        ]);
        let mut rec = Recorder::default();
        let summary = run_loop(&cfg(), &mut src, &mut Headless, &mut rec).unwrap();
        assert_eq!(summary.clicks, 2);
    }

    #[test]
    fn frame_clock_stays_on_one_timeline() {
        let ms = Duration::from_millis;
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(Some(ms(5_000)), ms(10)), ms(5_000));
        assert_eq!(clock.tick(Some(ms(5_040)), ms(20)), ms(5_040));
        // Unstamped: advance by local time since the previous frame.
        assert_eq!(clock.tick(None, ms(50)), ms(5_070));
        // Stamped again after an unstamped frame: local time again.
        assert_eq!(clock.tick(Some(ms(9_999_999)), ms(60)), ms(5_080));
        // Stamp going backwards does not advance.
        assert_eq!(clock.tick(Some(ms(9_000_000)), ms(70)), ms(5_080));
        assert_eq!(clock.tick(Some(ms(9_000_033)), ms(80)), ms(5_113));
    }

    #[test]
    fn frame_clock_without_stamps_is_local_time() {
        let ms = Duration::from_millis;
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(None, ms(7)), ms(7));
        assert_eq!(clock.tick(None, ms(40)), ms(40));
    }

    #[test]
    fn poll_reports_end_of_stream() {
        let mut src = VecSource::new(vec![]);
        assert_eq!(poll(&mut Headless, &mut src).unwrap(), FrameOrSignal::EndOfStream);
    }

    #[test]
    fn hud_tracks_last_event_and_levels() {
        let mut engine = GestureEngine::new(GestureConfig::default(), ScreenSize::new(1000, 1000));
        let left = sim_hand(&SimPose { left_pinch: true, ..pose(Handedness::Left) });
        let out = engine.process(&[left], Duration::from_millis(10));
        let mut hud = Hud::default();
        update_hud(&mut hud, &out, &engine);
        assert_eq!(hud.last_event, "LEFT CLICK");
        assert_eq!(hud.volume, Some(50));
        assert!(hud.cursor.is_some());
    }
}
