//! gesture_mouse — command-line entry point.

use clap::Parser;
use gesture_mouse::app::run;
use gesture_mouse::args::{Args, SourceKind};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Gesture Mouse — hand-tracked virtual mouse          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match args.source {
        SourceKind::Sim   => println!("  Source: simulation  (mouse over the window, C/R/F to gesture)"),
        SourceKind::Jsonl => println!("  Source: JSON-lines landmarks from {}", args.input),
        SourceKind::Leap  => println!("  Source: LeapMotion hardware"),
    }
    if args.dry_run {
        println!("  Dry run: actions are logged, not performed");
    }
    println!("  Press Q or Escape in the overlay window to quit.");
    println!();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
