//! GazeView session inspector - Main entry point
//!
//! Loads a recorded-session directory, builds the canonical model, and
//! reports what the viewer would see: stream sizes, the state active at a
//! given playback time, and optionally a simulated quick-preview run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gazeview_core::preview::{PreviewCommand, QuickPreviewController};
use gazeview_core::time::format_clock;
use gazeview_core::ViewerConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod loader;

/// Command-line arguments for gazeview
#[derive(Parser, Debug)]
#[command(name = "gazeview")]
#[command(about = "Inspect a recorded session's annotation and gaze streams")]
#[command(version)]
struct Args {
    /// Session directory holding the CSV/SRT/NPY sources
    session_dir: PathBuf,

    /// Viewer configuration TOML
    #[arg(short, long, env = "GAZEVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Media duration in seconds, when known (enables end clamping)
    #[arg(short, long, default_value_t = 0.0)]
    duration: f64,

    /// Report the active state at this playback time (seconds)
    #[arg(long)]
    at: Option<f64>,

    /// Simulate a quick-preview run over the session's preview segments
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazeview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = ViewerConfig::resolve(args.config.as_deref())
        .context("Failed to load viewer configuration")?;
    info!("Loading session from {}", args.session_dir.display());

    let model = loader::load_session(&args.session_dir, config, args.duration)
        .context("Failed to load session")?;

    println!("session: {}", args.session_dir.display());
    if model.duration > 0.0 {
        println!("duration: {}", format_clock(model.duration));
    }
    println!("cues: {}", model.cues.len());
    println!("annotations: {}", model.annotations.len());
    println!("mode segments: {}", model.mode_segments.len());
    println!("category segments: {}", model.category_segments.len());
    println!("phases: {}", model.phases.len());
    println!("standing segments: {}", model.standing.len());
    println!("preview segments: {}", model.preview_segments.len());
    println!(
        "gaze: {} points ({})",
        model.gaze.len(),
        if model.gaze.normalized {
            "normalized"
        } else {
            "pixel"
        }
    );

    if let Some(t) = args.at {
        let active = model.tick(t);
        println!();
        println!("at {}:", format_clock(t));
        match active.cue {
            Some(idx) => println!("  cue: {:?}", model.cues[idx].text),
            None => println!("  cue: none"),
        }
        match active.phase {
            Some(idx) => println!("  phase: {}", model.phases[idx].label),
            None => println!("  phase: none"),
        }
        match active.mode_segment {
            Some(idx) => println!("  mode: {}", model.mode_segments[idx].label),
            None => println!("  mode: none"),
        }
        match active.standing {
            Some(idx) => println!(
                "  standing: {}",
                model.standing[idx].label.as_deref().unwrap_or("(unlabeled)")
            ),
            None => println!("  standing: none"),
        }
        match active.gaze_point {
            Some([x, y]) => println!("  gaze: ({:.3}, {:.3})", x, y),
            None => println!("  gaze: none"),
        }
    }

    if args.preview {
        println!();
        simulate_preview(&model);
    }

    Ok(())
}

/// Drive a quick-preview run against a simulated clock and print the jumps.
fn simulate_preview(model: &gazeview_core::SessionModel) {
    let mut controller =
        QuickPreviewController::new(model.preview_segments.clone(), &model.config);
    let commands = controller.start();
    if commands.is_empty() {
        println!("preview: no segments");
        return;
    }

    let mut clock = 0.0f64;
    let mut rate = 1.0f64;
    let mut running = true;
    let apply = |commands: &[PreviewCommand], clock: &mut f64, rate: &mut f64, running: &mut bool| {
        for command in commands {
            match command {
                PreviewCommand::Seek(t) => {
                    println!("preview: seek {}", format_clock(*t));
                    *clock = *t;
                }
                PreviewCommand::SetRate(r) => *rate = *r,
                PreviewCommand::Pause => *running = false,
            }
        }
    };
    apply(&commands, &mut clock, &mut rate, &mut running);

    // Coarse ticks, like a 4 Hz timeupdate stream at the preview rate
    while running {
        clock += 0.25 * rate;
        let commands = controller.on_tick(clock);
        apply(&commands, &mut clock, &mut rate, &mut running);
    }
    println!("preview: finished at {}", format_clock(clock));
}
