mod window;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use plexus::{AnimatorConfig, AnimatorError, FrameStatus, ParticleFieldAnimator, Preset, RasterSurface};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

/// Animated neural-network background.
#[derive(Parser, Debug)]
#[command(name = "plexus", version, about)]
struct Args {
    /// Built-in preset (crimson, slate, midnight).
    #[arg(long, default_value_t = Preset::Crimson)]
    preset: Preset,

    /// JSON config file; overrides --preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for reproducible particle placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the particle count.
    #[arg(long)]
    particles: Option<usize>,

    /// Render headlessly and write the last frame to this PNG.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to simulate in snapshot mode.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Snapshot width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Snapshot height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "plexus failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AnimatorConfig::load(path)?,
        None => args.preset.config(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(count) = args.particles {
        config.particle_count = count;
    }

    if let Some(path) = &args.snapshot {
        snapshot(config, args.width, args.height, args.frames, path)?;
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    // Frames are driven by explicit redraw requests.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = window::App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn snapshot(
    config: AnimatorConfig,
    width: u32,
    height: u32,
    frames: u32,
    path: &Path,
) -> Result<(), AnimatorError> {
    let mut animator = ParticleFieldAnimator::start(RasterSurface::new(width, height), config)?;
    for _ in 0..frames {
        if animator.frame()? == FrameStatus::Stopped {
            break;
        }
    }

    if let Some(ctx) = animator.context() {
        ctx.save_png(path)?;
    }
    info!(path = %path.display(), frames = animator.frames_rendered(), "snapshot written");

    animator.stop();
    Ok(())
}
