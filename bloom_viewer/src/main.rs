mod camera;
mod display;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use motion_bloom::core_modules::motion_detector::{DEFAULT_STRIDE, DEFAULT_THRESHOLD};
use motion_bloom::pipeline::{DEFAULT_SOURCE_HEIGHT, DEFAULT_SOURCE_WIDTH, ImageCanvas};
use motion_bloom::{BloomConfig, BloomPipeline};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::camera::CameraSource;
use crate::display::Display;

const WINDOW_TITLE: &str = "motion bloom";

/// Live webcam viewer: motion in front of the camera blooms into particles.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Camera device index.
    #[arg(long, default_value_t = 0)]
    camera: i32,

    /// Initial window width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Mean RGB difference a sample must exceed to count as motion.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u16,

    /// Sample every Nth pixel in each direction.
    #[arg(long, default_value_t = DEFAULT_STRIDE)]
    stride: u32,

    /// Frames to skip before the first reference frame is stored.
    #[arg(long, default_value_t = 60)]
    warmup_frames: u32,

    /// Seed for particle randomness; omit for a fresh seed each run.
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // --- 1. Logging & Argument Parsing ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    debug!(?args, "starting viewer");

    // --- 2. Camera & Window ---
    let mut camera = CameraSource::open(args.camera, DEFAULT_SOURCE_WIDTH, DEFAULT_SOURCE_HEIGHT)?;
    let mut display = Display::open(WINDOW_TITLE, args.width, args.height)
        .context("failed to open the viewer window")?;
    let mut canvas = ImageCanvas::new(args.width, args.height);

    // --- 3. Bloom Pipeline ---
    let config = BloomConfig {
        source_width: DEFAULT_SOURCE_WIDTH,
        source_height: DEFAULT_SOURCE_HEIGHT,
        threshold: args.threshold,
        stride: args.stride,
        warmup_frames: args.warmup_frames,
        seed: args.seed,
    };
    let mut pipeline = BloomPipeline::new(config)?;

    // --- 4. Frame Loop ---
    let period = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted, shutting down");
                break;
            }
            _ = ticker.tick() => {}
        }

        if let Some((width, height)) = display.viewport() {
            if canvas.resize(width, height) {
                debug!(width, height, "window resized");
            }
        }

        // --- 5. Render & Present ---
        let now = chrono::Local::now().time();
        let report = pipeline.render_frame(&mut camera, &mut canvas, now);
        if report.frame_index % 600 == 0 {
            info!(
                frame = report.frame_index,
                live = report.live_particles,
                "still blooming"
            );
        }

        if let Err(err) = display.present(&mut canvas) {
            warn!(%err, "failed to present frame");
        }

        // --- 6. Exit Conditions ---
        if !display.poll_keys()? || !display.is_open() {
            info!("window closed");
            break;
        }
    }

    info!(frames = pipeline.frames_rendered(), "viewer stopped");
    Ok(())
}
