// THEORY:
// The `pipeline` module is the top-level API of the bloom engine. A
// `BloomPipeline` is the single owner of every piece of state that survives
// between frames: the previous camera snapshot, the particle population, the
// random source, and a frame counter. The host calls `render_frame` once per
// display refresh and gets a `FrameReport` back; there are no globals and no
// background work.
//
// One frame, in order:
// 1.  Ambient palette from the time of day; the canvas is cleared to it.
// 2.  A snapshot is taken from the frame source.
// 3.  If the snapshot is ready and a same-sized previous frame exists, motion
//     samples are detected, mapped into the current drawing area, and each one
//     spawns a particle.
// 4.  The snapshot replaces the previous frame (once warm-up is over).
// 5.  Every particle is ticked, drawn in the tint color, and pruned if dead.
// 6.  The clock is drawn last, above everything else.

use crate::core_modules::ambient::{AmbientPalette, Color};
use crate::core_modules::canvas::Canvas;
use crate::core_modules::clock::clock_overlay;
use crate::core_modules::drawing_area::DrawingArea;
use crate::core_modules::frame::{FrameBuffer, FrameSource};
use crate::core_modules::motion_detector::{DEFAULT_STRIDE, DEFAULT_THRESHOLD, MotionDetector};
use crate::core_modules::particle::{ParticleRandom, RandomSource};
use crate::core_modules::pixel::pixel::ChannelDelta;
use crate::core_modules::population::ParticlePopulation;
use crate::error::BloomError;
use chrono::NaiveTime;
use tracing::{debug, info, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::canvas::{ImageCanvas, TextAnchor, TextOverlay};
pub use crate::core_modules::drawing_area::Point;
pub use crate::core_modules::frame::StillFrames;
pub use crate::core_modules::motion_detector::MotionSample;

pub const DEFAULT_SOURCE_WIDTH: u32 = 160;
pub const DEFAULT_SOURCE_HEIGHT: u32 = 120;

/// Configuration for the BloomPipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomConfig {
    /// Width of the downscaled camera frame in pixels.
    pub source_width: u32,
    /// Height of the downscaled camera frame in pixels.
    pub source_height: u32,
    /// Mean RGB change a sampled pixel must exceed to count as motion.
    pub threshold: ChannelDelta,
    /// Distance in pixels between sampled rows and columns.
    pub stride: u32,
    /// Ready frames to let pass before the first reference frame is kept.
    /// Cameras tend to flicker and auto-expose right after opening.
    pub warmup_frames: u32,
    /// Fixes the particle random source; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            source_width: DEFAULT_SOURCE_WIDTH,
            source_height: DEFAULT_SOURCE_HEIGHT,
            threshold: DEFAULT_THRESHOLD,
            stride: DEFAULT_STRIDE,
            warmup_frames: 0,
            seed: None,
        }
    }
}

impl BloomConfig {
    pub fn validate(&self) -> Result<(), BloomError> {
        if self.source_width == 0 || self.source_height == 0 {
            return Err(BloomError::InvalidConfig(format!(
                "source size must be non-zero, got {}x{}",
                self.source_width, self.source_height
            )));
        }
        if self.stride == 0 {
            return Err(BloomError::InvalidConfig("stride must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// What happened during one `render_frame` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub background: Color,
    pub tint: Color,
    /// `false` when the camera was not ready or there was nothing to diff against.
    pub motion_checked: bool,
    pub motion_samples: usize,
    pub spawned: usize,
    pub expired: usize,
    pub live_particles: usize,
}

/// The main, top-level struct for the bloom engine.
pub struct BloomPipeline<R: ParticleRandom = RandomSource> {
    config: BloomConfig,
    detector: MotionDetector,
    previous_frame: Option<FrameBuffer>,
    population: ParticlePopulation,
    rng: R,
    ready_frames: u64,
    frame_index: u64,
}

impl BloomPipeline<RandomSource> {
    pub fn new(config: BloomConfig) -> Result<Self, BloomError> {
        let rng = match config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Self::with_random(config, rng)
    }
}

impl<R: ParticleRandom> BloomPipeline<R> {
    pub fn with_random(config: BloomConfig, rng: R) -> Result<Self, BloomError> {
        config.validate()?;
        let detector = MotionDetector::new(
            config.source_width,
            config.source_height,
            config.stride,
            config.threshold,
        );
        info!(
            width = config.source_width,
            height = config.source_height,
            threshold = config.threshold,
            stride = config.stride,
            warmup_frames = config.warmup_frames,
            "bloom pipeline ready"
        );
        Ok(Self {
            config,
            detector,
            previous_frame: None,
            population: ParticlePopulation::new(),
            rng,
            ready_frames: 0,
            frame_index: 0,
        })
    }

    pub fn render_frame(
        &mut self,
        source: &mut dyn FrameSource,
        canvas: &mut dyn Canvas,
        time_of_day: NaiveTime,
    ) -> FrameReport {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        // Stage 1: Ambient palette
        let palette = AmbientPalette::at(time_of_day);
        canvas.clear(palette.background);

        // Stage 2: Snapshot
        let frame = self.snapshot(source);

        // Stage 3: Motion -> particles
        let (canvas_width, canvas_height) = canvas.dimensions();
        let mut motion_checked = false;
        let mut motion_samples = 0;
        let mut spawned = 0;

        if let (Some(current), Some(previous)) = (frame.as_ref(), self.previous_frame.as_ref()) {
            if current.len() == previous.len() {
                motion_checked = true;
                let area = DrawingArea::fit(
                    canvas_width as f64,
                    canvas_height as f64,
                    self.config.source_width,
                    self.config.source_height,
                );
                let points = self.detector.detect(current, previous).map(|sample| {
                    motion_samples += 1;
                    area.map_sample(sample)
                });
                spawned = self.population.spawn_at(points, &mut self.rng);
            } else {
                warn!(
                    current = current.len(),
                    previous = previous.len(),
                    "frame length changed, skipping motion this frame"
                );
            }
        }

        // Stage 4: Keep the snapshot as the next reference
        if let Some(current) = frame {
            self.ready_frames += 1;
            if self.ready_frames > self.config.warmup_frames as u64 {
                self.previous_frame = Some(current);
            }
        }

        // Stage 5: Particle lifecycle
        let expired = self.population.advance(canvas, palette.tint);

        // Stage 6: Clock on top
        canvas.draw_text(clock_overlay(time_of_day, canvas_width));

        let report = FrameReport {
            frame_index,
            background: palette.background,
            tint: palette.tint,
            motion_checked,
            motion_samples,
            spawned,
            expired,
            live_particles: self.population.len(),
        };
        debug!(
            frame = frame_index,
            samples = report.motion_samples,
            spawned = report.spawned,
            expired = report.expired,
            live = report.live_particles,
            "frame rendered"
        );
        report
    }

    /// Pulls a frame from the source. `None` means "not ready this frame".
    fn snapshot(&mut self, source: &mut dyn FrameSource) -> Option<FrameBuffer> {
        match source.load_pixels() {
            Ok(frame) if frame.is_empty() => None,
            Ok(frame) if frame.width() != self.config.source_width || frame.height() != self.config.source_height => {
                warn!(
                    width = frame.width(),
                    height = frame.height(),
                    "frame does not match the configured source size, skipping"
                );
                None
            }
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!(error = %err, "frame source failed, skipping motion this frame");
                None
            }
        }
    }

    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    pub fn population(&self) -> &ParticlePopulation {
        &self.population
    }

    pub fn previous_frame(&self) -> Option<&FrameBuffer> {
        self.previous_frame.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame_index
    }
}
