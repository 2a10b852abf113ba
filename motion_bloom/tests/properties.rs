use chrono::NaiveTime;
use image::{Rgba, RgbaImage};
use motion_bloom::core_modules::ambient::AmbientPalette;
use motion_bloom::core_modules::drawing_area::{DrawingArea, Point};
use motion_bloom::core_modules::motion_detector::{MotionDetector, MotionSample};
use motion_bloom::core_modules::particle::{Particle, ParticleParams, ParticleRandom};
use motion_bloom::core_modules::population::ParticlePopulation;
use motion_bloom::pipeline::{ImageCanvas, StillFrames};
use motion_bloom::{BloomConfig, BloomPipeline, FrameBuffer};

const W: u32 = 160;
const H: u32 = 120;

fn still(level: u8) -> RgbaImage {
    RgbaImage::from_pixel(W, H, Rgba([level, level, level, 255]))
}

fn shifted(base: &RgbaImage, x: u32, y: u32, delta: [u8; 3]) -> RgbaImage {
    let mut image = base.clone();
    let pixel = image.get_pixel_mut(x, y);
    for channel in 0..3 {
        pixel[channel] = pixel[channel].saturating_add(delta[channel]);
    }
    image
}

fn detect(current: &RgbaImage, previous: &RgbaImage, stride: u32) -> Vec<MotionSample> {
    let detector = MotionDetector::new(W, H, stride, 30);
    let current = FrameBuffer::from(current.clone());
    let previous = FrameBuffer::from(previous.clone());
    detector.detect(&current, &previous).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn threshold_is_strictly_greater_than() {
    let base = still(100);
    let at_29 = shifted(&base, 40, 40, [29, 29, 29]);
    let at_30 = shifted(&base, 40, 40, [30, 30, 30]);
    let at_31 = shifted(&base, 40, 40, [31, 31, 31]);

    assert!(detect(&at_29, &base, 2).is_empty());
    assert!(detect(&at_30, &base, 2).is_empty());
    assert_eq!(detect(&at_31, &base, 2), vec![MotionSample { x: 40, y: 40 }]);
}

#[test]
fn single_channel_change_is_averaged_over_three() {
    let base = still(100);
    assert!(detect(&shifted(&base, 10, 10, [31, 0, 0]), &base, 2).is_empty());
    // 93 / 3 = 31
    assert_eq!(detect(&shifted(&base, 10, 10, [93, 0, 0]), &base, 2).len(), 1);
}

#[test]
fn off_grid_changes_are_invisible() {
    let base = still(0);
    let mut changed = base.clone();
    for (x, y) in [(1, 0), (0, 1), (3, 3), (159, 119), (41, 40)] {
        changed.put_pixel(x, y, Rgba([255, 255, 255, 255]));
    }
    assert!(detect(&changed, &base, 2).is_empty());
    // Stride 1 sees all of them.
    assert_eq!(detect(&changed, &base, 1).len(), 5);
}

#[test]
fn square_canvas_letterboxes_a_four_by_three_source() {
    let area = DrawingArea::fit(300.0, 300.0, W, H);
    assert_close(area.draw_width, 300.0);
    assert_close(area.draw_height, 225.0);
    assert_close(area.offset_x, 0.0);
    assert_close(area.offset_y, 37.5);

    let top_left = area.map(0.0, 0.0);
    assert_close(top_left.x, 0.0);
    assert_close(top_left.y, 37.5);

    let bottom_right = area.map(160.0, 120.0);
    assert_close(bottom_right.x, 300.0);
    assert_close(bottom_right.y, 262.5);
}

#[test]
fn particle_fades_out_in_ceil_255_over_f_ticks() {
    let mut canvas = ImageCanvas::new(50, 50);
    for fade_speed in [5.0, 6.0, 7.3, 8.0] {
        let mut population = ParticlePopulation::new();
        population.push(Particle::with_params(
            Point::new(25.0, 25.0),
            ParticleParams {
                angle: 1.0,
                orbit_radius: 3.0,
                angular_speed: 0.1,
                size: 7.0,
                fade_speed,
                drift: Point::new(0.2, -0.1),
            },
        ));
        let lifetime = (255.0_f64 / fade_speed).ceil() as usize;
        for _ in 1..lifetime {
            population.advance(&mut canvas, AmbientPalette::for_fractional_hour(12.0).tint);
            assert_eq!(population.len(), 1);
        }
        let last_alpha = population.particles()[0].alpha;
        assert!(last_alpha > 0.0 && last_alpha <= fade_speed);
        population.advance(&mut canvas, AmbientPalette::for_fractional_hour(12.0).tint);
        assert!(population.is_empty(), "fade {fade_speed}");
    }
}

/// Lowest value of every range, so every particle gets the slowest fade.
struct Slowest;

impl ParticleRandom for Slowest {
    fn uniform(&mut self, min: f64, _max: f64) -> f64 {
        min
    }
}

#[test]
fn quiet_scene_drains_the_population_within_51_frames() {
    let base = still(0);
    let mut frames = vec![base.clone(), still(255)];
    frames.extend(std::iter::repeat(still(255)).take(60));
    let mut source = StillFrames::new(W, H, frames);
    let mut pipeline = BloomPipeline::with_random(BloomConfig::default(), Slowest).unwrap();
    let mut canvas = ImageCanvas::new(320, 240);
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    pipeline.render_frame(&mut source, &mut canvas, noon);
    let burst = pipeline.render_frame(&mut source, &mut canvas, noon);
    assert_eq!(burst.spawned, 80 * 60);

    let mut last = burst.live_particles;
    let mut quiet_frames = 0;
    while last > 0 {
        let report = pipeline.render_frame(&mut source, &mut canvas, noon);
        assert_eq!(report.spawned, 0);
        assert!(report.live_particles <= last);
        last = report.live_particles;
        quiet_frames += 1;
        assert!(quiet_frames <= 51);
    }
    // Spawned at fade 5: one tick on the burst frame, 50 more to die.
    assert_eq!(quiet_frames, 50);
}

#[test]
fn seeded_pipelines_are_reproducible() {
    let run = || {
        let base = still(0);
        let frames = vec![base.clone(), shifted(&base, 80, 60, [200, 200, 200]), base];
        let mut source = StillFrames::new(W, H, frames);
        let config = BloomConfig { seed: Some(2024), ..BloomConfig::default() };
        let mut pipeline = BloomPipeline::new(config).unwrap();
        let mut canvas = ImageCanvas::new(320, 240);
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        for _ in 0..3 {
            pipeline.render_frame(&mut source, &mut canvas, noon);
        }
        pipeline.population().particles().to_vec()
    };
    let first = run();
    assert_eq!(first.len(), 2);
    assert_eq!(first, run());
}

#[test]
fn stored_reference_frame_is_an_independent_copy() {
    let base = still(10);
    let mut source = StillFrames::new(W, H, vec![base.clone()]);
    let config = BloomConfig { seed: Some(5), ..BloomConfig::default() };
    let mut pipeline = BloomPipeline::new(config).unwrap();
    let mut canvas = ImageCanvas::new(160, 120);
    pipeline.render_frame(&mut source, &mut canvas, NaiveTime::from_hms_opt(8, 0, 0).unwrap());

    // The source's image is gone; mutating our own copy cannot reach the pipeline.
    let mut ours = base;
    ours.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    let stored = pipeline.previous_frame().unwrap();
    assert_eq!(&stored.as_bytes()[..4], &[10, 10, 10, 255]);
}

#[test]
fn ambient_palette_boundaries() {
    let gray = AmbientPalette::for_fractional_hour(6.0).background;
    assert_eq!(gray.to_rgba8(), Rgba([64, 64, 64, 255]));
    assert_eq!(AmbientPalette::for_fractional_hour(9.999).background, gray);
    assert_eq!(
        AmbientPalette::for_fractional_hour(10.0).background.to_rgba8(),
        Rgba([255, 250, 205, 255])
    );
    assert_eq!(
        AmbientPalette::for_fractional_hour(19.0).background.to_rgba8(),
        Rgba([255, 255, 255, 255])
    );
    assert_eq!(
        AmbientPalette::for_fractional_hour(18.25).background.to_rgba8(),
        Rgba([128, 128, 255, 255])
    );
}

#[test]
fn canvas_resize_moves_particles_into_the_new_drawing_area() {
    let base = still(0);
    let moved = shifted(&base, 0, 0, [200, 200, 200]);
    let frames = vec![base.clone(), moved.clone(), base.clone(), moved, base];
    let mut source = StillFrames::new(W, H, frames);
    let mut pipeline = BloomPipeline::with_random(BloomConfig::default(), Slowest).unwrap();
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    let mut canvas = ImageCanvas::new(300, 300);
    pipeline.render_frame(&mut source, &mut canvas, noon);
    pipeline.render_frame(&mut source, &mut canvas, noon);
    let first = pipeline.population().particles()[0].origin();
    assert_close(first.x, 0.0);
    assert_close(first.y, 37.5);

    canvas.resize(400, 300);
    pipeline.render_frame(&mut source, &mut canvas, noon);
    pipeline.render_frame(&mut source, &mut canvas, noon);
    let newest = pipeline.population().particles().last().unwrap();
    assert_close(newest.origin().x, 0.0);
    assert_close(newest.origin().y, 0.0);

    canvas.resize(600, 300);
    pipeline.render_frame(&mut source, &mut canvas, noon);
    let pillarboxed = pipeline.population().particles().last().unwrap();
    assert_close(pillarboxed.origin().x, 100.0);
    assert_close(pillarboxed.origin().y, 0.0);
}
