// THEORY:
// The camera source is tiny (160x120) and the canvas is whatever size the window
// happens to be. The `DrawingArea` is the largest rectangle with the source's
// aspect ratio that fits inside the canvas, centered, with letterbox or
// pillarbox margins on the remaining axis. Motion samples are scaled into that
// rectangle so particles land where the movement appeared on camera.
//
// A `DrawingArea` is a value computed from the canvas size of the current frame.
// It is rebuilt every frame, so a window resize takes effect on the next tick
// without any invalidation logic.

use crate::core_modules::motion_detector::MotionSample;

/// A point in canvas space, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingArea {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl DrawingArea {
    pub fn fit(canvas_width: f64, canvas_height: f64, source_width: u32, source_height: u32) -> Self {
        let aspect_ratio = source_width as f64 / source_height as f64;
        let canvas_ratio = canvas_width / canvas_height;

        let (draw_width, draw_height) = if canvas_ratio > aspect_ratio {
            (canvas_height * aspect_ratio, canvas_height)
        } else {
            (canvas_width, canvas_width / aspect_ratio)
        };

        // Degenerate sizes (0x0 canvas, 0-sized source) collapse to the origin.
        let sanitize = |v: f64| if v.is_finite() { v } else { 0.0 };
        let draw_width = sanitize(draw_width);
        let draw_height = sanitize(draw_height);

        Self {
            draw_width,
            draw_height,
            offset_x: sanitize((canvas_width - draw_width) / 2.0),
            offset_y: sanitize((canvas_height - draw_height) / 2.0),
            scale_x: sanitize(draw_width / source_width as f64),
            scale_y: sanitize(draw_height / source_height as f64),
        }
    }

    pub fn map(&self, x: f64, y: f64) -> Point {
        Point::new(self.offset_x + x * self.scale_x, self.offset_y + y * self.scale_y)
    }

    pub fn map_sample(&self, sample: MotionSample) -> Point {
        self.map(sample.x as f64, sample.y as f64)
    }
}
