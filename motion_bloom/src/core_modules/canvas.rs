// THEORY:
// The `Canvas` trait is everything the bloom pipeline asks of a drawing
// surface: its current size, a background fill, alpha-blended filled circles,
// and anchored text. Keeping it this narrow lets the pipeline run against the
// software `ImageCanvas`, a recording fake in tests, or any host surface.
//
// `ImageCanvas` rasterizes circles itself on an `image::RgbaImage`. It has no
// font engine, so text is queued as `TextOverlay`s which the host draws on top
// after converting the image for display. Since the clock is the last thing
// drawn each frame, this keeps it above every particle.

use crate::core_modules::ambient::Color;
use crate::core_modules::drawing_area::Point;
use image::{Rgba, RgbaImage};

/// Which corner of the text box sits on the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    TopRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub position: Point,
    pub anchor: TextAnchor,
    pub size: f64,
    pub color: Color,
}

pub trait Canvas {
    /// Current width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Replaces every pixel with `color`.
    fn clear(&mut self, color: Color);

    /// Source-over blends a filled circle of the given diameter.
    fn fill_circle(&mut self, center: Point, diameter: f64, color: Color);

    fn draw_text(&mut self, overlay: TextOverlay);
}

/// Software canvas backed by an RGBA image.
pub struct ImageCanvas {
    image: RgbaImage,
    overlays: Vec<TextOverlay>,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            overlays: Vec::new(),
        }
    }

    /// Reallocates the surface when the host window changed size.
    /// Returns `true` if anything changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.image.dimensions() == (width, height) {
            return false;
        }
        self.image = RgbaImage::new(width, height);
        true
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn overlays(&self) -> &[TextOverlay] {
        &self.overlays
    }

    /// Hands the queued text to the host for drawing.
    pub fn take_overlays(&mut self) -> Vec<TextOverlay> {
        std::mem::take(&mut self.overlays)
    }
}

impl Canvas for ImageCanvas {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Color) {
        let fill = color.with_alpha(255.0).to_rgba8();
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
        self.overlays.clear();
    }

    fn fill_circle(&mut self, center: Point, diameter: f64, color: Color) {
        let radius = diameter / 2.0;
        let (width, height) = self.image.dimensions();
        if radius <= 0.0 || width == 0 || height == 0 {
            return;
        }

        let src = color.to_rgba8();
        let alpha = src[3] as u16;
        if alpha == 0 {
            return;
        }

        let min_x = (center.x - radius).floor().max(0.0) as u32;
        let min_y = (center.y - radius).floor().max(0.0) as u32;
        let max_x = ((center.x + radius).ceil().max(0.0) as u32).min(width - 1);
        let max_y = ((center.y + radius).ceil().max(0.0) as u32).min(height - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let radius_sq = radius * radius;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at the pixel center.
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let dst = self.image.get_pixel_mut(x, y);
                *dst = blend(src, *dst, alpha);
            }
        }
    }

    fn draw_text(&mut self, overlay: TextOverlay) {
        self.overlays.push(overlay);
    }
}

#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

#[inline]
fn blend(src: Rgba<u8>, dst: Rgba<u8>, alpha: u16) -> Rgba<u8> {
    Rgba([
        blend_channel(src[0], dst[0], alpha),
        blend_channel(src[1], dst[1], alpha),
        blend_channel(src[2], dst[2], alpha),
        dst[3].max(src[3]),
    ])
}
