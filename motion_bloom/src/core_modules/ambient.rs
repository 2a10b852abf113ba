// THEORY:
// The ambient palette gives the piece a sense of the time of day. The wall
// clock is reduced to a fractional hour (`hour + minute / 60`; seconds do not
// matter) and looked up in a fixed schedule: a dark morning, a pale yellow
// midday, an olive afternoon, a blue-to-white dusk fade, and white for the
// rest of the night.
//
// Particles are never drawn in the background color itself. They use a tint:
// the background darkened to 60% with a fixed alpha, so bursts read as shadows
// of the ambient color rather than as a separate palette.

use chrono::{NaiveTime, Timelike};
use image::Rgba;

const TINT_FACTOR: f64 = 0.6;
const TINT_ALPHA: f64 = 180.0;

const MORNING: Color = Color::rgb(64.0, 64.0, 64.0);
const MIDDAY: Color = Color::rgb(255.0, 250.0, 205.0);
const AFTERNOON: Color = Color::rgb(204.0, 204.0, 0.0);
const DUSK_START: Color = Color::rgb(0.0, 0.0, 255.0);
const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);

/// RGBA color with channels in `0.0..=255.0`. Kept as floats until rasterized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 255.0)
    }

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Linear interpolation between two colors, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            red: mix(self.red, other.red),
            green: mix(self.green, other.green),
            blue: mix(self.blue, other.blue),
            alpha: mix(self.alpha, other.alpha),
        }
    }

    pub fn to_rgba8(self) -> Rgba<u8> {
        let quantize = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Rgba([
            quantize(self.red),
            quantize(self.green),
            quantize(self.blue),
            quantize(self.alpha),
        ])
    }
}

/// Background and particle tint for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientPalette {
    pub background: Color,
    pub tint: Color,
}

impl AmbientPalette {
    pub fn at(time: NaiveTime) -> Self {
        Self::for_fractional_hour(fractional_hour(time))
    }

    pub fn for_fractional_hour(current_time: f64) -> Self {
        let background = background_color(current_time);
        Self {
            background,
            tint: tint_for(background),
        }
    }
}

pub fn fractional_hour(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

pub fn background_color(current_time: f64) -> Color {
    if (6.0..10.0).contains(&current_time) {
        MORNING
    } else if (10.0..14.5).contains(&current_time) {
        MIDDAY
    } else if (14.5..17.5).contains(&current_time) {
        AFTERNOON
    } else if (17.5..19.0).contains(&current_time) {
        DUSK_START.lerp(WHITE, (current_time - 17.5) / 1.5)
    } else {
        WHITE
    }
}

pub fn tint_for(background: Color) -> Color {
    let darken = |channel: f64| (channel * TINT_FACTOR).max(0.0);
    Color::rgba(
        darken(background.red),
        darken(background.green),
        darken(background.blue),
        TINT_ALPHA,
    )
}
