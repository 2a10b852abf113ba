// The clock overlay: `HH:MM:SS` in black, right-aligned against the top-right
// corner of the canvas with a fixed inset.

use crate::core_modules::ambient::Color;
use crate::core_modules::canvas::{TextAnchor, TextOverlay};
use crate::core_modules::drawing_area::Point;
use chrono::{NaiveTime, Timelike};

pub const CLOCK_INSET: f64 = 20.0;
pub const CLOCK_TEXT_SIZE: f64 = 16.0;

pub fn clock_text(time: NaiveTime) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

pub fn clock_overlay(time: NaiveTime, canvas_width: u32) -> TextOverlay {
    TextOverlay {
        text: clock_text(time),
        position: Point::new(canvas_width as f64 - CLOCK_INSET, CLOCK_INSET),
        anchor: TextAnchor::TopRight,
        size: CLOCK_TEXT_SIZE,
        color: Color::BLACK,
    }
}
