// THEORY:
// The `MotionDetector` is the temporal front end of the bloom pipeline. It does
// not learn, track, or remember anything; it compares exactly two snapshots,
// the current frame and the one before it, on a sparse grid.
//
// Key architectural principles:
// 1.  **Sparse Sampling**: Only every `stride`-th column of every `stride`-th
//     row is inspected. On a 160x120 source with stride 2 that is 4,800 pixel
//     comparisons per frame, cheap enough to run on every display refresh.
// 2.  **Laziness**: `detect` returns an iterator. Samples are produced while the
//     caller consumes them, so spawning particles never needs an intermediate
//     allocation.
// 3.  **Deterministic Order**: Samples come out row by row, top to bottom, and
//     left to right within a row.
//
// The caller is responsible for only running the detector when both frames
// exist and share a length; out-of-range reads are skipped rather than trusted.

use crate::core_modules::frame::FrameBuffer;
use crate::core_modules::pixel::pixel::{CHANNELS, ChannelDelta, Pixel};

pub const DEFAULT_THRESHOLD: ChannelDelta = 30;
pub const DEFAULT_STRIDE: u32 = 2;

/// A source-space coordinate whose pixel changed by more than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSample {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone)]
pub struct MotionDetector {
    width: u32,
    height: u32,
    stride: u32,
    threshold: ChannelDelta,
}

impl MotionDetector {
    /// `stride` values below 1 are raised to 1.
    pub fn new(width: u32, height: u32, stride: u32, threshold: ChannelDelta) -> Self {
        Self {
            width,
            height,
            stride: stride.max(1),
            threshold,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn threshold(&self) -> ChannelDelta {
        self.threshold
    }

    pub fn detect<'a>(&self, current: &'a FrameBuffer, previous: &'a FrameBuffer) -> MotionSamples<'a> {
        self.detect_bytes(current.as_bytes(), previous.as_bytes())
    }

    pub fn detect_bytes<'a>(&self, current: &'a [u8], previous: &'a [u8]) -> MotionSamples<'a> {
        MotionSamples {
            current,
            previous,
            width: self.width,
            height: self.height,
            stride: self.stride,
            threshold: self.threshold,
            x: 0,
            y: 0,
        }
    }
}

/// Lazy, single-pass iterator over the motion samples of one frame pair.
pub struct MotionSamples<'a> {
    current: &'a [u8],
    previous: &'a [u8],
    width: u32,
    height: u32,
    stride: u32,
    threshold: ChannelDelta,
    x: u32,
    y: u32,
}

impl MotionSamples<'_> {
    fn advance(&mut self) {
        self.x += self.stride;
        if self.x >= self.width {
            self.x = 0;
            self.y += self.stride;
        }
    }
}

impl Iterator for MotionSamples<'_> {
    type Item = MotionSample;

    fn next(&mut self) -> Option<MotionSample> {
        if self.width == 0 {
            return None;
        }

        while self.y < self.height {
            let (x, y) = (self.x, self.y);
            self.advance();

            let byte_index = CHANNELS * (y as usize * self.width as usize + x as usize);
            let (Some(now), Some(before)) = (
                Pixel::read(self.current, byte_index),
                Pixel::read(self.previous, byte_index),
            ) else {
                continue;
            };

            if now.average_rgb_difference(&before) > self.threshold {
                return Some(MotionSample { x, y });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 8;
    const H: u32 = 6;

    fn blank() -> Vec<u8> {
        let mut buffer = vec![0u8; FrameBuffer::expected_len(W, H)];
        for alpha in buffer.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        buffer
    }

    fn shift_rgb(buffer: &mut [u8], x: u32, y: u32, delta: u8) {
        let i = 4 * (y * W + x) as usize;
        for channel in &mut buffer[i..i + 3] {
            *channel = channel.saturating_add(delta);
        }
    }

    #[test]
    fn identical_frames_yield_nothing() {
        let detector = MotionDetector::new(W, H, 1, DEFAULT_THRESHOLD);
        let frame = blank();
        assert_eq!(detector.detect_bytes(&frame, &frame).count(), 0);
    }

    #[test]
    fn samples_come_out_row_major() {
        let detector = MotionDetector::new(W, H, 2, DEFAULT_THRESHOLD);
        let previous = blank();
        let mut current = blank();
        shift_rgb(&mut current, 6, 0, 100);
        shift_rgb(&mut current, 0, 4, 100);
        shift_rgb(&mut current, 2, 0, 100);
        shift_rgb(&mut current, 4, 2, 100);

        let samples: Vec<_> = detector.detect_bytes(&current, &previous).collect();
        assert_eq!(
            samples,
            vec![
                MotionSample { x: 2, y: 0 },
                MotionSample { x: 6, y: 0 },
                MotionSample { x: 4, y: 2 },
                MotionSample { x: 0, y: 4 },
            ]
        );
    }

    #[test]
    fn alpha_changes_are_not_motion() {
        let detector = MotionDetector::new(W, H, 1, DEFAULT_THRESHOLD);
        let previous = blank();
        let mut current = blank();
        current[3] = 0;
        assert_eq!(detector.detect_bytes(&current, &previous).count(), 0);
    }

    #[test]
    fn short_previous_frame_is_skipped_not_read() {
        let detector = MotionDetector::new(W, H, 1, DEFAULT_THRESHOLD);
        let mut current = blank();
        shift_rgb(&mut current, 7, 5, 200);
        shift_rgb(&mut current, 0, 0, 200);
        let previous = vec![0u8; 8];
        let samples: Vec<_> = detector.detect_bytes(&current, &previous).collect();
        assert_eq!(samples, vec![MotionSample { x: 0, y: 0 }]);
    }

    #[test]
    fn zero_stride_is_treated_as_one() {
        let detector = MotionDetector::new(W, H, 0, DEFAULT_THRESHOLD);
        assert_eq!(detector.stride(), 1);
    }
}
