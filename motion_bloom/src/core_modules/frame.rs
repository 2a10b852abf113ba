// THEORY:
// A `FrameBuffer` is an owned snapshot of one downscaled camera frame: a flat,
// row-major RGBA byte vector of exactly `4 * width * height` bytes, or empty
// when the camera has not produced anything yet.
//
// Ownership is the whole point. The pipeline keeps the previous frame around
// for one tick so the detector can diff against it; because a snapshot owns its
// bytes, nothing the camera does to its own buffer afterwards can leak into the
// stored reference frame.
//
// `FrameSource` is the seam to the outside world. The viewer implements it over
// an OpenCV capture; tests and offline replays use `StillFrames`.

use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
use crate::error::BloomError;
use image::RgbaImage;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Wraps raw RGBA bytes. An empty `data` is accepted as "not ready".
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BloomError> {
        let expected = Self::expected_len(width, height);
        if !data.is_empty() && data.len() != expected {
            return Err(BloomError::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// A frame the camera has not filled yet.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: Vec::new(),
        }
    }

    pub fn expected_len(width: u32, height: u32) -> usize {
        CHANNELS * width as usize * height as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let byte_index = CHANNELS * (y as usize * self.width as usize + x as usize);
        Pixel::read(&self.data, byte_index)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl From<RgbaImage> for FrameBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// Supplies the current camera frame on demand.
pub trait FrameSource {
    /// Returns an owned snapshot of the latest frame. An empty frame means the
    /// device is not producing pixels yet; that is not an error.
    fn load_pixels(&mut self) -> Result<FrameBuffer, BloomError>;
}

/// Replays a fixed list of images, one per call, then reports "not ready".
pub struct StillFrames {
    width: u32,
    height: u32,
    frames: VecDeque<RgbaImage>,
}

impl StillFrames {
    pub fn new(width: u32, height: u32, frames: impl IntoIterator<Item = RgbaImage>) -> Self {
        Self {
            width,
            height,
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for StillFrames {
    fn load_pixels(&mut self) -> Result<FrameBuffer, BloomError> {
        match self.frames.pop_front() {
            Some(image) => FrameBuffer::new(image.width(), image.height(), image.into_raw()),
            None => Ok(FrameBuffer::empty(self.width, self.height)),
        }
    }
}
