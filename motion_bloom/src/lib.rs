// THEORY:
// This file is the main entry point for the `motion_bloom` library crate.
// It exposes the `BloomPipeline` and its data structures (`BloomConfig`,
// `FrameReport`) as the high-level interface, plus the `Canvas` and
// `FrameSource` seams a host implements to plug in a real window and camera.
//
// Everything that turns pixels into particles lives in `core_modules`:
// frame snapshots, the motion detector, the drawing-area mapping, particles
// and their population, the ambient palette and the clock overlay. None of it
// knows about cameras or windows; the `bloom_viewer` binary supplies those.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use core_modules::canvas::Canvas;
pub use core_modules::frame::{FrameBuffer, FrameSource};
pub use error::BloomError;
pub use pipeline::{BloomConfig, BloomPipeline, FrameReport};
