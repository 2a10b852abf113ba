use motion_bloom::{BloomError, FrameBuffer, FrameSource};
use opencv::{
    core::{Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{debug, info};

/// A webcam, resampled to the pipeline's source size and converted to RGBA.
pub struct CameraSource {
    capture: VideoCapture,
    width: u32,
    height: u32,
    frame: Mat,
    resized: Mat,
    rgba: Mat,
}

impl CameraSource {
    pub fn open(device: i32, width: u32, height: u32) -> anyhow::Result<Self> {
        let capture = VideoCapture::new(device, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            anyhow::bail!("could not open camera {device}");
        }
        info!(device, width, height, "camera opened");
        Ok(Self {
            capture,
            width,
            height,
            frame: Mat::default(),
            resized: Mat::default(),
            rgba: Mat::default(),
        })
    }

    fn grab(&mut self) -> opencv::Result<Option<Vec<u8>>> {
        if !self.capture.read(&mut self.frame)? || self.frame.empty() {
            return Ok(None);
        }

        imgproc::resize(
            &self.frame,
            &mut self.resized,
            Size::new(self.width as i32, self.height as i32),
            0.0,
            0.0,
            imgproc::INTER_AREA,
        )?;
        imgproc::cvt_color(&self.resized, &mut self.rgba, imgproc::COLOR_BGR2RGBA, 0)?;

        Ok(Some(self.rgba.data_bytes()?.to_vec()))
    }
}

impl FrameSource for CameraSource {
    fn load_pixels(&mut self) -> Result<FrameBuffer, BloomError> {
        match self.grab().map_err(BloomError::source_failure)? {
            Some(bytes) => FrameBuffer::new(self.width, self.height, bytes),
            None => {
                debug!("camera has no frame yet");
                Ok(FrameBuffer::empty(self.width, self.height))
            }
        }
    }
}
