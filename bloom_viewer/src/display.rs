use motion_bloom::pipeline::{ImageCanvas, TextAnchor, TextOverlay};
use opencv::{
    core::{self, Mat, Point, Scalar},
    highgui, imgproc,
    prelude::*,
};

const KEY_ESCAPE: i32 = 27;
/// OpenCV's Hershey fonts are sized by scale, not pixels; 0.5 is ~16px tall.
const FONT_SCALE_PER_PX: f64 = 0.5 / 16.0;

/// A resizable HighGUI window that shows an `ImageCanvas` plus its text.
pub struct Display {
    title: String,
    rgba: Mat,
    bgr: Mat,
}

impl Display {
    pub fn open(title: &str, width: u32, height: u32) -> opencv::Result<Self> {
        highgui::named_window(title, highgui::WINDOW_NORMAL)?;
        highgui::resize_window(title, width as i32, height as i32)?;
        Ok(Self {
            title: title.to_string(),
            rgba: Mat::default(),
            bgr: Mat::default(),
        })
    }

    /// Current drawable size of the window, if the backend can report it.
    pub fn viewport(&self) -> Option<(u32, u32)> {
        let rect = highgui::get_window_image_rect(&self.title).ok()?;
        (rect.width > 0 && rect.height > 0).then(|| (rect.width as u32, rect.height as u32))
    }

    pub fn is_open(&self) -> bool {
        highgui::get_window_property(&self.title, highgui::WND_PROP_VISIBLE)
            .map(|visible| visible >= 1.0)
            .unwrap_or(false)
    }

    pub fn present(&mut self, canvas: &mut ImageCanvas) -> opencv::Result<()> {
        let (width, height) = canvas.image().dimensions();
        if width == 0 || height == 0 {
            return Ok(());
        }

        if self.rgba.rows() != height as i32 || self.rgba.cols() != width as i32 {
            self.rgba = Mat::new_rows_cols_with_default(
                height as i32,
                width as i32,
                core::CV_8UC4,
                Scalar::all(0.0),
            )?;
        }
        self.rgba.data_bytes_mut()?.copy_from_slice(canvas.image().as_raw());
        imgproc::cvt_color(&self.rgba, &mut self.bgr, imgproc::COLOR_RGBA2BGR, 0)?;

        for overlay in canvas.take_overlays() {
            draw_overlay(&mut self.bgr, &overlay)?;
        }

        highgui::imshow(&self.title, &self.bgr)
    }

    /// Pumps window events; returns `false` once the user asked to quit.
    pub fn poll_keys(&self) -> opencv::Result<bool> {
        let key = highgui::wait_key(1)?;
        Ok(!(key == KEY_ESCAPE || key == 'q' as i32))
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        let _ = highgui::destroy_window(&self.title);
    }
}

fn draw_overlay(image: &mut Mat, overlay: &TextOverlay) -> opencv::Result<()> {
    let font = imgproc::FONT_HERSHEY_SIMPLEX;
    let scale = overlay.size * FONT_SCALE_PER_PX;
    let thickness = 1;
    let mut baseline = 0;
    let size = imgproc::get_text_size(&overlay.text, font, scale, thickness, &mut baseline)?;

    // put_text anchors at the bottom-left of the glyphs.
    let top = overlay.position.y.round() as i32;
    let left = match overlay.anchor {
        TextAnchor::TopLeft => overlay.position.x.round() as i32,
        TextAnchor::TopRight => overlay.position.x.round() as i32 - size.width,
    };
    let color = Scalar::new(overlay.color.blue, overlay.color.green, overlay.color.red, 0.0);

    imgproc::put_text(
        image,
        &overlay.text,
        Point::new(left, top + size.height),
        font,
        scale,
        color,
        thickness,
        imgproc::LINE_AA,
        false,
    )
}
