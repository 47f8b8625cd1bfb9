use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;
use thiserror::Error;

use crate::display::domain::frame_display::{key_from_raw, FrameDisplay};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("window '{0}' is closed")]
    Closed(String),
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

/// A single OpenCV `highgui` window.
///
/// Keeps one BGR buffer that is reused while the frame size stays the same.
/// The window is destroyed on `close` or when dropped.
pub struct HighguiWindow {
    title: String,
    buffer: Mat,
    closed: bool,
}

impl HighguiWindow {
    pub fn open(title: &str) -> Result<Self, DisplayError> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        log::debug!("Opened window '{title}'");
        Ok(Self {
            title: title.to_string(),
            buffer: Mat::default(),
            closed: false,
        })
    }

    fn show_frame(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed(self.title.clone()));
        }

        let rows = frame.height() as i32;
        let cols = frame.width() as i32;
        if self.buffer.rows() != rows || self.buffer.cols() != cols {
            self.buffer = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))?;
        }
        frame.write_bgr(self.buffer.data_bytes_mut()?);
        highgui::imshow(&self.title, &self.buffer)?;
        Ok(())
    }
}

impl FrameDisplay for HighguiWindow {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.show_frame(frame)?)
    }

    fn poll_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
        let raw = highgui::wait_key(delay_ms)?;
        Ok(key_from_raw(raw))
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match highgui::destroy_window(&self.title) {
            Ok(()) => log::debug!("Closed window '{}'", self.title),
            Err(e) => log::warn!("Failed to close window '{}': {e}", self.title),
        }
    }
}

impl Drop for HighguiWindow {
    fn drop(&mut self) {
        self.close();
    }
}
