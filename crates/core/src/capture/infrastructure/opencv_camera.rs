use opencv::core::{Mat, CV_8UC3};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use thiserror::Error;

use crate::capture::domain::capture_source::CaptureSource;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture device {0} could not be opened")]
    NotOpened(i32),
    #[error("failed to read frame {frame} from capture device {device}")]
    ReadFailed { device: i32, frame: u64 },
    #[error("capture device {device} delivered unsupported pixel type {typ}")]
    UnsupportedFormat { device: i32, typ: i32 },
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

/// Camera capture through OpenCV's `videoio`.
///
/// Owns the device for its whole lifetime; the device is released on
/// `release` or when dropped, whichever comes first.
pub struct OpencvCamera {
    capture: VideoCapture,
    device: i32,
    buffer: Mat,
    next_index: u64,
    released: bool,
}

impl OpencvCamera {
    /// Open camera `device` and request a `width` × `height` resolution.
    ///
    /// The device may deliver a different size; frames carry whatever
    /// it actually produces.
    pub fn open(device: i32, width: u32, height: u32) -> Result<Self, CaptureError> {
        let mut capture = VideoCapture::new(device, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(CaptureError::NotOpened(device));
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, f64::from(width))?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, f64::from(height))?;
        let actual_w = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let actual_h = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        log::info!(
            "Opened capture device {device}: requested {width}x{height}, reported {actual_w}x{actual_h}"
        );

        Ok(Self {
            capture,
            device,
            buffer: Mat::default(),
            next_index: 0,
            released: false,
        })
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let index = self.next_index;
        let failed = CaptureError::ReadFailed {
            device: self.device,
            frame: index,
        };
        if self.released || !self.capture.read(&mut self.buffer)? || self.buffer.empty() {
            return Err(failed);
        }

        let typ = self.buffer.typ();
        if typ != CV_8UC3 {
            return Err(CaptureError::UnsupportedFormat {
                device: self.device,
                typ,
            });
        }

        let width = self.buffer.cols() as u32;
        let height = self.buffer.rows() as u32;
        let bgr = if self.buffer.is_continuous() {
            self.buffer.data_bytes()?.to_vec()
        } else {
            self.buffer.try_clone()?.data_bytes()?.to_vec()
        };

        self.next_index += 1;
        Ok(Frame::from_bgr(bgr, width, height, index))
    }
}

impl CaptureSource for OpencvCamera {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        Ok(self.read_frame()?)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.capture.release() {
            Ok(()) => log::debug!("Released capture device {}", self.device),
            Err(e) => log::warn!("Failed to release capture device {}: {e}", self.device),
        }
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.release();
    }
}
