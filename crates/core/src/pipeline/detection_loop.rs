use std::time::Instant;

use crate::capture::domain::capture_source::CaptureSource;
use crate::display::domain::frame_display::FrameDisplay;
use crate::shared::constants::{ESCAPE_KEY, FPS_TEXT_COLOR, FPS_TEXT_ORIGIN, KEY_POLL_DELAY_MS};

use super::fps_counter::{fps_label, FpsCounter};
use super::frame_processor::FrameProcessor;
use super::loop_logger::LoopLogger;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What one loop iteration produced.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationReport {
    pub frame_index: u64,
    pub detections: usize,
    pub labels: Vec<String>,
    pub fps: u32,
    pub fps_label: String,
    pub key: Option<i32>,
}

/// Capture → detect → annotate → display, one frame at a time, until
/// Escape is pressed or a stage fails.
///
/// Owns the camera and the window. Both are released exactly once, and the
/// logger summary emitted once, by the first `shutdown`: on Escape, when
/// `run` hits an error, or when the loop is dropped.
pub struct DetectionLoop {
    capture: Box<dyn CaptureSource>,
    processor: FrameProcessor,
    display: Box<dyn FrameDisplay>,
    logger: Box<dyn LoopLogger>,
    fps: FpsCounter,
    state: LoopState,
}

impl DetectionLoop {
    pub fn new(
        capture: Box<dyn CaptureSource>,
        processor: FrameProcessor,
        display: Box<dyn FrameDisplay>,
        logger: Box<dyn LoopLogger>,
    ) -> Self {
        Self {
            capture,
            processor,
            display,
            logger,
            fps: FpsCounter::new(),
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run one iteration. Any capture, inference or display error is
    /// returned unchanged and leaves the loop running; the caller decides
    /// whether to stop.
    pub fn step(&mut self) -> Result<IterationReport, Box<dyn std::error::Error>> {
        if self.state == LoopState::Stopped {
            return Err("detection loop is stopped".into());
        }

        self.fps.start();

        let t = Instant::now();
        let mut frame = self.capture.read()?;
        self.logger.timing("capture", elapsed_ms(t));

        let t = Instant::now();
        let detections = self.processor.infer(&frame)?;
        self.logger.timing("inference", elapsed_ms(t));

        let t = Instant::now();
        let labels = self.processor.plot(&mut frame, &detections);
        self.logger.timing("annotate", elapsed_ms(t));

        let fps = self.fps.finish();
        let fps_text = fps_label(fps);
        self.processor
            .annotator()
            .put_text(&mut frame, &fps_text, FPS_TEXT_ORIGIN, FPS_TEXT_COLOR);

        let t = Instant::now();
        self.display.show(&frame)?;
        let key = self.display.poll_key(KEY_POLL_DELAY_MS)?;
        self.logger.timing("display", elapsed_ms(t));

        self.logger.metric("detections", detections.len() as f64);
        self.logger.metric("kept", labels.len() as f64);
        self.logger.metric("fps", f64::from(fps));
        self.logger.frame_done();

        if key == Some(ESCAPE_KEY) {
            log::info!("Escape pressed, stopping");
            self.shutdown();
        }

        Ok(IterationReport {
            frame_index: frame.index(),
            detections: detections.len(),
            labels,
            fps,
            fps_label: fps_text,
            key,
        })
    }

    /// Step until Escape is pressed. Returns the number of frames shown.
    ///
    /// A failed step shuts the loop down before the error is returned.
    pub fn run(&mut self) -> Result<u64, Box<dyn std::error::Error>> {
        let mut frames = 0;
        while self.state == LoopState::Running {
            if let Err(e) = self.step() {
                self.shutdown();
                return Err(e);
            }
            frames += 1;
        }
        Ok(frames)
    }

    /// Release the camera, close the window and emit the logger summary.
    /// Only the first call does anything.
    pub fn shutdown(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.capture.release();
        self.display.close();
        self.logger.summary();
    }
}

impl Drop for DetectionLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
