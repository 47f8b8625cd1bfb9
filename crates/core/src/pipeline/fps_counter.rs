use std::time::{Duration, Instant};

/// Shortest iteration time used for the rate, so a very fast frame can't
/// divide by zero.
const MIN_ELAPSED_SECS: f64 = 0.01;

/// Frames-per-second from the wall-clock duration of a single iteration.
///
/// The elapsed time is rounded to hundredths of a second before taking the
/// reciprocal, and the integer part is reported.
pub fn fps_from_elapsed(elapsed: Duration) -> u32 {
    let rounded = (elapsed.as_secs_f64() * 100.0).round() / 100.0;
    (1.0 / rounded.max(MIN_ELAPSED_SECS)) as u32
}

pub fn fps_label(fps: u32) -> String {
    format!("FPS: {fps}")
}

/// Per-iteration timer: `start` when the frame is requested, `finish` once
/// it has been processed.
#[derive(Debug, Default)]
pub struct FpsCounter {
    started: Option<Instant>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Frames per second for the iteration begun by the last `start`.
    /// Returns 0 if the timer was never started.
    pub fn finish(&mut self) -> u32 {
        match self.started.take() {
            Some(started) => fps_from_elapsed(started.elapsed()),
            None => 0,
        }
    }
}
