use crate::shared::frame::Frame;

/// A live source of frames, read one at a time.
///
/// `read` blocks until a frame is available. A failed read is not retried.
pub trait CaptureSource {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Releases the underlying device. Safe to call more than once.
    fn release(&mut self);
}
