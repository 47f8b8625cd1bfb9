use crate::shared::frame::Frame;

/// An on-screen sink for annotated frames that also reports key presses.
pub trait FrameDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Wait up to `delay_ms` for a key press. `None` when no key was pressed.
    fn poll_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>>;

    /// Closes the window. Safe to call more than once.
    fn close(&mut self);
}

/// Normalize a raw key code from the window system to its low byte.
///
/// Negative codes mean no key was pressed.
pub fn key_from_raw(raw: i32) -> Option<i32> {
    if raw < 0 {
        None
    } else {
        Some(raw & 0xFF)
    }
}
