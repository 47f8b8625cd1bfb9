use crate::shared::class_names::ClassNameTable;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for per-frame object detection.
///
/// Implementations may hold mutable inference state, hence `&mut self`.
pub trait ObjectDetector: Send {
    /// Run inference on one frame. Boxes are in the frame's pixel space.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;

    /// Labels for the class ids this detector reports.
    fn class_names(&self) -> &ClassNameTable;
}
