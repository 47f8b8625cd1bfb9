use crate::shared::class_names::ClassNameTable;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for drawing detections and overlay text onto a frame.
///
/// Implementations modify the frame in place and never fail: boxes outside
/// the frame are clipped.
pub trait FrameAnnotator: Send {
    /// Draw one box and one label per detection, returning the labels in
    /// detection order.
    fn annotate(
        &self,
        frame: &mut Frame,
        detections: &[Detection],
        class_names: &ClassNameTable,
    ) -> Vec<String>;

    /// Draw `text` with its baseline starting at `origin`.
    fn put_text(&self, frame: &mut Frame, text: &str, origin: (i32, i32), color: [u8; 3]);
}
