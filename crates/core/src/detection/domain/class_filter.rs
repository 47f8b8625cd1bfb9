use crate::shared::detection::Detection;

/// Result of narrowing a frame's detections down to one class.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterOutcome {
    /// Nothing of the target class; the frame must be left untouched.
    Empty,
    /// At least one detection, all of the target class, in detector order.
    Matched(Vec<Detection>),
}

/// Keep only detections whose class id equals `class_id`.
///
/// Each detection is checked on its own; an empty input, or one with no
/// match, yields `FilterOutcome::Empty`.
pub fn filter_class(detections: &[Detection], class_id: u32) -> FilterOutcome {
    let matched: Vec<Detection> = detections
        .iter()
        .filter(|d| d.class_id == class_id)
        .cloned()
        .collect();
    if matched.is_empty() {
        FilterOutcome::Empty
    } else {
        FilterOutcome::Matched(matched)
    }
}
