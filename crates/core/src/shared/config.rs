use std::path::PathBuf;

use super::constants::{
    DEFAULT_CAPTURE_INDEX, DEFAULT_CONFIDENCE, NMS_IOU_THRESHOLD, PERSON_CLASS_ID,
    REQUESTED_FRAME_HEIGHT, REQUESTED_FRAME_WIDTH,
};

/// Startup settings for the detection loop.
///
/// `Default` reproduces the fixed behavior: camera 0 at 1280x720,
/// bundled model name, person class only.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionConfig {
    pub capture_index: i32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Explicit weights path; `None` resolves the default model name.
    pub model_path: Option<PathBuf>,
    pub confidence: f32,
    pub iou_threshold: f32,
    pub target_class: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            capture_index: DEFAULT_CAPTURE_INDEX,
            frame_width: REQUESTED_FRAME_WIDTH,
            frame_height: REQUESTED_FRAME_HEIGHT,
            model_path: None,
            confidence: DEFAULT_CONFIDENCE,
            iou_threshold: NMS_IOU_THRESHOLD,
            target_class: PERSON_CLASS_ID,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(format!(
                "IoU threshold must be between 0.0 and 1.0, got {}",
                self.iou_threshold
            ));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(format!(
                "Frame size must be positive, got {}x{}",
                self.frame_width, self.frame_height
            ));
        }
        if self.capture_index < 0 {
            return Err(format!(
                "Capture index must be non-negative, got {}",
                self.capture_index
            ));
        }
        Ok(())
    }
}
