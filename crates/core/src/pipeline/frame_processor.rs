use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::class_filter::{filter_class, FilterOutcome};
use crate::detection::domain::object_detector::ObjectDetector;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Per-frame inference, class filtering and annotation.
pub struct FrameProcessor {
    detector: Box<dyn ObjectDetector>,
    annotator: Box<dyn FrameAnnotator>,
    target_class: u32,
}

impl FrameProcessor {
    pub fn new(
        detector: Box<dyn ObjectDetector>,
        annotator: Box<dyn FrameAnnotator>,
        target_class: u32,
    ) -> Self {
        Self {
            detector,
            annotator,
            target_class,
        }
    }

    /// Run the detector on `frame`. Inference failures are returned as-is.
    pub fn infer(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        self.detector.detect(frame)
    }

    /// Draw the target-class detections onto `frame`.
    ///
    /// Returns the labels drawn. With no target-class detection the frame
    /// is left exactly as it was.
    pub fn plot(&self, frame: &mut Frame, detections: &[Detection]) -> Vec<String> {
        match filter_class(detections, self.target_class) {
            FilterOutcome::Empty => Vec::new(),
            FilterOutcome::Matched(kept) => {
                self.annotator
                    .annotate(frame, &kept, self.detector.class_names())
            }
        }
    }

    /// `infer` followed by `plot`.
    pub fn process(&mut self, frame: &mut Frame) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let detections = self.infer(frame)?;
        Ok(self.plot(frame, &detections))
    }

    pub fn annotator(&self) -> &dyn FrameAnnotator {
        self.annotator.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::infrastructure::box_annotator::BoxAnnotator;
    use crate::shared::class_names::ClassNameTable;
    use crate::shared::detection::BoundingBox;

    struct StubDetector {
        detections: Vec<Detection>,
        names: ClassNameTable,
    }

    impl StubDetector {
        fn boxed(detections: Vec<Detection>) -> Box<dyn ObjectDetector> {
            Box::new(Self {
                detections,
                names: ClassNameTable::coco(),
            })
        }
    }

    impl ObjectDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(self.detections.clone())
        }

        fn class_names(&self) -> &ClassNameTable {
            &self.names
        }
    }

    struct FailingDetector {
        names: ClassNameTable,
    }

    impl ObjectDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }

        fn class_names(&self) -> &ClassNameTable {
            &self.names
        }
    }

    fn processor(detections: Vec<Detection>) -> FrameProcessor {
        FrameProcessor::new(
            StubDetector::boxed(detections),
            Box::new(BoxAnnotator::default()),
            0,
        )
    }

    fn det(class_id: u32, confidence: f32, x1: f32, y1: f32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x1 + 80.0, y1 + 120.0), confidence, class_id)
    }

    fn frame() -> Frame {
        Frame::filled(640, 480, [40, 40, 40], 0)
    }

    #[test]
    fn test_person_detections_change_frame_and_label_each() {
        let mut p = processor(vec![det(0, 0.8734, 100.0, 100.0), det(0, 0.61, 300.0, 200.0)]);
        let mut f = frame();
        let labels = p.process(&mut f).unwrap();

        assert_ne!(f, frame());
        assert_eq!(labels, vec!["person 0.87", "person 0.61"]);
    }

    #[test]
    fn test_only_target_class_is_labelled() {
        let mut p = processor(vec![det(2, 0.95, 10.0, 60.0), det(0, 0.5, 300.0, 200.0)]);
        let mut f = frame();
        let labels = p.process(&mut f).unwrap();
        assert_eq!(labels, vec!["person 0.50"]);
    }

    #[test]
    fn test_no_person_leaves_frame_identical() {
        let mut p = processor(vec![det(2, 0.95, 10.0, 60.0), det(16, 0.7, 300.0, 200.0)]);
        let mut f = frame();
        let labels = p.process(&mut f).unwrap();
        assert!(labels.is_empty());
        assert_eq!(f, frame());
    }

    #[test]
    fn test_empty_detections_leave_frame_identical() {
        let mut p = processor(Vec::new());
        let mut f = frame();
        assert!(p.process(&mut f).unwrap().is_empty());
        assert_eq!(f, frame());
    }

    #[test]
    fn test_replotting_annotated_frame_with_nothing_is_idempotent() {
        let mut p = processor(vec![det(0, 0.9, 100.0, 100.0)]);
        let mut f = frame();
        p.process(&mut f).unwrap();
        let annotated = f.clone();

        let labels = p.plot(&mut f, &[]);
        assert!(labels.is_empty());
        assert_eq!(f, annotated);
        p.plot(&mut f, &[]);
        assert_eq!(f, annotated);
    }

    #[test]
    fn test_other_target_class() {
        let p = FrameProcessor::new(
            StubDetector::boxed(Vec::new()),
            Box::new(BoxAnnotator::default()),
            2,
        );
        let mut f = frame();
        let labels = p.plot(&mut f, &[det(0, 0.9, 10.0, 60.0), det(2, 0.4, 300.0, 200.0)]);
        assert_eq!(labels, vec!["car 0.40"]);
    }

    #[test]
    fn test_inference_error_propagates_and_frame_untouched() {
        let mut p = FrameProcessor::new(
            Box::new(FailingDetector {
                names: ClassNameTable::coco(),
            }),
            Box::new(BoxAnnotator::default()),
            0,
        );
        let mut f = frame();
        let err = p.process(&mut f).unwrap_err();
        assert_eq!(err.to_string(), "inference failed");
        assert_eq!(f, frame());
    }
}
