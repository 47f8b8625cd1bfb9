//! YOLOv8 object detector using ONNX Runtime via `ort`.
//!
//! Handles letterbox preprocessing, inference, anchor decoding and per-class
//! NMS, then translates the raw tensor into `Detection` records.

use std::path::Path;

use crate::detection::domain::object_detector::ObjectDetector;
use crate::shared::class_names::ClassNameTable;
use crate::shared::detection::{BoundingBox, Detection};
use crate::shared::frame::Frame;

use super::execution_provider::select_execution_device;

/// Fallback model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Ultralytics pads letterboxed input with this gray level.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Box coordinates precede the class scores in every prediction row.
const BOX_FEATURES: usize = 4;

/// Metadata key Ultralytics exports use for the class table.
const NAMES_METADATA_KEY: &str = "names";

/// YOLOv8 detector backed by an ONNX Runtime session.
pub struct OnnxYoloDetector {
    session: ort::session::Session,
    class_names: ClassNameTable,
    confidence: f32,
    iou_threshold: f32,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLOv8 ONNX model on the preferred execution device.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(
        model_path: &Path,
        confidence: f32,
        iou_threshold: f32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let device = select_execution_device();
        log::info!("Using device: {}", device.name);

        let session = ort::session::Session::builder()?
            .with_execution_providers(device.providers)?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        let class_names = read_class_names(&session);
        log::info!(
            "Loaded {} ({} classes, input {input_size}x{input_size})",
            model_path.display(),
            class_names.len()
        );

        Ok(Self {
            session,
            class_names,
            confidence,
            iou_threshold,
            input_size,
        })
    }
}

impl ObjectDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let (input_tensor, letterbox) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let candidates = decode_predictions(data, &shape, self.confidence, &letterbox)?;
        let kept = non_max_suppression(candidates, self.iou_threshold);
        log::trace!("Frame {}: {} detections after NMS", frame.index(), kept.len());

        Ok(kept
            .into_iter()
            .map(|d| Detection {
                bbox: d.bbox.clamped(frame.width(), frame.height()),
                ..d
            })
            .collect())
    }

    fn class_names(&self) -> &ClassNameTable {
        &self.class_names
    }
}

fn read_class_names(session: &ort::session::Session) -> ClassNameTable {
    let raw = session
        .metadata()
        .ok()
        .and_then(|metadata| metadata.custom(NAMES_METADATA_KEY));

    match raw.as_deref().map(ClassNameTable::parse_metadata) {
        Some(Ok(table)) => table,
        Some(Err(e)) => {
            log::warn!("Ignoring malformed class names in model metadata: {e}");
            ClassNameTable::coco()
        }
        None => {
            log::warn!("Model metadata has no class names, using COCO labels");
            ClassNameTable::coco()
        }
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Mapping between letterboxed model space and frame space.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    scale: f32,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    fn to_frame(self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.pad_x as f32) / self.scale,
            (y - self.pad_y as f32) / self.scale,
        )
    }
}

/// Letterbox-resize a frame to `target_size` × `target_size`.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f32;
    let fh = frame.height() as f32;
    let target = target_size as f32;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let mut tensor = ndarray::Array4::<f32>::from_elem(
        (1, 3, target_size as usize, target_size as usize),
        PAD_VALUE,
    );

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f32 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f32 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode raw YOLOv8 output into frame-space candidates.
///
/// The output is feature-major `[1, 4 + classes, anchors]` as exported, or
/// anchor-major `[1, anchors, 4 + classes]` when transposed. Each anchor
/// keeps its best-scoring class if that score reaches `confidence`.
fn decode_predictions(
    data: &[f32],
    shape: &[usize],
    confidence: f32,
    letterbox: &Letterbox,
) -> Result<Vec<Detection>, String> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}"));
    }
    let feature_major = shape[1] < shape[2];
    let (num_anchors, num_feats) = if feature_major {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats <= BOX_FEATURES {
        return Err(format!("YOLO output has no class scores: {shape:?}"));
    }
    if data.len() < num_anchors * num_feats {
        return Err(format!(
            "YOLO output holds {} values, shape {shape:?} needs {}",
            data.len(),
            num_anchors * num_feats
        ));
    }

    let at = |anchor: usize, feat: usize| {
        if feature_major {
            data[feat * num_anchors + anchor]
        } else {
            data[anchor * num_feats + feat]
        }
    };

    let mut candidates = Vec::new();
    for anchor in 0..num_anchors {
        let (class_id, score) = (BOX_FEATURES..num_feats)
            .map(|f| ((f - BOX_FEATURES) as u32, at(anchor, f)))
            .fold((0u32, f32::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            });
        if score < confidence {
            continue;
        }

        let model_box = BoundingBox::from_center(
            at(anchor, 0),
            at(anchor, 1),
            at(anchor, 2),
            at(anchor, 3),
        );
        let (x_min, y_min) = letterbox.to_frame(model_box.x_min, model_box.y_min);
        let (x_max, y_max) = letterbox.to_frame(model_box.x_max, model_box.y_max);

        candidates.push(Detection::new(
            BoundingBox::new(x_min, y_min, x_max, y_max),
            score,
            class_id,
        ));
    }
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

/// Greedy per-class NMS: sort by confidence descending, suppress overlapping
/// boxes of the same class.
fn non_max_suppression(mut dets: Vec<Detection>, iou_thresh: f32) -> Vec<Detection> {
    dets.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Detection> = Vec::new();
    for det in dets {
        let suppressed = keep
            .iter()
            .any(|k| k.class_id == det.class_id && k.bbox.iou(&det.bbox) > iou_thresh);
        if !suppressed {
            keep.push(det);
        }
    }
    keep
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: Letterbox = Letterbox {
        scale: 1.0,
        pad_x: 0,
        pad_y: 0,
    };

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: u32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), confidence, class_id)
    }

    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        // 1280x720 → 640: scale 0.5, new 640x360, pad_y 140
        let frame = Frame::filled(1280, 720, [128, 128, 128], 0);
        let (tensor, lb) = letterbox(&frame, 640);

        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert_relative_eq!(lb.scale, 0.5);
        assert_eq!(lb.pad_x, 0);
        assert_eq!(lb.pad_y, 140);
    }

    #[test]
    fn test_letterbox_values_normalized() {
        let frame = Frame::filled(100, 50, [255, 255, 255], 0);
        let (tensor, lb) = letterbox(&frame, 640);

        let y = lb.pad_y as usize + 1;
        let x = lb.pad_x as usize + 1;
        assert_relative_eq!(tensor[[0, 0, y, x]], 1.0);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], PAD_VALUE);
    }

    #[test]
    fn test_letterbox_maps_back_to_frame() {
        let lb = Letterbox {
            scale: 0.5,
            pad_x: 0,
            pad_y: 140,
        };
        let (x, y) = lb.to_frame(50.0, 145.0);
        assert_relative_eq!(x, 100.0);
        assert_relative_eq!(y, 10.0);
    }

    #[test]
    fn test_decode_feature_major_layout() {
        // [1, 4 + 1 class, 6 anchors]; feature-major as exported
        #[rustfmt::skip]
        let data = vec![
            50.0, 300.0, 0.0, 0.0, 0.0, 0.0, // cx
            60.0, 300.0, 0.0, 0.0, 0.0, 0.0, // cy
            20.0, 10.0,  0.0, 0.0, 0.0, 0.0, // w
            40.0, 10.0,  0.0, 0.0, 0.0, 0.0, // h
            0.9,  0.1,   0.0, 0.0, 0.0, 0.0, // class 0
        ];
        let dets = decode_predictions(&data, &[1, 5, 6], 0.25, &IDENTITY).unwrap();
        assert_eq!(dets, vec![det(40.0, 40.0, 60.0, 80.0, 0.9, 0)]);
    }

    #[test]
    fn test_decode_anchor_major_layout_picks_best_class() {
        // [1, 6 anchors, 4 + 2 classes]
        #[rustfmt::skip]
        let data = vec![
            10.0, 10.0, 4.0, 4.0, 0.1, 0.8,
            20.0, 20.0, 4.0, 4.0, 0.0, 0.0,
            30.0, 30.0, 4.0, 4.0, 0.6, 0.3,
            0.0,  0.0,  0.0, 0.0, 0.0, 0.0,
            0.0,  0.0,  0.0, 0.0, 0.0, 0.0,
            0.0,  0.0,  0.0, 0.0, 0.0, 0.0,
        ];
        let dets = decode_predictions(&data, &[1, 6, 6], 0.25, &IDENTITY).unwrap();
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].class_id, 1);
        assert_relative_eq!(dets[0].confidence, 0.8);
        assert_eq!(dets[1].class_id, 0);
        assert_relative_eq!(dets[1].confidence, 0.6);
    }

    #[test]
    fn test_decode_rejects_bad_shape() {
        // not rank 3
        assert!(decode_predictions(&[0.0; 4], &[4], 0.25, &IDENTITY).is_err());
        // box coordinates only
        assert!(decode_predictions(&[0.0; 8], &[1, 4, 2], 0.25, &IDENTITY).is_err());
        // fewer values than the shape claims
        assert!(decode_predictions(&[0.0; 5], &[1, 6, 6], 0.25, &IDENTITY).is_err());
    }

    #[test]
    fn test_decode_empty_when_below_threshold() {
        let mut data = vec![0.0; 30];
        data[0..5].copy_from_slice(&[10.0, 10.0, 4.0, 4.0, 0.1]);
        let dets = decode_predictions(&data, &[1, 6, 5], 0.25, &IDENTITY).unwrap();
        assert!(dets.is_empty());
    }

    #[test]
    fn test_nms_suppresses_overlapping_same_class() {
        let dets = vec![
            det(0.0, 0.0, 100.0, 100.0, 0.8, 0),
            det(5.0, 5.0, 105.0, 105.0, 0.9, 0),
        ];
        let kept = non_max_suppression(dets, 0.5);
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn test_nms_keeps_overlapping_different_classes() {
        let dets = vec![
            det(0.0, 0.0, 100.0, 100.0, 0.9, 0),
            det(5.0, 5.0, 105.0, 105.0, 0.8, 1),
        ];
        assert_eq!(non_max_suppression(dets, 0.5).len(), 2);
    }

    #[test]
    fn test_nms_keeps_non_overlapping() {
        let dets = vec![
            det(0.0, 0.0, 50.0, 50.0, 0.9, 0),
            det(200.0, 200.0, 250.0, 250.0, 0.8, 0),
        ];
        assert_eq!(non_max_suppression(dets, 0.5).len(), 2);
    }

    #[test]
    fn test_nms_empty_input() {
        assert!(non_max_suppression(Vec::new(), 0.5).is_empty());
    }
}
