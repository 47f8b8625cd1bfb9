pub const YOLO_MODEL_NAME: &str = "yolov8x.onnx";

pub const WINDOW_TITLE: &str = "YOLOv8 Detection";

/// Default capture device (first camera).
pub const DEFAULT_CAPTURE_INDEX: i32 = 0;
pub const REQUESTED_FRAME_WIDTH: u32 = 1280;
pub const REQUESTED_FRAME_HEIGHT: u32 = 720;

/// COCO class id for "person".
pub const PERSON_CLASS_ID: u32 = 0;

pub const ESCAPE_KEY: i32 = 27;
/// Upper bound on how long each iteration waits for a key press.
pub const KEY_POLL_DELAY_MS: i32 = 5;

pub const DEFAULT_CONFIDENCE: f32 = 0.25;
pub const NMS_IOU_THRESHOLD: f32 = 0.7;

pub const BOX_THICKNESS: u32 = 3;
pub const TEXT_SCALE: f32 = 1.5;

/// Baseline origin of the FPS overlay.
pub const FPS_TEXT_ORIGIN: (i32, i32) = (20, 70);
pub const FPS_TEXT_COLOR: [u8; 3] = [0, 255, 0];
