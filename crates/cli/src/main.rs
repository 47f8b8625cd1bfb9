use std::path::PathBuf;
use std::process;

use clap::Parser;

use webcam_detect_core::annotation::infrastructure::box_annotator::BoxAnnotator;
use webcam_detect_core::capture::infrastructure::opencv_camera::OpencvCamera;
use webcam_detect_core::detection::domain::object_detector::ObjectDetector;
use webcam_detect_core::detection::infrastructure::model_resolver;
use webcam_detect_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use webcam_detect_core::display::infrastructure::highgui_window::HighguiWindow;
use webcam_detect_core::pipeline::detection_loop::DetectionLoop;
use webcam_detect_core::pipeline::frame_processor::FrameProcessor;
use webcam_detect_core::pipeline::loop_logger::StdoutLoopLogger;
use webcam_detect_core::shared::config::DetectionConfig;
use webcam_detect_core::shared::constants::{
    DEFAULT_CAPTURE_INDEX, DEFAULT_CONFIDENCE, PERSON_CLASS_ID, REQUESTED_FRAME_HEIGHT,
    REQUESTED_FRAME_WIDTH, WINDOW_TITLE, YOLO_MODEL_NAME,
};

/// Live person detection on a webcam feed. Press Escape in the window to quit.
#[derive(Parser)]
#[command(name = "webcam-detect")]
struct Cli {
    /// Capture device index.
    #[arg(long, default_value_t = DEFAULT_CAPTURE_INDEX)]
    camera: i32,

    /// ONNX weights file (defaults to yolov8x.onnx in the cache or working directory).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f32,

    /// Class id to draw (0 = person).
    #[arg(long, default_value_t = PERSON_CLASS_ID)]
    target_class: u32,

    /// Requested capture width.
    #[arg(long, default_value_t = REQUESTED_FRAME_WIDTH)]
    width: u32,

    /// Requested capture height.
    #[arg(long, default_value_t = REQUESTED_FRAME_HEIGHT)]
    height: u32,
}

impl Cli {
    fn into_config(self) -> DetectionConfig {
        DetectionConfig {
            capture_index: self.camera,
            frame_width: self.width,
            frame_height: self.height,
            model_path: self.model,
            confidence: self.confidence,
            target_class: self.target_class,
            ..DetectionConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();
    config.validate()?;

    let detector = build_detector(&config)?;
    let camera = OpencvCamera::open(config.capture_index, config.frame_width, config.frame_height)?;
    let window = HighguiWindow::open(WINDOW_TITLE)?;

    let processor = FrameProcessor::new(
        detector,
        Box::new(BoxAnnotator::default()),
        config.target_class,
    );
    let mut detection_loop = DetectionLoop::new(
        Box::new(camera),
        processor,
        Box::new(window),
        Box::new(StdoutLoopLogger::default()),
    );

    let frames = detection_loop.run()?;
    log::info!("Stopped after {frames} frames");
    Ok(())
}

fn build_detector(
    config: &DetectionConfig,
) -> Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let working_dir = std::env::current_dir().ok();
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        config.model_path.as_deref(),
        working_dir.as_deref(),
    )?;
    log::info!("Loading model from {}", model_path.display());

    let detector = OnnxYoloDetector::new(&model_path, config.confidence, config.iou_threshold)?;
    let names = detector.class_names();
    log::info!(
        "Drawing class {} ({})",
        config.target_class,
        names.name_or_id(config.target_class)
    );
    Ok(Box::new(detector))
}
