pub mod frame_annotator;
pub mod label;
