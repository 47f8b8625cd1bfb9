mod bitmap_text;
pub mod box_annotator;
pub mod palette;
