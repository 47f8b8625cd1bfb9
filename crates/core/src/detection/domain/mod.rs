pub mod class_filter;
pub mod object_detector;
