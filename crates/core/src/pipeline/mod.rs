pub mod detection_loop;
pub mod fps_counter;
pub mod frame_processor;
pub mod loop_logger;
