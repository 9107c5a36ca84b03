pub mod algorithm;
pub mod boundary;
pub mod config;

pub use algorithm::segment_events;
pub use boundary::is_boundary;
pub use config::SegmentationConfig;
