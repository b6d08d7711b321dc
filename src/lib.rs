//! KITTI dataset rescaler
//!
//! This library resizes a directory of images to a fixed size and rewrites the
//! paired KITTI annotation files so their 2D bounding boxes match the new
//! resolution.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod kitti;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, RescaleConfig, ResizeFilter};
pub use dataset::{process_dataset, run, setup_output_directories};
pub use error::{RescaleError, Result};
pub use kitti::KittiLine;
pub use types::{ImageRecord, OutputDirs, ProcessingStats, ScaleFactors, TargetSize};
pub use utils::prepare_output_directory;
