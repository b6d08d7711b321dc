use clap::{Parser, ValueEnum};
use image::imageops::FilterType;
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::TargetSize;

/// Command-line arguments for rescaling a KITTI dataset to a new image size.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the input images
    pub img_dir: PathBuf,

    /// Directory containing the KITTI annotation files
    pub kitti_dir: PathBuf,

    /// Target image width in pixels
    #[arg(value_parser = validate_dimension)]
    pub width: u32,

    /// Target image height in pixels
    #[arg(value_parser = validate_dimension)]
    pub height: u32,

    /// Parent directory for scaled_images/ and scaled_annotations/
    /// (defaults to the parent of the image directory)
    #[arg(long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// Interpolation filter used when resizing
    #[arg(long = "filter", value_enum, default_value = "catmull-rom")]
    pub filter: ResizeFilter,

    /// Disable the progress bar
    #[arg(long = "no_progress")]
    pub no_progress: bool,
}

impl Args {
    /// Build the run configuration; progress display is decided here, once.
    pub fn to_config(&self) -> RescaleConfig {
        RescaleConfig {
            target: TargetSize::new(self.width, self.height),
            filter: self.filter,
            show_progress: !self.no_progress,
            output_dir: self.output_dir.clone(),
        }
    }
}

// Resize interpolation filters
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Everything the batch driver needs to know about a run
#[derive(Debug, Clone)]
pub struct RescaleConfig {
    pub target: TargetSize,
    pub filter: ResizeFilter,
    pub show_progress: bool,
    pub output_dir: Option<PathBuf>,
}

impl RescaleConfig {
    pub fn new(target: TargetSize) -> Self {
        Self {
            target,
            filter: ResizeFilter::CatmullRom,
            show_progress: false,
            output_dir: None,
        }
    }
}

// Validate that an image dimension is a positive integer
fn validate_dimension(s: &str) -> Result<u32, String> {
    match u32::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("must be a positive integer".to_string()),
    }
}
