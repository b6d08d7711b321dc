use std::path::PathBuf;

// Names of the output directories created next to the image directory
pub const SCALED_IMAGES_DIR: &str = "scaled_images";
pub const SCALED_ANNOTATIONS_DIR: &str = "scaled_annotations";

// Extension of KITTI annotation files
pub const ANNOTATION_EXTENSION: &str = "txt";

/// Desired output size, shared by every image of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Per-image ratio between the target size and the original size.
///
/// Coordinates are evaluated as `value * target / original` rather than
/// multiplied by a precomputed ratio, so results are bit-identical to
/// rescaling done left to right in double precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    original_width: f64,
    original_height: f64,
    target_width: f64,
    target_height: f64,
}

impl ScaleFactors {
    pub fn new(original_width: u32, original_height: u32, target: TargetSize) -> Self {
        Self {
            original_width: original_width as f64,
            original_height: original_height as f64,
            target_width: target.width as f64,
            target_height: target.height as f64,
        }
    }

    pub fn sx(&self) -> f64 {
        self.target_width / self.original_width
    }

    pub fn sy(&self) -> f64 {
        self.target_height / self.original_height
    }

    pub fn scale_x(&self, x: f64) -> f64 {
        x * self.target_width / self.original_width
    }

    pub fn scale_y(&self, y: f64) -> f64 {
        y * self.target_height / self.original_height
    }
}

// One processed image: its filename (kept as a raw path, names need not be
// UTF-8) and the size it had before resizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub file_name: PathBuf,
    pub original_width: u32,
    pub original_height: u32,
}

impl ImageRecord {
    pub fn scale_factors(&self, target: TargetSize) -> ScaleFactors {
        ScaleFactors::new(self.original_width, self.original_height, target)
    }
}

// Paths of the two output directories
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub images_dir: PathBuf,
    pub annotations_dir: PathBuf,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub images_resized: usize,
    pub annotation_files_written: usize,
    pub annotation_lines_rescaled: usize,
    pub blank_lines_passed: usize,
    pub skipped_entries: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Images resized: {}", self.images_resized);
        log::info!(
            "Annotation files written: {}",
            self.annotation_files_written
        );
        log::info!(
            "Annotation lines rescaled: {}",
            self.annotation_lines_rescaled
        );
        if self.blank_lines_passed > 0 {
            log::info!("Blank lines passed through: {}", self.blank_lines_passed);
        }
        if self.skipped_entries > 0 {
            log::warn!(
                "Skipped {} non-file entries in the image directory",
                self.skipped_entries
            );
        }
    }
}
