use image::ImageReader;
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::ResizeFilter;
use crate::error::{RescaleError, Result};
use crate::kitti::{KittiLine, LineError};
use crate::types::{ImageRecord, ScaleFactors, TargetSize};

/// Line counts for one rewritten annotation file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationStats {
    pub rescaled_lines: usize,
    pub blank_lines: usize,
}

/// Decode `image_path`, stretch it to exactly `target`, and write it into
/// `images_dir` under the same file name.
pub fn rescale_image(
    image_path: &Path,
    images_dir: &Path,
    target: TargetSize,
    filter: ResizeFilter,
) -> Result<ImageRecord> {
    let image_err = |source: image::ImageError| RescaleError::Image {
        path: image_path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(image_path)
        .map_err(|e| RescaleError::io(image_path, e))?
        .with_guessed_format()
        .map_err(|e| RescaleError::io(image_path, e))?
        .decode()
        .map_err(image_err)?;

    let (original_width, original_height) = (image.width(), image.height());
    let resized = image.resize_exact(target.width, target.height, filter.into());

    let file_name = image_path
        .file_name()
        .ok_or_else(|| {
            RescaleError::io(
                image_path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
    let output_path = images_dir.join(file_name);
    resized.save(&output_path).map_err(|source| RescaleError::Image {
        path: output_path.clone(),
        source,
    })?;

    debug!(
        "Resized {} from {}x{} to {}x{}",
        image_path.display(),
        original_width,
        original_height,
        target.width,
        target.height
    );

    Ok(ImageRecord {
        file_name: PathBuf::from(file_name),
        original_width,
        original_height,
    })
}

/// Rescale the box corners of every line in `contents`.
///
/// `source` is only used to label errors. Blank lines are passed through.
pub fn rescale_annotation_text(
    contents: &str,
    scale: &ScaleFactors,
    source: &Path,
) -> Result<(String, AnnotationStats)> {
    let mut out = String::with_capacity(contents.len() + contents.len() / 4);
    let mut stats = AnnotationStats::default();

    for (index, raw) in contents.split_inclusive('\n').enumerate() {
        let line = KittiLine::parse(raw);
        if line.is_blank() {
            out.push_str(raw);
            stats.blank_lines += 1;
            continue;
        }

        let rescaled = line.rescale(scale).map_err(|e| match e {
            LineError::TooFewFields { found } => RescaleError::TooFewFields {
                path: source.to_path_buf(),
                line: index + 1,
                found,
            },
            LineError::InvalidCoordinate { field, value } => RescaleError::InvalidCoordinate {
                path: source.to_path_buf(),
                line: index + 1,
                field,
                value,
            },
        })?;
        out.push_str(&rescaled);
        stats.rescaled_lines += 1;
    }

    Ok((out, stats))
}

/// Read the annotation file at `input_path`, rescale it, and write the
/// result to `output_path`.
pub fn rescale_annotation_file(
    input_path: &Path,
    output_path: &Path,
    scale: &ScaleFactors,
) -> Result<AnnotationStats> {
    let contents = fs::read_to_string(input_path).map_err(|e| RescaleError::io(input_path, e))?;
    let (rescaled, stats) = rescale_annotation_text(&contents, scale, input_path)?;

    let file = File::create(output_path).map_err(|e| RescaleError::io(output_path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(rescaled.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| RescaleError::io(output_path, e))?;

    debug!(
        "Rescaled {} lines of {} (sx={}, sy={})",
        stats.rescaled_lines,
        input_path.display(),
        scale.sx(),
        scale.sy()
    );
    Ok(stats)
}
