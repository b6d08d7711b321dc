use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RescaleConfig;
use crate::conversion::{rescale_annotation_file, rescale_image};
use crate::error::{RescaleError, Result};
use crate::types::{OutputDirs, ProcessingStats, SCALED_ANNOTATIONS_DIR, SCALED_IMAGES_DIR};
use crate::utils::{
    annotation_file_name, canonical_or_self, create_progress_bar, prepare_output_directory,
};

/// Work out where the output directories go without touching the filesystem
/// beyond canonicalising `img_dir`.
///
/// By default both directories are siblings of the image directory.
pub fn resolve_output_dirs(img_dir: &Path, output_dir: Option<&Path>) -> Result<OutputDirs> {
    let parent = match output_dir {
        Some(dir) => canonical_or_self(dir),
        None => {
            let absolute = fs::canonicalize(img_dir).map_err(|e| RescaleError::io(img_dir, e))?;
            absolute
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or(absolute)
        }
    };
    info!("Parent directory: {}", parent.display());

    Ok(OutputDirs {
        images_dir: parent.join(SCALED_IMAGES_DIR),
        annotations_dir: parent.join(SCALED_ANNOTATIONS_DIR),
    })
}

/// Resolve, sanity-check and prepare (create or clear) both output directories
pub fn setup_output_directories(
    img_dir: &Path,
    kitti_dir: &Path,
    config: &RescaleConfig,
) -> Result<OutputDirs> {
    let dirs = resolve_output_dirs(img_dir, config.output_dir.as_deref())?;

    // Clearing an output must never reach an input, including one nested inside it
    let inputs = [canonical_or_self(img_dir), canonical_or_self(kitti_dir)];
    for output in [&dirs.images_dir, &dirs.annotations_dir] {
        let output_canonical = canonical_or_self(output);
        if let Some(input) = inputs
            .iter()
            .find(|input| input.starts_with(&output_canonical))
        {
            return Err(RescaleError::OutputOverlapsInput {
                output: output.clone(),
                input: input.clone(),
            });
        }
    }

    prepare_output_directory(&dirs.images_dir)?;
    prepare_output_directory(&dirs.annotations_dir)?;
    Ok(dirs)
}

/// List the regular files of `img_dir` in the order the filesystem yields
/// them. Other entries are counted in `stats` and skipped.
fn collect_image_paths(img_dir: &Path, stats: &mut ProcessingStats) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(img_dir).map_err(|e| RescaleError::io(img_dir, e))? {
        let entry = entry.map_err(|e| RescaleError::io(img_dir, e))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        } else {
            warn!("Skipping non-file entry: {}", path.display());
            stats.skipped_entries += 1;
        }
    }
    Ok(paths)
}

/// Rescale every image of `img_dir` and its paired annotation file.
///
/// Any failure stops the batch; outputs written before the failure stay on
/// disk.
pub fn process_dataset(
    img_dir: &Path,
    kitti_dir: &Path,
    output_dirs: &OutputDirs,
    config: &RescaleConfig,
) -> Result<ProcessingStats> {
    let mut stats = ProcessingStats::new();
    let image_paths = collect_image_paths(img_dir, &mut stats)?;

    info!("Resizing images and kitti files...");
    let pb = create_progress_bar(image_paths.len() as u64, "Rescale", config.show_progress);

    for image_path in &image_paths {
        let record = rescale_image(
            image_path,
            &output_dirs.images_dir,
            config.target,
            config.filter,
        )?;
        stats.images_resized += 1;

        let annotation_name =
            annotation_file_name(&record.file_name).ok_or_else(|| {
                RescaleError::MissingAnnotation {
                    image: image_path.clone(),
                    expected: kitti_dir.to_path_buf(),
                }
            })?;
        let annotation_path = kitti_dir.join(&annotation_name);
        if !annotation_path.is_file() {
            return Err(RescaleError::MissingAnnotation {
                image: image_path.clone(),
                expected: annotation_path,
            });
        }

        let scale = record.scale_factors(config.target);
        let annotation_stats = rescale_annotation_file(
            &annotation_path,
            &output_dirs.annotations_dir.join(&annotation_name),
            &scale,
        )?;
        stats.annotation_files_written += 1;
        stats.annotation_lines_rescaled += annotation_stats.rescaled_lines;
        stats.blank_lines_passed += annotation_stats.blank_lines;

        debug!("Finished {}", record.file_name.display());
        pb.inc(1);
    }
    pb.finish_with_message("Rescaling complete");

    Ok(stats)
}

/// Full run: prepare the output directories, then process the dataset
pub fn run(img_dir: &Path, kitti_dir: &Path, config: &RescaleConfig) -> Result<ProcessingStats> {
    let output_dirs = setup_output_directories(img_dir, kitti_dir, config)?;
    let stats = process_dataset(img_dir, kitti_dir, &output_dirs, config)?;
    stats.print_summary();
    Ok(stats)
}
