use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RescaleError, Result};
use crate::types::ANNOTATION_EXTENSION;

/// Create a progress bar with the given length and label.
///
/// When `visible` is false a hidden bar is returned so callers can tick it
/// unconditionally.
pub fn create_progress_bar(len: u64, label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let template = format!(
        "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{per_sec}}, {{eta}})",
        label
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Make sure `path` exists and is empty.
///
/// A missing directory is created. An existing one has every file inside it
/// removed; the directory itself is kept. Output directories are expected to
/// be flat, so a subdirectory inside one is an error and nothing below it is
/// touched.
pub fn prepare_output_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| RescaleError::io(path, e))?;
        info!("Created directory: {}", path.display());
        return Ok(path.to_path_buf());
    }

    if !path.is_dir() {
        return Err(RescaleError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    for entry in fs::read_dir(path).map_err(|e| RescaleError::io(path, e))? {
        let entry = entry.map_err(|e| RescaleError::io(path, e))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| RescaleError::io(&entry_path, e))?;
        if file_type.is_dir() {
            return Err(RescaleError::UnexpectedSubdirectory { path: entry_path });
        }
        fs::remove_file(&entry_path).map_err(|e| RescaleError::io(&entry_path, e))?;
    }
    info!("Cleared directory: {}", path.display());
    Ok(path.to_path_buf())
}

/// File name of the annotation paired with an image: the image's stem with a
/// `.txt` extension. Returns `None` for names without a stem.
pub fn annotation_file_name(image_name: &Path) -> Option<PathBuf> {
    let stem = image_name.file_stem()?;
    Some(PathBuf::from(stem).with_extension(ANNOTATION_EXTENSION))
}

/// Canonical form of `path` when it exists, the path itself otherwise
pub(crate) fn canonical_or_self(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
