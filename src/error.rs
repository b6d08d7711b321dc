//! Error types for the rescaling pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a rescaling run.
///
/// Every failure is fatal for the whole batch: nothing is retried and no
/// per-file errors are collected.
#[derive(Error, Debug)]
pub enum RescaleError {
    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image could not be decoded, resized or encoded.
    #[error("image error on {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No annotation file matches the image.
    #[error(
        "no annotation file for image {} (expected {})",
        .image.display(),
        .expected.display()
    )]
    MissingAnnotation { image: PathBuf, expected: PathBuf },

    /// An annotation line has too few fields to hold a bounding box.
    #[error("{}:{line}: expected at least 8 fields, found {found}", .path.display())]
    TooFewFields {
        path: PathBuf,
        line: usize,
        found: usize,
    },

    /// A bounding-box field is not a number.
    #[error(
        "{}:{line}: field {field} is not a number: {value:?}",
        .path.display()
    )]
    InvalidCoordinate {
        path: PathBuf,
        line: usize,
        field: usize,
        value: String,
    },

    /// An output directory resolves to one of the input directories.
    #[error(
        "output directory {} overlaps input directory {}",
        .output.display(),
        .input.display()
    )]
    OutputOverlapsInput { output: PathBuf, input: PathBuf },

    /// An output directory holds a subdirectory, which is never deleted.
    #[error(
        "refusing to clear output directory: it contains subdirectory {}",
        .path.display()
    )]
    UnexpectedSubdirectory { path: PathBuf },

    /// A path that must be a directory is something else.
    #[error("not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
}

impl RescaleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RescaleError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RescaleError>;
