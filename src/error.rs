use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting a VOC dataset.
///
/// Per-image skips (missing image, missing annotation, no usable boxes) are not
/// errors; they are reported through [`crate::types::ImageOutcome`].
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset directory does not exist: {0}")]
    DatasetDirMissing(PathBuf),

    #[error("split manifest for '{split}' not found: {path}")]
    MissingManifest { split: String, path: PathBuf },

    #[error("failed to parse annotation {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("failed to read image dimensions of {path}: {source}")]
    ImageDimensions {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("image {path} reports zero width or height")]
    ZeroDimensions { path: PathBuf },

    #[error("placeholder dimensions {width}x{height} must be non-zero")]
    InvalidPlaceholder { width: u32, height: u32 },

    #[error("failed to write summary: {0}")]
    Summary(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
