use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::types::{AnnotationRecord, ImageDimensions, ANNOTATION_EXTENSION, IMG_EXTENSIONS};

/// Read and parse a VOC XML annotation document.
pub fn read_and_parse_xml(path: &Path) -> Result<AnnotationRecord> {
    let content = fs::read_to_string(path)?;
    quick_xml::de::from_str(&content).map_err(|source| ConvertError::AnnotationParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read an image's pixel size from its file header without decoding it.
pub fn read_image_dimensions(path: &Path) -> Result<ImageDimensions> {
    let size = imagesize::size(path).map_err(|source| ConvertError::ImageDimensions {
        path: path.to_path_buf(),
        source,
    })?;

    let width = u32::try_from(size.width).unwrap_or(0);
    let height = u32::try_from(size.height).unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(ConvertError::ZeroDimensions {
            path: path.to_path_buf(),
        });
    }
    Ok(ImageDimensions::new(width, height))
}

/// Find `<images_dir>/<name>.<ext>` trying each known extension in order.
pub fn resolve_image_path(images_dir: &Path, name: &str) -> Option<PathBuf> {
    IMG_EXTENSIONS
        .iter()
        .map(|ext| images_dir.join(format!("{}.{}", name, ext)))
        .find(|candidate| candidate.is_file())
}

pub fn resolve_annotation_path(annotations_dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = annotations_dir.join(format!("{}.{}", name, ANNOTATION_EXTENSION));
    candidate.is_file().then_some(candidate)
}

/// File stem used for an image's outputs: the base-name made safe for the
/// file system. A changed name is logged since the output then no longer
/// mirrors the manifest entry.
pub fn output_stem(name: &str) -> String {
    let sanitized = sanitize_filename::sanitize(name);
    if sanitized != name {
        warn!("Output name for '{}' sanitized to '{}'", name, sanitized);
    }
    sanitized
}

/// Read a split manifest: one image base-name per line, blank lines ignored.
pub fn read_split_manifest(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create an output directory if needed. Existing contents are kept so that
/// reruns overwrite files in place.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        debug!("Reusing output directory {}", path.display());
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}
