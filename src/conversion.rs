use log::{debug, warn};
use std::fs::copy;
use std::path::Path;

use crate::config::{ConversionConfig, UnreadableDimensionsPolicy};
use crate::error::{ConvertError, Result};
use crate::io::write_label_file;
use crate::types::{
    AbsoluteBoundingBox, AnnotationRecord, ImageDimensions, ImageOutcome, ImageReport,
    NormalizedBox, SplitDirs,
};
use crate::utils::{
    output_stem, read_and_parse_xml, read_image_dimensions, resolve_annotation_path,
    resolve_image_path,
};
use crate::vocabulary::ClassVocabulary;

/// Calculate the normalized center and size of a corner-format box.
///
/// Values are not clamped: a box reaching outside the image yields values
/// outside `[0, 1]`.
pub fn calculate_bounding_box(
    bbox: &AbsoluteBoundingBox,
    dims: ImageDimensions,
) -> (f64, f64, f64, f64) {
    let image_width = dims.width as f64;
    let image_height = dims.height as f64;

    let x_center = (bbox.xmin + bbox.xmax) / 2.0 / image_width;
    let y_center = (bbox.ymin + bbox.ymax) / 2.0 / image_height;
    let width = (bbox.xmax - bbox.xmin) / image_width;
    let height = (bbox.ymax - bbox.ymin) / image_height;

    (x_center, y_center, width, height)
}

pub fn normalize_box(
    bbox: &AbsoluteBoundingBox,
    class_id: usize,
    dims: ImageDimensions,
) -> NormalizedBox {
    let (center_x, center_y, width, height) = calculate_bounding_box(bbox, dims);
    NormalizedBox {
        class_id,
        center_x,
        center_y,
        width,
        height,
    }
}

impl NormalizedBox {
    /// Back to pixel corners `(xmin, ymin, xmax, ymax)` for the given image size
    pub fn denormalize(&self, dims: ImageDimensions) -> (f64, f64, f64, f64) {
        let image_width = dims.width as f64;
        let image_height = dims.height as f64;
        let half_w = self.width * image_width / 2.0;
        let half_h = self.height * image_height / 2.0;
        let cx = self.center_x * image_width;
        let cy = self.center_y * image_height;
        (cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    pub fn to_label_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.center_x, self.center_y, self.width, self.height
        )
    }
}

/// Normalize the boxes of one annotation, lazily and in document order.
///
/// Boxes whose class is not in the vocabulary are dropped with a warning; the
/// remaining boxes are unaffected.
pub fn convert_annotation<'a>(
    record: &'a AnnotationRecord,
    dims: ImageDimensions,
    vocabulary: &'a ClassVocabulary,
) -> impl Iterator<Item = NormalizedBox> + 'a {
    record
        .boxes
        .iter()
        .filter_map(move |bbox| match vocabulary.id_of(&bbox.class_name) {
            Some(class_id) => Some(normalize_box(bbox, class_id, dims)),
            None => {
                warn!("Unknown class '{}', box skipped", bbox.class_name);
                None
            }
        })
}

/// Rendered YOLO label lines for one annotation
pub fn yolo_label_lines<'a>(
    record: &'a AnnotationRecord,
    dims: ImageDimensions,
    vocabulary: &'a ClassVocabulary,
) -> impl Iterator<Item = String> + 'a {
    convert_annotation(record, dims, vocabulary).map(|nbox| nbox.to_label_line())
}

/// Convert an annotation to the contents of a YOLO label file
pub fn convert_to_yolo_format(
    record: &AnnotationRecord,
    dims: ImageDimensions,
    vocabulary: &ClassVocabulary,
) -> String {
    yolo_label_lines(record, dims, vocabulary)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read an image's size, applying the unreadable-dimensions policy.
///
/// Returns the dimensions and whether the placeholder was substituted. A
/// placeholder with a zero side is rejected rather than used.
pub fn resolve_image_dimensions(
    image_path: &Path,
    policy: UnreadableDimensionsPolicy,
) -> Result<(ImageDimensions, bool)> {
    match read_image_dimensions(image_path) {
        Ok(dims) => Ok((dims, false)),
        Err(e) => match policy {
            UnreadableDimensionsPolicy::Fail => Err(e),
            UnreadableDimensionsPolicy::Substitute(fallback) if !fallback.is_valid() => {
                Err(ConvertError::InvalidPlaceholder {
                    width: fallback.width,
                    height: fallback.height,
                })
            }
            UnreadableDimensionsPolicy::Substitute(fallback) => {
                warn!(
                    "{}. Using placeholder dimensions {}x{}",
                    e, fallback.width, fallback.height
                );
                Ok((fallback, true))
            }
        },
    }
}

/// Convert one image of a split: locate image and annotation, normalize the
/// boxes, then write the label file and copy the image.
pub fn process_image(
    name: &str,
    config: &ConversionConfig,
    split_dirs: &SplitDirs,
    vocabulary: &ClassVocabulary,
) -> Result<ImageReport> {
    let Some(image_path) = resolve_image_path(&config.images_dir(), name) else {
        warn!("Image not found: {}", name);
        return Ok(ImageReport::skipped(ImageOutcome::SkippedMissingImage));
    };

    let Some(annotation_path) = resolve_annotation_path(&config.annotations_dir(), name) else {
        warn!("Annotation not found: {}.xml", name);
        return Ok(ImageReport::skipped(ImageOutcome::SkippedMissingAnnotation));
    };

    let (dims, substituted_dimensions) =
        resolve_image_dimensions(&image_path, config.on_unreadable_dimensions)?;

    let record = read_and_parse_xml(&annotation_path)?;
    if record.has_malformed_size() {
        warn!("{}: ignoring unreadable <size> in annotation", name);
    }
    if let Some(declared) = record.declared_dimensions() {
        if !substituted_dimensions && declared != dims {
            warn!(
                "{}: annotation declares {}x{} but image is {}x{}",
                name, declared.width, declared.height, dims.width, dims.height
            );
        }
    }
    if !record.names_image(name) {
        warn!(
            "{}: annotation <filename> is {:?}",
            name,
            record.filename.as_deref().unwrap_or_default()
        );
    }

    let unknown_class_boxes = record
        .boxes
        .iter()
        .filter(|bbox| vocabulary.id_of(&bbox.class_name).is_none())
        .count();
    let lines: Vec<String> = yolo_label_lines(&record, dims, vocabulary).collect();

    if lines.is_empty() {
        warn!("{} has no valid boxes", name);
        return Ok(ImageReport {
            outcome: ImageOutcome::SkippedNoValidBoxes,
            unknown_class_boxes,
            substituted_dimensions,
        });
    }

    let sanitized_name = output_stem(name);
    write_label_file(&split_dirs.labels_dir, &sanitized_name, &lines)?;

    let image_extension = image_path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    let image_output_path = split_dirs
        .images_dir
        .join(format!("{}.{}", sanitized_name, image_extension));
    copy(&image_path, &image_output_path)?;
    debug!(
        "Converted {} -> {} ({} boxes)",
        name,
        image_output_path.display(),
        lines.len()
    );

    Ok(ImageReport {
        outcome: ImageOutcome::Converted { boxes: lines.len() },
        unknown_class_boxes,
        substituted_dimensions,
    })
}
