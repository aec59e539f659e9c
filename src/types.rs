use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Image extensions tried, in order, when resolving a base-name
pub const IMG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

pub const LABEL_EXTENSION: &str = "txt";
pub const ANNOTATION_EXTENSION: &str = "xml";

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether both sides are non-zero, so boxes can be normalized against it
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A box in absolute pixel corner coordinates, as written in VOC annotations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "VocObject")]
pub struct AbsoluteBoundingBox {
    pub class_name: String,
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl AbsoluteBoundingBox {
    pub fn new(class_name: impl Into<String>, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            class_name: class_name.into(),
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

/// A box in YOLO's normalized center format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub class_id: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

// The <object> element of a VOC annotation
#[derive(Debug, Deserialize)]
struct VocObject {
    name: String,
    bndbox: VocBndBox,
}

#[derive(Debug, Deserialize)]
struct VocBndBox {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl From<VocObject> for AbsoluteBoundingBox {
    fn from(object: VocObject) -> Self {
        AbsoluteBoundingBox {
            class_name: object.name.trim().to_string(),
            xmin: object.bndbox.xmin,
            ymin: object.bndbox.ymin,
            xmax: object.bndbox.xmax,
            ymax: object.bndbox.ymax,
        }
    }
}

// The <size> element of a VOC annotation. Kept as text: exporters write
// values like `200.0` or leave fields empty, and the size is advisory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VocSize {
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

// Parse a pixel count written as `200`, ` 200 ` or `200.0`
fn parse_pixel_count(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    if let Ok(count) = value.parse::<u32>() {
        return Some(count).filter(|count| *count > 0);
    }
    let real = value.parse::<f64>().ok()?;
    if real.is_finite() && real >= 1.0 && real.fract() == 0.0 && real <= u32::MAX as f64 {
        Some(real as u32)
    } else {
        None
    }
}

/// The annotation document of one image: its boxes in document order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<VocSize>,
    #[serde(rename = "object", default)]
    pub boxes: Vec<AbsoluteBoundingBox>,
}

impl AnnotationRecord {
    pub fn new(boxes: Vec<AbsoluteBoundingBox>) -> Self {
        Self {
            filename: None,
            size: None,
            boxes,
        }
    }

    /// Dimensions declared by the document, if a usable `<size>` is present
    pub fn declared_dimensions(&self) -> Option<ImageDimensions> {
        let size = self.size.as_ref()?;
        let width = parse_pixel_count(size.width.as_deref())?;
        let height = parse_pixel_count(size.height.as_deref())?;
        Some(ImageDimensions::new(width, height))
    }

    /// `true` when a `<size>` element exists but does not hold a usable size
    pub fn has_malformed_size(&self) -> bool {
        self.size.is_some() && self.declared_dimensions().is_none()
    }

    /// Whether `<filename>` refers to the image base-name `name`. A document
    /// without `<filename>` matches any name.
    pub fn names_image(&self, name: &str) -> bool {
        match self.filename.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(filename) => {
                let declared = Path::new(filename);
                declared.file_stem().and_then(|stem| stem.to_str()) == Some(name)
                    || declared.to_str() == Some(name)
            }
        }
    }
}

// Paths to the output directories of one split
#[derive(Debug, Clone)]
pub struct SplitDirs {
    pub labels_dir: PathBuf,
    pub images_dir: PathBuf,
}

/// What happened to one image of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Converted { boxes: usize },
    SkippedMissingImage,
    SkippedMissingAnnotation,
    SkippedNoValidBoxes,
}

impl ImageOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ImageOutcome::Converted { .. })
    }
}

/// Per-image outcome, with the side counts the split summary needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageReport {
    pub outcome: ImageOutcome,
    pub unknown_class_boxes: usize,
    pub substituted_dimensions: bool,
}

impl ImageReport {
    pub fn skipped(outcome: ImageOutcome) -> Self {
        Self {
            outcome,
            unknown_class_boxes: 0,
            substituted_dimensions: false,
        }
    }
}

// Struct to hold processing statistics for one split
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub total_images: usize,
    pub converted: usize,
    pub skipped_missing_image: usize,
    pub skipped_missing_annotation: usize,
    pub skipped_no_valid_boxes: usize,
    pub failed: usize,
    pub boxes_written: usize,
    pub unknown_class_boxes: usize,
    pub substituted_dimensions: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &ImageReport) {
        self.total_images += 1;
        self.unknown_class_boxes += report.unknown_class_boxes;
        if report.substituted_dimensions {
            self.substituted_dimensions += 1;
        }
        match report.outcome {
            ImageOutcome::Converted { boxes } => {
                self.converted += 1;
                self.boxes_written += boxes;
            }
            ImageOutcome::SkippedMissingImage => self.skipped_missing_image += 1,
            ImageOutcome::SkippedMissingAnnotation => self.skipped_missing_annotation += 1,
            ImageOutcome::SkippedNoValidBoxes => self.skipped_no_valid_boxes += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.total_images += 1;
        self.failed += 1;
    }

    pub fn skipped(&self) -> usize {
        self.skipped_missing_image + self.skipped_missing_annotation + self.skipped_no_valid_boxes
    }

    pub fn print_summary(&self, split: &str) {
        log::info!("=== {} split summary ===", split);
        log::info!("Images listed: {}", self.total_images);
        log::info!("Converted: {} ({} boxes)", self.converted, self.boxes_written);
        log::info!(
            "Skipped: {} (missing image: {}, missing annotation: {}, no valid boxes: {})",
            self.skipped(),
            self.skipped_missing_image,
            self.skipped_missing_annotation,
            self.skipped_no_valid_boxes
        );
        if self.failed > 0 {
            log::warn!("Failed: {}", self.failed);
        }
        if self.unknown_class_boxes > 0 {
            log::warn!("Boxes dropped for unknown class: {}", self.unknown_class_boxes);
        }
        if self.substituted_dimensions > 0 {
            log::warn!(
                "Images normalized with placeholder dimensions: {}",
                self.substituted_dimensions
            );
        }
    }
}

/// Result of converting one split.
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub split: String,
    /// `false` when the split was aborted because its manifest is missing
    pub completed: bool,
    pub stats: ProcessingStats,
}
