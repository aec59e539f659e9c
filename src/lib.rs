//! Pascal VOC to YOLO format converter
//!
//! This library converts VOC XML annotations (as shipped with the NEU-DET
//! surface-defect dataset) to YOLO label files and lays the result out in the
//! split-parallel `images/` and `labels/` trees a YOLO trainer expects.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;
pub mod vocabulary;

// Re-export commonly used types and functions
pub use config::{Args, ConversionConfig, UnreadableDimensionsPolicy};
pub use conversion::{convert_annotation, convert_to_yolo_format, normalize_box, process_image};
pub use dataset::{convert_dataset, convert_split, default_splits};
pub use error::ConvertError;
pub use io::{create_dataset_yaml, setup_split_directories};
pub use types::{
    AbsoluteBoundingBox, AnnotationRecord, ImageDimensions, ImageOutcome, ImageReport,
    NormalizedBox, ProcessingStats, SplitSummary,
};
pub use vocabulary::ClassVocabulary;
