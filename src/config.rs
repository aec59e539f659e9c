use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::ImageDimensions;

/// Command-line arguments parser for converting Pascal VOC datasets to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root of the VOC dataset (contains Annotations/, JPEGImages/ and ImageSets/Main/)
    #[arg(short = 'd', long = "dataset_dir")]
    pub dataset_dir: String,

    /// Where to write images/<split>/ and labels/<split>/ (defaults to dataset_dir)
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<String>,

    /// Newline-delimited class list (defaults to <dataset_dir>/classes.txt)
    #[arg(long = "classes_file")]
    pub classes_file: Option<String>,

    /// Splits to convert; defaults to train,val plus test when its manifest exists
    #[arg(long = "splits", value_delimiter = ',')]
    pub splits: Vec<String>,

    /// What to do when an image header cannot be read
    #[arg(
        long = "on_unreadable_dimensions",
        value_enum,
        default_value = "substitute"
    )]
    pub on_unreadable_dimensions: DimensionsFallback,

    /// Placeholder width used by the 'substitute' policy
    #[arg(long = "fallback_width", default_value_t = 200, value_parser = validate_positive)]
    pub fallback_width: u32,

    /// Placeholder height used by the 'substitute' policy
    #[arg(long = "fallback_height", default_value_t = 200, value_parser = validate_positive)]
    pub fallback_height: u32,

    /// Log a progress line every N converted images
    #[arg(long = "progress_every", default_value_t = 100, value_parser = validate_positive)]
    pub progress_every: u32,

    /// Convert the images of a split in parallel
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Do not write dataset.yaml
    #[arg(long = "no_dataset_yaml")]
    pub no_dataset_yaml: bool,

    /// Write per-split conversion counts as JSON to this path
    #[arg(long = "summary_json")]
    pub summary_json: Option<String>,

    /// Ordered class names; overrides the class file
    #[arg(value_delimiter = ',')]
    pub label_list: Vec<String>,
}

// Command-line choice for unreadable image headers
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum DimensionsFallback {
    /// Treat the image as failed
    Fail,
    /// Use the placeholder width and height
    Substitute,
}

/// Policy applied when an image's pixel dimensions cannot be read.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnreadableDimensionsPolicy {
    Fail,
    Substitute(ImageDimensions),
}

impl Default for UnreadableDimensionsPolicy {
    fn default() -> Self {
        UnreadableDimensionsPolicy::Substitute(ImageDimensions::new(200, 200))
    }
}

/// Resolved, immutable settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub dataset_dir: PathBuf,
    pub output_dir: PathBuf,
    pub on_unreadable_dimensions: UnreadableDimensionsPolicy,
    pub progress_every: usize,
    pub parallel: bool,
}

impl ConversionConfig {
    /// Settings for converting `dataset_dir` in place with default policies.
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        let dataset_dir = dataset_dir.into();
        Self {
            output_dir: dataset_dir.clone(),
            dataset_dir,
            on_unreadable_dimensions: UnreadableDimensionsPolicy::default(),
            progress_every: 100,
            parallel: false,
        }
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.dataset_dir.join("Annotations")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dataset_dir.join("JPEGImages")
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.dataset_dir.join("ImageSets").join("Main")
    }

    pub fn manifest_path(&self, split: &str) -> PathBuf {
        self.manifests_dir().join(format!("{}.txt", split))
    }
}

impl Args {
    pub fn to_conversion_config(&self) -> ConversionConfig {
        let on_unreadable_dimensions = match self.on_unreadable_dimensions {
            DimensionsFallback::Fail => UnreadableDimensionsPolicy::Fail,
            DimensionsFallback::Substitute => UnreadableDimensionsPolicy::Substitute(
                ImageDimensions::new(self.fallback_width, self.fallback_height),
            ),
        };

        let dataset_dir = PathBuf::from(&self.dataset_dir);
        let output_dir = self
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| dataset_dir.clone());

        ConversionConfig {
            dataset_dir,
            output_dir,
            on_unreadable_dimensions,
            progress_every: self.progress_every as usize,
            parallel: self.parallel,
        }
    }

    /// Class file to try when no explicit label list was given
    pub fn classes_file_path(&self) -> PathBuf {
        match &self.classes_file {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.dataset_dir).join("classes.txt"),
        }
    }
}

// Validate that a count or size is strictly positive
pub fn validate_positive(s: &str) -> Result<u32, String> {
    match u32::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("value must be a positive integer".to_string()),
    }
}
