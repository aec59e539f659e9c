use log::{error, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;

use crate::config::ConversionConfig;
use crate::conversion::process_image;
use crate::error::{ConvertError, Result};
use crate::io::setup_split_directories;
use crate::types::{ImageReport, ProcessingStats, SplitSummary};
use crate::utils::{create_progress_bar, read_split_manifest};
use crate::vocabulary::ClassVocabulary;

/// Splits converted when none are requested explicitly: `train` and `val`,
/// plus `test` when its manifest exists.
pub fn default_splits(config: &ConversionConfig) -> Vec<String> {
    let mut splits = vec!["train".to_string(), "val".to_string()];
    if config.manifest_path("test").is_file() {
        splits.push("test".to_string());
    }
    splits
}

/// Read the image base-names listed for a split
pub fn load_split_manifest(config: &ConversionConfig, split: &str) -> Result<Vec<String>> {
    let path = config.manifest_path(split);
    if !path.is_file() {
        return Err(ConvertError::MissingManifest {
            split: split.to_string(),
            path,
        });
    }
    Ok(read_split_manifest(&path)?)
}

/// Distinct manifest names whose sanitized output names coincide, as
/// `(earlier, later)` pairs in manifest order. The later image's outputs
/// replace the earlier one's.
pub fn find_output_collisions(names: &[String]) -> Vec<(String, String)> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut collisions = Vec::new();
    for name in names {
        let stem = sanitize_filename::sanitize(name);
        match seen.get(&stem) {
            Some(earlier) if *earlier != name.as_str() => {
                collisions.push((earlier.to_string(), name.clone()));
            }
            Some(_) => {}
            None => {
                seen.insert(stem, name.as_str());
            }
        }
    }
    collisions
}

fn record_result(
    stats: &mut ProcessingStats,
    name: &str,
    result: Result<ImageReport>,
    progress_every: usize,
) {
    match result {
        Ok(report) => {
            stats.record(&report);
            if report.outcome.is_converted() && stats.converted % progress_every == 0 {
                info!("Converted {} images...", stats.converted);
            }
        }
        Err(e) => {
            error!("Failed to convert {}: {}", name, e);
            stats.record_failure();
        }
    }
}

/// Convert every image listed in a split's manifest.
///
/// Per-image problems are counted in the returned stats; only a missing
/// manifest or an unusable output directory aborts the split.
pub fn convert_split(
    split: &str,
    config: &ConversionConfig,
    vocabulary: &ClassVocabulary,
) -> Result<ProcessingStats> {
    let names = load_split_manifest(config, split)?;
    info!("Processing {} split, {} images", split, names.len());
    for (earlier, later) in find_output_collisions(&names) {
        warn!(
            "'{}' and '{}' map to the same output name; '{}' will overwrite",
            earlier, later, later
        );
    }

    let split_dirs = setup_split_directories(&config.output_dir, split)?;
    let progress_every = config.progress_every.max(1);
    let pb = create_progress_bar(names.len() as u64, split);
    let mut stats = ProcessingStats::new();

    if config.parallel {
        let results: Vec<Result<ImageReport>> = names
            .par_iter()
            .map(|name| {
                let result = process_image(name, config, &split_dirs, vocabulary);
                pb.inc(1);
                result
            })
            .collect();
        for (name, result) in names.iter().zip(results) {
            record_result(&mut stats, name, result, progress_every);
        }
    } else {
        for name in &names {
            let result = process_image(name, config, &split_dirs, vocabulary);
            record_result(&mut stats, name, result, progress_every);
            pb.inc(1);
        }
    }

    pb.finish_with_message(format!("{} processing complete", split));
    Ok(stats)
}

/// Convert each split in turn. A split that cannot be converted is logged and
/// reported as incomplete; the remaining splits still run.
pub fn convert_dataset(
    config: &ConversionConfig,
    vocabulary: &ClassVocabulary,
    splits: &[String],
) -> Vec<SplitSummary> {
    splits
        .iter()
        .map(|split| match convert_split(split, config, vocabulary) {
            Ok(stats) => {
                stats.print_summary(split);
                SplitSummary {
                    split: split.clone(),
                    completed: true,
                    stats,
                }
            }
            Err(e) => {
                error!("Skipping {} split: {}", split, e);
                SplitSummary {
                    split: split.clone(),
                    completed: false,
                    stats: ProcessingStats::new(),
                }
            }
        })
        .collect()
}
