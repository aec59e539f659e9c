use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{SplitDirs, SplitSummary, LABEL_EXTENSION};
use crate::utils::create_output_directory;
use crate::vocabulary::ClassVocabulary;

/// Set up `images/<split>` and `labels/<split>` under the output directory
pub fn setup_split_directories(output_dir: &Path, split: &str) -> std::io::Result<SplitDirs> {
    let labels_dir = create_output_directory(&output_dir.join("labels").join(split))?;
    let images_dir = create_output_directory(&output_dir.join("images").join(split))?;
    Ok(SplitDirs {
        labels_dir,
        images_dir,
    })
}

/// Write label lines to `<labels_dir>/<name>.txt`, replacing any previous file.
/// Lines are separated by `\n` with no trailing newline.
pub fn write_label_file(labels_dir: &Path, name: &str, lines: &[String]) -> std::io::Result<PathBuf> {
    let label_output_path = labels_dir.join(format!("{}.{}", name, LABEL_EXTENSION));
    let mut writer = BufWriter::new(File::create(&label_output_path)?);
    writer.write_all(lines.join("\n").as_bytes())?;
    writer.flush()?;
    Ok(label_output_path)
}

/// Create the dataset.yaml file consumed by the YOLO trainer
pub fn create_dataset_yaml(
    output_dir: &Path,
    vocabulary: &ClassVocabulary,
    has_test_split: bool,
) -> std::io::Result<PathBuf> {
    let dataset_yaml_path = output_dir.join("dataset.yaml");
    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
    let absolute_path = fs::canonicalize(output_dir)?;
    let mut yaml_content = format!(
        "path: {}\ntrain: images/train\nval: images/val\n",
        absolute_path.to_string_lossy()
    );
    if has_test_split {
        yaml_content.push_str("test: images/test\n");
    } else {
        yaml_content.push_str("test:\n");
    }
    yaml_content.push_str(&format!("\nnc: {}\n", vocabulary.len()));
    yaml_content.push_str("names:\n");

    for (id, name) in vocabulary.iter() {
        yaml_content.push_str(&format!("    {}: {}\n", id, name));
    }
    dataset_yaml.write_all(yaml_content.as_bytes())?;
    dataset_yaml.flush()?;
    Ok(dataset_yaml_path)
}

pub fn write_summary_json(path: &Path, summaries: &[SplitSummary]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, summaries)?;
    writer.flush()?;
    Ok(())
}
