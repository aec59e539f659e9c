use clap::Parser;

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use voc2yolo::io::write_summary_json;
use voc2yolo::{
    convert_dataset, create_dataset_yaml, default_splits, Args, ClassVocabulary, ConvertError,
};

fn load_vocabulary(args: &Args) -> std::io::Result<ClassVocabulary> {
    if !args.label_list.is_empty() {
        return Ok(ClassVocabulary::from_names(&args.label_list));
    }
    let classes_file = args.classes_file_path();
    ClassVocabulary::load(Some(classes_file.as_path()))
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dataset_dir = PathBuf::from(&args.dataset_dir);
    if !dataset_dir.is_dir() {
        error!("{}", ConvertError::DatasetDirMissing(dataset_dir));
        return ExitCode::FAILURE;
    }

    let vocabulary = match load_vocabulary(&args) {
        Ok(vocabulary) => vocabulary,
        Err(e) => {
            error!("Failed to read class list: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Classes: {:?}", vocabulary.names());

    let config = args.to_conversion_config();
    if let Err(e) = std::fs::create_dir_all(&config.output_dir) {
        error!(
            "Failed to create output directory {}: {}",
            config.output_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let splits = if args.splits.is_empty() {
        default_splits(&config)
    } else {
        args.splits.clone()
    };

    info!("Starting the conversion process...");
    let summaries = convert_dataset(&config, &vocabulary, &splits);

    if !args.no_dataset_yaml {
        let has_test_split = summaries
            .iter()
            .any(|summary| summary.split == "test" && summary.completed);
        match create_dataset_yaml(&config.output_dir, &vocabulary, has_test_split) {
            Ok(path) => info!("Wrote {}", path.display()),
            Err(e) => error!("Failed to create dataset.yaml: {}", e),
        }
    }

    if let Some(summary_path) = &args.summary_json {
        if let Err(e) = write_summary_json(Path::new(summary_path), &summaries) {
            error!("Failed to write {}: {}", summary_path, e);
        }
    }

    let aborted: Vec<&str> = summaries
        .iter()
        .filter(|summary| !summary.completed)
        .map(|summary| summary.split.as_str())
        .collect();
    if !aborted.is_empty() {
        warn!("Splits not converted: {}", aborted.join(", "));
    }
    info!(
        "Conversion finished. Output layout: {}/{{images,labels}}/<split>/",
        config.output_dir.display()
    );

    ExitCode::SUCCESS
}
