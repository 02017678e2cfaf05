use anyhow::{Result, anyhow};
use log::{error, warn, info};
use std::path::Path;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};

use crate::actor_classifier::{classify_events, FeatureFlags};
use crate::app_config::Config;
use crate::distribution::{build_output_buckets, DistributionPolicy};
use crate::file_utils::FileManager;
use crate::output_writer::{save_buckets, WriteReport};
use crate::subtitle_processor::ScriptFile;

// @module: Application controller for subtitle distribution

/// Main application controller driving the parse, classify, distribute and
/// write pipeline for one file or a whole folder
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Derive the effective distribution policy for one file. A policy flag
    /// only applies when the file actually offers that option, mirroring
    /// checkboxes that are hidden for absent features.
    fn policy_for(&self, features: FeatureFlags) -> DistributionPolicy {
        DistributionPolicy {
            distribute_group: self.config.distribute_group && features.has_group,
            distribute_multiple: self.config.distribute_multiple && features.has_multiple,
            save_signs: self.config.save_signs && features.has_signs,
        }
    }

    /// Process a single script file end to end and return the write report
    pub fn process_file(&self, input_file: &Path) -> Result<WriteReport> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let script = ScriptFile::parse_file(input_file)?;
        let classified = classify_events(&script.events);
        let policy = self.policy_for(classified.features());
        let buckets = build_output_buckets(&classified, policy)?;
        let report = save_buckets(
            &script.headers,
            &script.styles,
            &buckets,
            input_file,
            self.config.output_format,
        )?;

        info!(
            "Processed {:?} in {:.2}s: {} files written, {} failed",
            input_file,
            start_time.elapsed().as_secs_f64(),
            report.written.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Run on a file or a folder. Folders are walked for .ass scripts and
    /// each file is processed independently.
    pub fn run(&self, input_path: &Path) -> Result<()> {
        if FileManager::dir_exists(input_path) {
            self.run_folder(input_path)
        } else {
            self.process_file(input_path).map(|_| ())
        }
    }

    /// Process every .ass file under a folder. One file's failure is logged
    /// and does not stop the others.
    pub fn run_folder(&self, input_dir: &Path) -> Result<()> {
        let files = FileManager::find_files(input_dir, "ass")?;
        if files.is_empty() {
            warn!("No .ass files found in {:?}", input_dir);
            return Ok(());
        }
        info!("Found {} .ass files in {:?}", files.len(), input_dir);

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;

        for file in &files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            folder_pb.set_message(name);

            match self.process_file(file) {
                Ok(report) if report.is_clean() => success_count += 1,
                Ok(report) => {
                    warn!(
                        "{:?}: {} of {} buckets failed to write",
                        file,
                        report.failed.len(),
                        report.written.len() + report.failed.len()
                    );
                    error_count += 1;
                }
                Err(e) => {
                    error!("Failed to process {:?}: {}", file, e);
                    error_count += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message(format!(
            "{} processed, {} with errors",
            success_count, error_count
        ));
        Ok(())
    }
}
