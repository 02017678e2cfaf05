use std::fs;
use std::path::{Path, PathBuf};
use log::{error, info, debug};
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;
use crate::app_config::OutputFormat;
use crate::distribution::OutputBucket;
use crate::errors::OutputError;
use crate::subtitle_processor;

// @module: Output directory handling and per-bucket file writes

/// Name of the output subdirectory created next to the source file
pub const OUTPUT_DIR_NAME: &str = "Subtitles_by_Actor";

// @const: Characters invalid in file names on common platforms
static INVALID_NAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[<>:"/\\|?*]"#).unwrap()
});

/// Delete path-invalid characters from a display name and trim the result
pub fn sanitize_name(name: &str) -> String {
    INVALID_NAME_CHARS.replace_all(name, "").trim().to_string()
}

/// Outcome of a full save operation: which files were written and which
/// buckets failed. A failed bucket never aborts the remaining ones.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Paths written successfully, in write order
    pub written: Vec<PathBuf>,

    /// Per-bucket write failures
    pub failed: Vec<OutputError>,
}

impl WriteReport {
    /// True when every bucket was written
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Validate or create the output directory next to the source file.
///
/// A missing directory is created; an existing one is probed for write
/// permission with a temporary-file create-and-delete round trip. Either
/// failure aborts the whole save before any bucket is attempted.
pub fn prepare_output_dir(source_path: &Path) -> Result<PathBuf, OutputError> {
    let parent = source_path.parent().unwrap_or_else(|| Path::new("."));
    let output_dir = parent.join(OUTPUT_DIR_NAME);

    if !output_dir.exists() {
        fs::create_dir_all(&output_dir).map_err(|e| OutputError::DirectoryAccess {
            path: output_dir.clone(),
            reason: e.to_string(),
        })?;
        info!("Created output directory: {:?}", output_dir);
    } else {
        let probe = NamedTempFile::new_in(&output_dir).map_err(|e| OutputError::DirectoryAccess {
            path: output_dir.clone(),
            reason: e.to_string(),
        })?;
        drop(probe);
        debug!("Write access to {:?} confirmed", output_dir);
    }

    Ok(output_dir)
}

/// Compose the output filename for one bucket
fn bucket_file_name(stem: &str, bucket: &OutputBucket, extension: &str) -> String {
    format!(
        "{} - {} - ({}).{}",
        stem,
        sanitize_name(&bucket.name),
        bucket.events.len(),
        extension
    )
}

/// Write every output bucket next to the source file.
///
/// The directory check runs first and its failure aborts everything.
/// After that each bucket is serialized and written on its own: a failure
/// is logged, recorded in the report and the remaining buckets are still
/// attempted. Sign buckets are always written as ASS.
pub fn save_buckets(
    headers: &[String],
    styles: &[String],
    buckets: &[OutputBucket],
    source_path: &Path,
    format: OutputFormat,
) -> Result<WriteReport, OutputError> {
    let output_dir = prepare_output_dir(source_path)?;
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut report = WriteReport::default();

    for bucket in buckets {
        let bucket_format = if bucket.force_ass {
            OutputFormat::Ass
        } else {
            format
        };
        let path = output_dir.join(bucket_file_name(&stem, bucket, bucket_format.extension()));
        info!("Saving {:?} ({} lines)", path, bucket.events.len());

        let result = match bucket_format {
            OutputFormat::Ass => {
                subtitle_processor::write_ass_file(&path, headers, styles, &bucket.events)
            }
            OutputFormat::Srt => subtitle_processor::write_srt_file(&path, &bucket.events),
        };

        match result {
            Ok(()) => report.written.push(path),
            Err(source) => {
                let failure = OutputError::FileWrite { path, source };
                error!("{}", failure);
                report.failed.push(failure);
            }
        }
    }

    Ok(report)
}
