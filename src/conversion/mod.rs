//! Batch image conversion.
//!
//! [`convert_folder`] runs the whole flow for one configuration: codec
//! setup, directory checks, the ExifTool probe, file discovery, the
//! conversion loop and the final summary. Setup failures are returned as
//! errors before any file is touched; per-file failures only show up in the
//! returned [`RunStatistics`].

mod pipeline;
mod stats;

pub use pipeline::{
    discover_jobs, prepare_directories, BatchConverter, ConversionJob, JobOutcome,
};
pub use stats::RunStatistics;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use photoforge_av::{ExifTool, ImageTranscoder, MetadataCopier, Transcoder};
use tracing::{info, warn};

use crate::config::{ConversionConfig, ToolsConfig};

/// Convert every candidate in `config.source_dir` using the `image` codec.
///
/// Setup runs in order: codec, directories, ExifTool probe. `make_progress`
/// builds the bar once the number of candidates is known.
pub fn convert_folder<F>(
    config: &ConversionConfig,
    tools: &ToolsConfig,
    make_progress: F,
) -> Result<RunStatistics>
where
    F: FnOnce(u64) -> ProgressBar,
{
    info!(
        "Starting {} -> {} conversion",
        config.from.to_string().to_uppercase(),
        config.to.to_string().to_uppercase()
    );

    let transcoder = ImageTranscoder::new(config.from, config.to, config.quality)
        .with_context(|| format!("Failed to initialize {} support", config.from))?;
    info!("{} support ready", config.from.to_string().to_uppercase());

    prepare_directories(&config.source_dir, &config.dest_dir)?;

    let exiftool = if config.preserve_metadata {
        detect_metadata_tool(tools)
    } else {
        info!("Metadata preservation disabled by configuration");
        None
    };

    convert_prepared(
        config,
        &transcoder,
        exiftool.as_ref().map(|tool| tool as &dyn MetadataCopier),
        make_progress,
    )
}

/// Resolve the metadata capability once for the whole run.
///
/// A missing tool is not an error: the run continues without copying dates.
pub fn detect_metadata_tool(tools: &ToolsConfig) -> Option<ExifTool> {
    match ExifTool::locate(tools.exiftool_path.as_deref()) {
        Ok(tool) => {
            info!(
                "ExifTool found: version {} ({:?})",
                tool.version().unwrap_or("unknown"),
                tool.program()
            );
            Some(tool)
        }
        Err(e) => {
            warn!("ExifTool unavailable ({}); metadata preservation is disabled", e);
            None
        }
    }
}

/// Directory checks, discovery, the conversion loop and the summary.
///
/// `make_progress` is only called when there is at least one candidate.
pub fn run_batch<F>(
    config: &ConversionConfig,
    transcoder: &dyn Transcoder,
    metadata: Option<&dyn MetadataCopier>,
    make_progress: F,
) -> Result<RunStatistics>
where
    F: FnOnce(u64) -> ProgressBar,
{
    prepare_directories(&config.source_dir, &config.dest_dir)?;
    convert_prepared(config, transcoder, metadata, make_progress)
}

fn convert_prepared<F>(
    config: &ConversionConfig,
    transcoder: &dyn Transcoder,
    metadata: Option<&dyn MetadataCopier>,
    make_progress: F,
) -> Result<RunStatistics>
where
    F: FnOnce(u64) -> ProgressBar,
{
    let jobs = discover_jobs(&config.source_dir, &config.dest_dir, config.from, config.to)?;
    if jobs.is_empty() {
        warn!(
            "No {} files found in {:?}",
            config.from.to_string().to_uppercase(),
            config.source_dir
        );
        return Ok(RunStatistics::new(0));
    }
    info!(
        "Found {} {} files to convert",
        jobs.len(),
        config.from.to_string().to_uppercase()
    );

    let progress = make_progress(jobs.len() as u64);
    let stats = BatchConverter::new(transcoder, config.max_consecutive_errors)
        .with_metadata(metadata)
        .run(&jobs, &progress);

    stats.log_summary();
    Ok(stats)
}
