//! The batch conversion loop.
//!
//! Files are converted one at a time in name order. Every per-file failure
//! is caught here, logged and folded into [`RunStatistics`]; only a streak
//! of `max_consecutive_errors` failures ends the loop early.
//!
//! Input extensions have aliases (`.heic`/`.heif`, `.jpg`/`.jpeg`), so two
//! sources can map to the same output name. Only the first one converted
//! writes it; later ones are recorded as failures.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use photoforge_av::{MetadataCopier, Transcoder};
use photoforge_common::paths::{has_format_extension, output_path_for};
use photoforge_common::ImageFormat;
use tracing::{debug, error, info, warn};

use super::stats::RunStatistics;

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Zero-based position in the batch.
    pub index: usize,
    /// Source image.
    pub source: PathBuf,
    /// Output path under the destination directory.
    pub output: PathBuf,
}

impl ConversionJob {
    /// Display name of the source file.
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }

    /// Display name of the output file.
    pub fn output_name(&self) -> String {
        display_name(&self.output)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Result of a single job.
#[derive(Debug)]
pub enum JobOutcome {
    /// The output exists and is non-empty.
    Converted {
        elapsed: Duration,
        /// `None` when metadata propagation is unavailable.
        metadata: Option<photoforge_av::Result<()>>,
    },
    /// Transcoding failed or left no usable output.
    Failed(photoforge_av::Error),
}

/// Verify the source directory exists and create the destination directory.
pub fn prepare_directories(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    if !source_dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {:?}", source_dir);
    }

    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dest_dir))?;
    info!("Output directory {:?} ready", dest_dir);

    Ok(())
}

/// List the regular files in `source_dir` with an extension of `from`.
///
/// Jobs are sorted by file name so runs are reproducible.
pub fn discover_jobs(
    source_dir: &Path,
    dest_dir: &Path,
    from: ImageFormat,
    to: ImageFormat,
) -> Result<Vec<ConversionJob>> {
    let entries = std::fs::read_dir(source_dir)
        .with_context(|| format!("Failed to read input directory: {:?}", source_dir))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read input directory: {:?}", source_dir))?;
        let path = entry.path();
        if path.is_file() && has_format_extension(&path, from) {
            sources.push(path);
        }
    }
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(sources
        .into_iter()
        .enumerate()
        .map(|(index, source)| {
            let output = output_path_for(&source, dest_dir, to);
            ConversionJob {
                index,
                source,
                output,
            }
        })
        .collect())
}

/// Runs a list of jobs through a [`Transcoder`] with optional metadata copying.
pub struct BatchConverter<'a> {
    transcoder: &'a dyn Transcoder,
    metadata: Option<&'a dyn MetadataCopier>,
    max_consecutive_errors: u32,
}

impl<'a> BatchConverter<'a> {
    /// Create a converter that stops after `max_consecutive_errors` failures in a row.
    pub fn new(transcoder: &'a dyn Transcoder, max_consecutive_errors: u32) -> Self {
        Self {
            transcoder,
            metadata: None,
            max_consecutive_errors: max_consecutive_errors.max(1),
        }
    }

    /// Enable metadata propagation. `None` leaves it disabled.
    pub fn with_metadata(mut self, metadata: Option<&'a dyn MetadataCopier>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Convert `jobs` in order and return the accumulated statistics.
    pub fn run(&self, jobs: &[ConversionJob], progress: &ProgressBar) -> RunStatistics {
        let mut stats = RunStatistics::new(jobs.len());
        let mut written: HashSet<&Path> = HashSet::new();

        for job in jobs {
            info!("Processing: {}", job.source_name());

            let outcome = if written.contains(job.output.as_path()) {
                JobOutcome::Failed(photoforge_av::Error::DuplicateOutput {
                    path: job.output.clone(),
                })
            } else {
                self.process(job)
            };
            if matches!(outcome, JobOutcome::Converted { .. }) {
                written.insert(job.output.as_path());
            }
            self.record(job, outcome, &mut stats);
            progress.inc(1);

            if stats.streak_reached(self.max_consecutive_errors) {
                error!(
                    "Stopping after {} consecutive errors",
                    stats.consecutive_errors
                );
                stats.aborted = true;
                break;
            }
        }

        if stats.aborted {
            progress.abandon_with_message("Aborted");
        } else {
            progress.finish_with_message("Done");
        }

        stats
    }

    /// Convert a single job.
    pub fn process(&self, job: &ConversionJob) -> JobOutcome {
        let start = Instant::now();

        if let Err(e) = self.transcoder.transcode(&job.source, &job.output) {
            return JobOutcome::Failed(e);
        }

        match std::fs::metadata(&job.output) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {}
            _ => {
                return JobOutcome::Failed(photoforge_av::Error::EmptyOutput {
                    path: job.output.clone(),
                })
            }
        }

        let elapsed = start.elapsed();
        let metadata = self
            .metadata
            .map(|copier| copier.copy_dates(&job.source, &job.output));

        JobOutcome::Converted { elapsed, metadata }
    }

    fn record(&self, job: &ConversionJob, outcome: JobOutcome, stats: &mut RunStatistics) {
        match outcome {
            JobOutcome::Converted { elapsed, metadata } => {
                let preserved = match metadata {
                    Some(Ok(())) => {
                        info!("Date metadata preserved for: {}", job.source_name());
                        true
                    }
                    Some(Err(e @ photoforge_av::Error::ToolSpawn { .. })) => {
                        error!(
                            "Could not run metadata tool for {}: {}",
                            job.source_name(),
                            e
                        );
                        false
                    }
                    Some(Err(e)) => {
                        warn!(
                            "Could not preserve metadata for {}: {}",
                            job.source_name(),
                            e
                        );
                        false
                    }
                    None => false,
                };
                stats.record_success(preserved);
                info!(
                    "OK: {} -> {} ({:.2}s)",
                    job.source_name(),
                    job.output_name(),
                    elapsed.as_secs_f64()
                );
            }
            JobOutcome::Failed(e) => {
                stats.record_failure();
                match e {
                    photoforge_av::Error::EmptyOutput { ref path } => {
                        error!("ERROR: {:?} was not written correctly", path);
                    }
                    photoforge_av::Error::DuplicateOutput { ref path } => {
                        error!(
                            "ERROR: {} would overwrite {:?}, already converted from another file",
                            job.source_name(),
                            path
                        );
                    }
                    ref e => {
                        error!("ERROR converting {}: {}", job.source_name(), e);
                    }
                }
                log_source_details(&job.source);
            }
        }
        debug!(
            "Progress: {}/{} visited, streak {}",
            stats.processed(),
            stats.total,
            stats.consecutive_errors
        );
    }
}

fn log_source_details(source: &Path) {
    match std::fs::metadata(source) {
        Ok(meta) => error!("Problem file details: size={} bytes", meta.len()),
        Err(e) => error!("Could not read file information: {}", e),
    }
}
