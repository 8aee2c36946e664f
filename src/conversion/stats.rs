//! Counters accumulated over one conversion run.

use serde::Serialize;
use tracing::info;

/// Outcome counters for a batch run.
///
/// `converted + errors <= total` always holds; the two sides are equal once
/// every candidate has been visited, and `converted + errors < total` after
/// an abort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Candidate files found in the source directory.
    pub total: usize,
    /// Files converted and verified on disk.
    pub converted: usize,
    /// Files that failed to convert.
    pub errors: usize,
    /// Failures since the last success.
    pub consecutive_errors: u32,
    /// Converted files whose date tags were copied.
    pub metadata_preserved: usize,
    /// Whether the run stopped on the consecutive-failure threshold.
    pub aborted: bool,
}

impl RunStatistics {
    /// Empty statistics for a run over `total` candidates.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Record a verified conversion; resets the failure streak.
    pub fn record_success(&mut self, metadata_preserved: bool) {
        self.converted += 1;
        self.consecutive_errors = 0;
        if metadata_preserved {
            self.metadata_preserved += 1;
        }
    }

    /// Record a failed conversion; extends the failure streak.
    pub fn record_failure(&mut self) {
        self.errors += 1;
        self.consecutive_errors += 1;
    }

    /// Whether the failure streak has reached `threshold`.
    pub fn streak_reached(&self, threshold: u32) -> bool {
        self.consecutive_errors >= threshold
    }

    /// Files visited so far.
    pub fn processed(&self) -> usize {
        self.converted + self.errors
    }

    /// Converted files as a percentage of candidates (0 when there are none).
    pub fn success_rate(&self) -> f64 {
        percentage(self.converted, self.total)
    }

    /// Metadata copies as a percentage of converted files (0 when none converted).
    pub fn metadata_rate(&self) -> f64 {
        percentage(self.metadata_preserved, self.converted)
    }

    /// `true` when no file failed. A run with no candidates is successful.
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Process exit status for this run: 0 on success, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Log the final statistics block.
    pub fn log_summary(&self) {
        info!("Run finished. Statistics:");
        info!("  - Total files: {}", self.total);
        info!(
            "  - Converted: {} ({:.1}%)",
            self.converted,
            self.success_rate()
        );
        info!(
            "  - With metadata preserved: {} ({:.1}%)",
            self.metadata_preserved,
            self.metadata_rate()
        );
        info!("  - Errors: {}", self.errors);
        if self.aborted {
            info!(
                "  - Not attempted: {}",
                self.total.saturating_sub(self.processed())
            );
        }
        if self.is_success() {
            info!("Conversion completed successfully");
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
