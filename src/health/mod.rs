//! Host health checks: free disk space and CPU load.

mod cpu;
mod disk;

pub use cpu::{cpu_percent, utilisation, CpuTimes};
pub use disk::{disk_usage, DiskUsage};

use std::time::Duration;

use tracing::{error, info};

use crate::config::HealthConfig;

/// Result of one health run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub disk_ok: bool,
    pub cpu_ok: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.disk_ok && self.cpu_ok
    }
}

/// `true` if more than `min_free_percent` of the filesystem is free.
pub fn check_disk_usage(config: &HealthConfig) -> bool {
    match disk_usage(&config.disk_path) {
        Ok(usage) => {
            let free = usage.free_percent();
            info!("Free disk space on {:?}: {:.1}%", config.disk_path, free);
            free > config.min_free_disk_percent
        }
        Err(e) => {
            error!("Disk check failed: {:#}", e);
            false
        }
    }
}

/// `true` if CPU utilisation over the sampling window is below the threshold.
pub fn check_cpu_usage(config: &HealthConfig) -> bool {
    match cpu_percent(Duration::from_millis(config.cpu_sample_ms)) {
        Ok(usage) => {
            info!(
                "CPU usage over {}ms: {:.1}%",
                config.cpu_sample_ms, usage
            );
            usage < config.max_cpu_percent
        }
        Err(e) => {
            error!("CPU check failed: {:#}", e);
            false
        }
    }
}

/// Run both checks.
pub fn run(config: &HealthConfig) -> HealthReport {
    HealthReport {
        cpu_ok: check_cpu_usage(config),
        disk_ok: check_disk_usage(config),
    }
}
