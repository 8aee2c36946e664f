//! Free disk space probe.

use std::path::Path;

use anyhow::{Context, Result};

/// Space figures for one filesystem, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub free: u64,
}

impl DiskUsage {
    /// Free space as a percentage of the filesystem size.
    pub fn free_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.free as f64 / self.total as f64 * 100.0
        }
    }
}

/// Query the filesystem holding `path`.
///
/// `free` counts the blocks available to unprivileged users.
#[cfg(unix)]
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    let stat = nix::sys::statvfs::statvfs(path)
        .with_context(|| format!("Failed to stat filesystem at {:?}", path))?;

    let fragment = stat.fragment_size() as u64;
    Ok(DiskUsage {
        total: stat.blocks() as u64 * fragment,
        free: stat.blocks_available() as u64 * fragment,
    })
}

#[cfg(not(unix))]
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    anyhow::bail!("Disk usage is not supported on this platform ({:?})", path)
}
