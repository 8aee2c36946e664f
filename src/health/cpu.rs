//! CPU utilisation probe, sampled from `/proc/stat`.

use std::time::Duration;

use anyhow::{Context, Result};

/// Aggregate CPU time counters from the `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTimes {
    pub idle: u64,
    pub total: u64,
}

impl CpuTimes {
    /// Parse the aggregate `cpu ` line of a `/proc/stat` dump.
    ///
    /// Idle time is `idle + iowait`.
    pub fn parse(stat: &str) -> Result<Self> {
        let line = stat
            .lines()
            .find(|l| l.starts_with("cpu "))
            .context("No aggregate cpu line in /proc/stat")?;

        let fields = line
            .split_whitespace()
            .skip(1)
            .map(|f| f.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Malformed cpu line: {line}"))?;

        if fields.len() < 4 {
            anyhow::bail!("Malformed cpu line: {line}");
        }

        let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
        // guest time is already counted in user/nice
        let total = fields.iter().take(8).sum();
        Ok(Self { idle, total })
    }
}

/// Busy percentage between two samples. 0 when no time elapsed.
pub fn utilisation(before: CpuTimes, after: CpuTimes) -> f64 {
    let total = after.total.saturating_sub(before.total);
    let idle = after.idle.saturating_sub(before.idle);
    if total == 0 {
        0.0
    } else {
        (total.saturating_sub(idle)) as f64 / total as f64 * 100.0
    }
}

/// Sample CPU utilisation over `interval`.
#[cfg(target_os = "linux")]
pub fn cpu_percent(interval: Duration) -> Result<f64> {
    let read = || -> Result<CpuTimes> {
        let stat = std::fs::read_to_string("/proc/stat").context("Failed to read /proc/stat")?;
        CpuTimes::parse(&stat)
    };

    let before = read()?;
    std::thread::sleep(interval);
    let after = read()?;
    Ok(utilisation(before, after))
}

#[cfg(not(target_os = "linux"))]
pub fn cpu_percent(_interval: Duration) -> Result<f64> {
    anyhow::bail!("CPU sampling is only supported on Linux")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "cpu  100 0 50 800 50 0 0 0 0 0\n\
                        cpu0 50 0 25 400 25 0 0 0 0 0\n\
                        intr 12345\n";

    #[test]
    fn test_parse_aggregate_line() {
        let times = CpuTimes::parse(STAT).unwrap();
        assert_eq!(times.idle, 850);
        assert_eq!(times.total, 1000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CpuTimes::parse("intr 1\n").is_err());
        assert!(CpuTimes::parse("cpu  1 2 x 4\n").is_err());
        assert!(CpuTimes::parse("cpu  1 2\n").is_err());
    }

    #[test]
    fn test_utilisation() {
        let before = CpuTimes {
            idle: 850,
            total: 1000,
        };
        let after = CpuTimes {
            idle: 900,
            total: 1200,
        };
        assert_eq!(utilisation(before, after), 75.0);
        assert_eq!(utilisation(after, after), 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_cpu_percent_in_range() {
        let pct = cpu_percent(Duration::from_millis(50)).unwrap();
        assert!((0.0..=100.0).contains(&pct));
    }
}
