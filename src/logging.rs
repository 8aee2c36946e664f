//! Logging setup for the binary.
//!
//! Log lines go to stdout and, unless disabled, are appended to a log file.
//! Both sinks get timestamped, levelled lines. Stdout lines are written
//! through a [`ConsoleWriter`] so an active progress bar stays intact. Library code only emits
//! `tracing` events; the subscriber is installed here, by `main`, so tests
//! can scope their own subscriber instead.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::progress::ConsoleWriter;

/// Keeps the file writer alive; dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    console: ConsoleWriter,
    _file: Option<WorkerGuard>,
}

impl LogGuard {
    /// Handle for attaching a progress bar to the console log layer.
    pub fn console(&self) -> ConsoleWriter {
        self.console.clone()
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        "photoforge=debug,photoforge_av=debug".to_string()
    } else {
        "photoforge=info,photoforge_av=info".to_string()
    }
}

/// Install the global subscriber.
///
/// Respects `RUST_LOG` if set, otherwise uses [`default_filter`].
pub fn init(verbose: bool, logging: &LoggingConfig) -> Result<LogGuard> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(verbose));
    let filter = EnvFilter::try_new(&env_filter)
        .with_context(|| format!("Invalid log filter: {env_filter}"))?;

    let console = ConsoleWriter::default();
    let stdout_layer = fmt::layer()
        .with_writer(console.clone())
        .with_target(false);

    let (file_layer, guard) = if logging.to_file {
        let appender = file_appender(&logging.file)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(LogGuard {
        console,
        _file: guard,
    })
}

/// Appending, never-rotating writer for `path`.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {:?}", path))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Failed to open log file: {:?}", path))
}
