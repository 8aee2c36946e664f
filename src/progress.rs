//! Progress reporting for batch conversions.
//!
//! The bar is drawn on stdout next to the log lines, showing the current
//! position, the elapsed time and the per-file pace. Console log lines go
//! through [`ConsoleWriter`] so they are printed above the bar instead of
//! through it.

use std::io::{self, Write};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::RwLock;
use tracing_subscriber::fmt::MakeWriter;

const BAR_TEMPLATE: &str =
    "{msg} {pos}/{len} [{bar:40.green/dim}] {percent}% [{elapsed_precise} < {eta_precise}, {per_sec}]";

/// Create the progress bar for a run over `total` files.
///
/// Returns a hidden bar when `enabled` is false. indicatif also hides the bar
/// on its own when stdout is not a terminal.
pub fn conversion_bar(total: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stdout());
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    bar.set_style(style);
    bar.set_message("Converting files");
    bar
}

/// Stdout writer for the console log layer.
///
/// While a bar is attached every write runs inside [`ProgressBar::suspend`]:
/// the bar is cleared, the line printed, and the bar redrawn below it.
#[derive(Clone, Default)]
pub struct ConsoleWriter {
    bar: Arc<RwLock<Option<ProgressBar>>>,
}

impl ConsoleWriter {
    /// Print log lines above `bar` until [`detach`](Self::detach) is called.
    pub fn attach(&self, bar: &ProgressBar) {
        *self.bar.write() = Some(bar.clone());
    }

    pub fn detach(&self) {
        self.bar.write().take();
    }

    pub fn is_attached(&self) -> bool {
        self.bar.read().is_some()
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine {
            bar: self.bar.read().clone(),
        }
    }
}

/// One log event's worth of output, see [`ConsoleWriter`].
pub struct ConsoleLine {
    bar: Option<ProgressBar>,
}

impl Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_above(self.bar.as_ref(), &mut io::stdout().lock(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

fn write_above<W: Write>(bar: Option<&ProgressBar>, out: &mut W, buf: &[u8]) -> io::Result<usize> {
    match bar {
        Some(bar) => bar.suspend(|| {
            out.write_all(buf)?;
            out.flush()?;
            Ok(buf.len())
        }),
        None => out.write(buf),
    }
}
