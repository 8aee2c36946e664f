use clap::{Parser, Subcommand};
use photoforge::config::Preset;
use photoforge_common::ImageFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photoforge")]
#[command(author, version, about = "Batch photo conversion and host health checks")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every image in a folder to another format
    Convert {
        /// Built-in folder and format setup
        #[arg(long, value_parser = parse_preset)]
        preset: Option<Preset>,

        /// Input format (heic, jpeg, png, webp)
        #[arg(long)]
        from: Option<ImageFormat>,

        /// Output format (jpeg, png, webp)
        #[arg(long)]
        to: Option<ImageFormat>,

        /// Folder holding the source images
        #[arg(long)]
        source: Option<PathBuf>,

        /// Folder receiving the converted images
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Encoder quality (1-100)
        #[arg(short, long)]
        quality: Option<u8>,

        /// Stop after this many consecutive failures
        #[arg(long)]
        max_errors: Option<u32>,

        /// Do not copy date metadata with ExifTool
        #[arg(long)]
        no_metadata: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Do not write the log file
        #[arg(long)]
        no_log_file: bool,

        /// Print the final statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that free disk space and CPU load are within limits
    Health,

    /// Check loopback resolution and outbound HTTP connectivity
    Netcheck,

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    match s {
        "heic-to-jpeg" => Ok(Preset::HeicToJpeg),
        "png-to-webp" => Ok(Preset::PngToWebp),
        other => Err(format!(
            "unknown preset '{other}' (expected heic-to-jpeg or png-to-webp)"
        )),
    }
}
