use photoforge_common::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Settings for one batch conversion run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Directory holding the source images
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory receiving the converted images (created if missing)
    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,

    /// Format of the input files
    #[serde(default = "default_from")]
    pub from: ImageFormat,

    /// Format to convert to
    #[serde(default = "default_to")]
    pub to: ImageFormat,

    /// Encoder quality (1-100)
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Abort the run after this many failures in a row
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,

    /// Copy date tags from each source onto its output with ExifTool
    #[serde(default = "default_true")]
    pub preserve_metadata: bool,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("Diciembre")
}
fn default_dest_dir() -> PathBuf {
    PathBuf::from("122024Diciembre")
}
fn default_from() -> ImageFormat {
    ImageFormat::Heic
}
fn default_to() -> ImageFormat {
    ImageFormat::Jpeg
}
fn default_quality() -> u8 {
    photoforge_av::codec::DEFAULT_QUALITY
}
fn default_max_consecutive_errors() -> u32 {
    3
}
fn default_true() -> bool {
    true
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            dest_dir: default_dest_dir(),
            from: default_from(),
            to: default_to(),
            quality: default_quality(),
            max_consecutive_errors: default_max_consecutive_errors(),
            preserve_metadata: default_true(),
        }
    }
}

/// Built-in conversion setups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Phone photos: `Diciembre/*.heic` -> `122024Diciembre/*.jpg`
    HeicToJpeg,
    /// Avatars: `./avatars/*.png` -> `./avatars_webp/*.webp`
    PngToWebp,
}

impl Preset {
    /// Apply this preset's formats and folders to `config`.
    ///
    /// Quality, threshold and the metadata flag are left as configured.
    pub fn apply(&self, config: &mut ConversionConfig) {
        match self {
            Self::HeicToJpeg => {
                config.from = ImageFormat::Heic;
                config.to = ImageFormat::Jpeg;
                config.source_dir = default_source_dir();
                config.dest_dir = default_dest_dir();
            }
            Self::PngToWebp => {
                config.from = ImageFormat::Png;
                config.to = ImageFormat::Webp;
                config.source_dir = PathBuf::from("./avatars");
                config.dest_dir = PathBuf::from("./avatars_webp");
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit ExifTool location; `PATH` is searched when unset or missing
    #[serde(default)]
    pub exiftool_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Also append log lines to `file`
    #[serde(default = "default_true")]
    pub to_file: bool,

    /// Log file, relative to the working directory
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("conversion_heic.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            to_file: default_true(),
            file: default_log_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    /// Filesystem whose free space is checked
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,

    /// Minimum free disk space, in percent of the filesystem size
    #[serde(default = "default_min_free_disk_percent")]
    pub min_free_disk_percent: f64,

    /// Maximum acceptable CPU utilisation, in percent
    #[serde(default = "default_max_cpu_percent")]
    pub max_cpu_percent: f64,

    /// Length of the CPU sampling window in milliseconds
    #[serde(default = "default_cpu_sample_ms")]
    pub cpu_sample_ms: u64,
}

fn default_disk_path() -> PathBuf {
    PathBuf::from("/")
}
fn default_min_free_disk_percent() -> f64 {
    20.0
}
fn default_max_cpu_percent() -> f64 {
    75.0
}
fn default_cpu_sample_ms() -> u64 {
    500
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            disk_path: default_disk_path(),
            min_free_disk_percent: default_min_free_disk_percent(),
            max_cpu_percent: default_max_cpu_percent(),
            cpu_sample_ms: default_cpu_sample_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// URL fetched by the connectivity check; must answer 200
    #[serde(default = "default_connectivity_url")]
    pub connectivity_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_connectivity_url() -> String {
    "http://www.google.com".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connectivity_url: default_connectivity_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
