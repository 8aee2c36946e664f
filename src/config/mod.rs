mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./photoforge.toml",
        "~/.config/photoforge/config.toml",
        "/etc/photoforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_conversion(&config.conversion)?;

    let health = &config.health;
    if !(0.0..=100.0).contains(&health.min_free_disk_percent) {
        anyhow::bail!(
            "health.min_free_disk_percent must be between 0 and 100, got {}",
            health.min_free_disk_percent
        );
    }
    if !(0.0..=100.0).contains(&health.max_cpu_percent) {
        anyhow::bail!(
            "health.max_cpu_percent must be between 0 and 100, got {}",
            health.max_cpu_percent
        );
    }
    if health.cpu_sample_ms == 0 {
        anyhow::bail!("health.cpu_sample_ms cannot be 0");
    }

    if config.network.connectivity_url.trim().is_empty() {
        anyhow::bail!("network.connectivity_url cannot be empty");
    }
    if config.network.timeout_secs == 0 {
        anyhow::bail!("network.timeout_secs cannot be 0");
    }

    if let Some(ref path) = config.tools.exiftool_path {
        if !path.exists() {
            tracing::warn!(
                "Configured exiftool path does not exist, PATH will be searched: {:?}",
                path
            );
        }
    }

    Ok(())
}

/// Validate the conversion section; also run after CLI overrides are applied.
pub fn validate_conversion(conversion: &ConversionConfig) -> Result<()> {
    if !(1..=100).contains(&conversion.quality) {
        anyhow::bail!(
            "conversion.quality must be between 1 and 100, got {}",
            conversion.quality
        );
    }
    if conversion.max_consecutive_errors == 0 {
        anyhow::bail!("conversion.max_consecutive_errors must be at least 1");
    }
    if conversion.from == conversion.to {
        anyhow::bail!(
            "conversion.from and conversion.to are both '{}'",
            conversion.from
        );
    }
    if conversion.source_dir == conversion.dest_dir {
        anyhow::bail!(
            "conversion.source_dir and conversion.dest_dir are the same: {:?}",
            conversion.source_dir
        );
    }

    Ok(())
}
