mod cli;

use photoforge::progress::{self, ConsoleWriter};
use photoforge::{config, conversion, health, logging, network};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            preset,
            from,
            to,
            source,
            dest,
            quality,
            max_errors,
            no_metadata,
            no_progress,
            no_log_file,
            json,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;

            // Preset first, then individual flags on top
            if let Some(preset) = preset {
                preset.apply(&mut config.conversion);
            }
            let conversion = &mut config.conversion;
            if let Some(from) = from {
                conversion.from = from;
            }
            if let Some(to) = to {
                conversion.to = to;
            }
            if let Some(source) = source {
                conversion.source_dir = source;
            }
            if let Some(dest) = dest {
                conversion.dest_dir = dest;
            }
            if let Some(quality) = quality {
                conversion.quality = quality;
            }
            if let Some(max_errors) = max_errors {
                conversion.max_consecutive_errors = max_errors;
            }
            if no_metadata {
                conversion.preserve_metadata = false;
            }
            if no_log_file {
                config.logging.to_file = false;
            }
            config::validate_conversion(&config.conversion)?;

            let guard = logging::init(cli.verbose, &config.logging)?;
            convert(&config, &guard.console(), !no_progress, json)
        }
        Commands::Health => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let _guard = init_console_logging(cli.verbose)?;
            run_health(&config)
        }
        Commands::Netcheck => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let _guard = init_console_logging(cli.verbose)?;
            run_netcheck(&config)
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("photoforge {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_console_logging(verbose: bool) -> Result<logging::LogGuard> {
    let console_only = config::LoggingConfig {
        to_file: false,
        ..Default::default()
    };
    logging::init(verbose, &console_only)
}

fn convert(
    config: &config::Config,
    console: &ConsoleWriter,
    show_progress: bool,
    json: bool,
) -> Result<ExitCode> {
    let result = conversion::convert_folder(&config.conversion, &config.tools, |total| {
        let bar = progress::conversion_bar(total, show_progress);
        console.attach(&bar);
        bar
    });
    console.detach();

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("{:#}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(ExitCode::from(stats.exit_status()))
}

fn run_health(config: &config::Config) -> Result<ExitCode> {
    let report = health::run(&config.health);

    if report.is_healthy() {
        println!("Everything is ok");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("ERROR!");
        Ok(ExitCode::FAILURE)
    }
}

fn run_netcheck(config: &config::Config) -> Result<ExitCode> {
    let report = network::run(&config.network);

    if report.is_healthy() {
        println!("Everything ok");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Network checks failed");
        Ok(ExitCode::FAILURE)
    }
}

fn check_tools() -> Result<ExitCode> {
    println!("Checking external tools...\n");

    let tools = photoforge_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    for format in photoforge_common::ImageFormat::all() {
        let decode = if photoforge_av::supports_decoding(*format) {
            "✓"
        } else {
            "✗"
        };
        let encode = if photoforge_av::supports_encoding(*format) {
            "✓"
        } else {
            "✗"
        };
        println!("{:<5} decode {}  encode {}", format.to_string(), decode, encode);
    }

    Ok(ExitCode::SUCCESS)
}

fn validate_config(path: Option<&std::path::Path>) -> Result<ExitCode> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let conversion = &config.conversion;
    println!(
        "  Conversion: {} -> {} ({:?} -> {:?})",
        conversion.from, conversion.to, conversion.source_dir, conversion.dest_dir
    );
    println!("  Quality: {}", conversion.quality);
    println!(
        "  Max consecutive errors: {}",
        conversion.max_consecutive_errors
    );
    println!("  Preserve metadata: {}", conversion.preserve_metadata);
    if config.logging.to_file {
        println!("  Log file: {:?}", config.logging.file);
    }

    Ok(ExitCode::SUCCESS)
}
