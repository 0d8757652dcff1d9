//! modowners CLI Binary
//!
//! Command-line interface for the module ownership registry.

use clap::Parser;
use modowners::cli::{Cli, RunContext};
use modowners::config::ConfigLoader;
use modowners::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and settings file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("modowners starting");

    let context = match RunContext::new(cli.registry.clone(), cli.settings.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing: {}", e);
            eprintln!("{}", modowners::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if !outcome.success {
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", modowners::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args, environment, and settings file.
/// Precedence: CLI flags override settings file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.settings {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(None),
    };
    let mut config = loaded.ok().map(|s| s.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        // Keep verbose output visible in the terminal; an explicit --log-output still wins.
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    let output_uses_file = config.output == "file" || config.output == "file+stderr";
    if config.enabled && output_uses_file {
        config.file = Some(modowners::logging::resolve_log_file_path(Some(&config)));
    }

    config
}
