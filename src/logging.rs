//! Logging System
//!
//! Structured logging built on `tracing`. Level, format and destination come from the
//! settings file, overridden by `MODOWNERS_LOG*` environment variables and CLI flags.
//! Logs go to stderr by default so query and export output on stdout stays clean.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to install no subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path; defaults to the per-user data directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_format(&self.format)?;
        parse_output_destinations(&self.output)?;
        Ok(())
    }
}

/// Default log file: `<data dir>/modowners/modowners.log`.
pub fn default_log_file() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_dir().join("modowners"))
        .unwrap_or_else(|| PathBuf::from(".modowners"))
        .join("modowners.log")
}

/// The configured log file, or the default location.
pub fn resolve_log_file_path(config: Option<&LoggingConfig>) -> PathBuf {
    config
        .and_then(|c| c.file.clone())
        .unwrap_or_else(default_log_file)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. CLI arguments (folded into the config by the binary)
/// 2. Environment variables (MODOWNERS_LOG, MODOWNERS_LOG_FORMAT, MODOWNERS_LOG_OUTPUT)
/// 3. Settings file
/// 4. Defaults
///
/// Calling this twice is harmless: the second subscriber is not installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    if !config.map(|c| c.enabled).unwrap_or(true) {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);
    let json = format == "json";

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if output.stdout {
        layers.push(terminal_layer(json, use_color, std::io::stdout));
    }
    if output.stderr {
        layers.push(terminal_layer(json, use_color, std::io::stderr));
    }
    if output.file {
        let writer = Mutex::new(open_log_file(config)?);
        let layer = fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_writer(writer);
        layers.push(if json { layer.json().boxed() } else { layer.boxed() });
    }

    // A subscriber may already be installed (tests, embedding); keep the existing one.
    let _ = Registry::default().with(layers).with(filter).try_init();
    Ok(())
}

fn terminal_layer<W>(json: bool, use_color: bool, writer: W) -> BoxedLayer
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.with_ansi(use_color).boxed()
    }
}

fn open_log_file(config: Option<&LoggingConfig>) -> Result<std::fs::File, ApiError> {
    let log_file = resolve_log_file_path(config);
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::ConfigError(format!("Failed to create log directory: {}", e)))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("MODOWNERS_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

fn check_format(format: &str) -> Result<(), String> {
    if format == "json" || format == "text" {
        Ok(())
    } else {
        Err(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))
    }
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, ApiError> {
    if let Ok(format) = std::env::var("MODOWNERS_LOG_FORMAT") {
        if check_format(&format).is_ok() {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    check_format(format).map_err(ApiError::ConfigError)?;
    Ok(format.to_string())
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, ApiError> {
    let output = std::env::var("MODOWNERS_LOG_OUTPUT")
        .ok()
        .unwrap_or_else(|| {
            config
                .map(|c| c.output.clone())
                .unwrap_or_else(default_output)
        });
    parse_output_destinations(&output).map_err(ApiError::ConfigError)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, String> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        _ => {
            return Err(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                output
            ))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
