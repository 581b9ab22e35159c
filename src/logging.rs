//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format and
//! destination come from [`LoggingConfig`], with `TREECLONE_LOG`,
//! `TREECLONE_LOG_FORMAT` and `TREECLONE_LOG_OUTPUT` taking precedence.
//! Logs go to stderr by default so stdout stays clean for command output.

use crate::error::ReplicaError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Turn logging off entirely
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes "file"
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format on a terminal only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
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
        parse_format(&self.format)?;
        parse_output_destinations(&self.output)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<LogFormat, String> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        )),
    }
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
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
    Ok(OutputDestinations { stdout, stderr, file })
}

/// Where file logs go when nothing names a path: the platform data
/// directory, falling back to the working directory.
pub fn default_log_file() -> PathBuf {
    ProjectDirs::from("", "", "treeclone")
        .map(|dirs| dirs.data_local_dir().join("treeclone.log"))
        .unwrap_or_else(|| PathBuf::from("treeclone.log"))
}

/// CLI path, then configured path, then [`default_log_file`].
pub fn resolve_log_file_path(cli_file: Option<PathBuf>, config_file: Option<PathBuf>) -> PathBuf {
    cli_file.or(config_file).unwrap_or_else(default_log_file)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn layer_for<W>(format: LogFormat, ansi: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (TREECLONE_LOG, TREECLONE_LOG_FORMAT, TREECLONE_LOG_OUTPUT)
/// 2. CLI flags, already folded into `config` by the binary
/// 3. Configuration files
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ReplicaError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;

    let format = match std::env::var("TREECLONE_LOG_FORMAT") {
        Ok(format) => parse_format(&format),
        Err(_) => parse_format(&config.format),
    }
    .map_err(ReplicaError::Config)?;

    let output = match std::env::var("TREECLONE_LOG_OUTPUT") {
        Ok(output) => parse_output_destinations(&output),
        Err(_) => parse_output_destinations(&config.output),
    }
    .map_err(ReplicaError::Config)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if output.stdout {
        layers.push(layer_for(format, config.color, std::io::stdout));
    }
    if output.stderr {
        layers.push(layer_for(format, config.color, std::io::stderr));
    }
    if output.file {
        let log_file = resolve_log_file_path(None, config.file.clone());
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReplicaError::Config(format!("Failed to create log directory: {}", e))
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| {
                ReplicaError::Config(format!("Failed to open log file {:?}: {}", log_file, e))
            })?;
        layers.push(layer_for(format, false, Arc::new(file)));
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ReplicaError::Config(format!("Failed to install logger: {}", e)))
}

/// Build the env filter from TREECLONE_LOG or the config
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ReplicaError> {
    if let Ok(filter) = EnvFilter::try_from_env("TREECLONE_LOG") {
        return Ok(filter);
    }
    filter_from_config(config)
}

fn filter_from_config(config: &LoggingConfig) -> Result<EnvFilter, ReplicaError> {
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ReplicaError::Config(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}
