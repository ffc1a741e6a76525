// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use streamlate::app_config::{Config, LogLevel};
use streamlate::errors::AppError;
use streamlate::providers::openai::OpenAI;
use streamlate::web::{server, AppState};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// streamlate - Real-time Streaming Translation Pipeline
///
/// Streams LLM-generated text and translates completed sentences
/// concurrently, delivering both over one SSE stream.
#[derive(Parser, Debug)]
#[command(name = "streamlate")]
#[command(version = "0.1.0")]
#[command(about = "Real-time streaming translation server")]
#[command(long_about = "streamlate serves POST /translate-stream: it streams text generated for a
prompt while concurrently translating each completed sentence into the
requested target language, emitting both over a single SSE stream.

EXAMPLES:
    streamlate                             # Serve with default config on port 8000
    streamlate -p 9000                     # Override the listening port
    streamlate --log-level debug           # Verbose pipeline logging
    curl -N -X POST http://localhost:8000/translate-stream \\
      -H 'Content-Type: application/json' \\
      -d '{\"prompt\": \"Tell me a story\", \"language\": \"Hindi\"}'

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one is created automatically. The API key is taken from the
    OPENAI_API_KEY environment variable (preferred) or the config file.")]
struct CommandLineOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // The level is updated after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    // Load or create configuration
    let mut config = if Path::new(&cli.config_path).exists() {
        Config::from_file(&cli.config_path).map_err(|e| AppError::Config(e.to_string()))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            cli.config_path
        );
        let config = Config::default();
        config
            .save_to_file(&cli.config_path)
            .map_err(|e| AppError::Config(e.to_string()))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(level_filter(&config.log_level));

    let api_key = config.resolved_api_key().ok_or_else(|| {
        anyhow!("No API key configured; set OPENAI_API_KEY or provider.api_key in the config file")
    })?;

    info!(
        "Starting streamlate: endpoint {}, generation model {}, translation model {}",
        config.provider.endpoint,
        config.provider.generation_model,
        config.provider.translation_model
    );

    let client = Arc::new(OpenAI::new(&config.provider, api_key));
    let state = AppState::new(config, client.clone(), client);

    server::start_server(state).await
}
