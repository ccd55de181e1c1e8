//! Logging initialization for embedders of the station runtime.
//!
//! The embedding platform decides where logs go and how verbose they are;
//! a browser-extension host typically wants a file next to its profile data,
//! a development harness wants the terminal.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
pub enum LogDestination {
    /// Write to the configured log file.
    File,
    /// Write to terminal (stdout).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Embedder-supplied logging configuration.
pub struct LogConfig {
    pub destination: LogDestination,
    pub level: LevelFilter,
    /// Only consulted for `File` and `Both`.
    pub file_path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LevelFilter::Info,
            file_path: PathBuf::from("./station.log"),
        }
    }
}

/// Initialize the global logger from the embedder's configuration.
///
/// For `LogDestination::File` or `Both`, creates the configured log file,
/// truncating any previous run's output.
pub fn initialize(log_config: LogConfig) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match log_config.destination {
        LogDestination::File => {
            if let Some(file_logger) =
                create_file_logger(log_config.level, config, &log_config.file_path)
            {
                vec![file_logger]
            } else {
                return;
            }
        }
        LogDestination::Terminal => {
            vec![TermLogger::new(
                log_config.level,
                config,
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )]
        }
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                log_config.level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) =
                create_file_logger(log_config.level, config, &log_config.file_path)
            {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &PathBuf,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
