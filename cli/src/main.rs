//! facecap entry point.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use std::process::ExitCode;

use cli::{Cli, Command};
use config::{ConfigOrigin, FacecapConfig};
use error::Result;
use logging::{LogLevel, Logger};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, origin) = match FacecapConfig::resolve(cli.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let logger = match initialize_logger(&config) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            return ExitCode::FAILURE;
        }
    };

    logger.info(&format!("Configuration loaded from {}", origin));
    if origin == ConfigOrigin::Defaults {
        logger.debug("No configuration file found, using defaults");
    }

    match run(cli.command, &config, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&format!("Command failed: {}", e));
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the main logger from configuration
fn initialize_logger(config: &FacecapConfig) -> Result<Logger> {
    let log_level: LogLevel = config.logging.log_level.parse().unwrap_or_default();
    let log_path = config.logging.log_file_path.clone().into();
    let logger = Logger::with_component(log_path, log_level, "Main", config.logging.enable_console)?;
    Ok(logger)
}

fn run(command: Command, config: &FacecapConfig, logger: &Logger) -> Result<()> {
    match command {
        Command::List { save_previews } => {
            let dir = save_previews.or_else(|| config.capture.preview_dir.clone());
            commands::list::run(dir.as_deref(), logger)
        }
        Command::Play(args) => commands::play::run(&args, &config.capture, logger),
    }
}
