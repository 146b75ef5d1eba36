//! File logging for play sessions.
//!
//! The terminal belongs to the game screen, so log output only goes to a
//! file. Without `--log-file` no subscriber is installed at all.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use super::CliError;

/// Environment variable holding a full filter directive, overriding
/// `--log-level`.
pub(crate) const FILTER_ENV: &str = "WARPTAG_LOG";

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Session lifecycle.
    #[default]
    Info,
    /// Dropped keys, skipped frames.
    Debug,
    /// Every tick and frame.
    Trace,
}

impl LogLevel {
    const fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the global subscriber, appending to `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a subscriber is
/// already installed.
pub(crate) fn init(file: Option<&Path>, level: LogLevel) -> Result<(), CliError> {
    let Some(path) = file else {
        return Ok(());
    };
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CliError::new(format!("Failed to open log file {}: {e}", path.display())))?;

    let filter = match std::env::var(FILTER_ENV) {
        Ok(directive) => EnvFilter::new(directive),
        Err(_) => EnvFilter::default().add_directive(level.to_filter().into()),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(level >= LogLevel::Debug)
        .with_thread_names(level >= LogLevel::Trace)
        .with_ansi(false)
        .with_writer(Mutex::new(log))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::new(format!("Failed to configure logging: {e}")))
}
