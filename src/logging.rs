//! Structured logging with `tracing`.
//!
//! The terminal belongs to the TUI, so log lines go to a file under the state
//! directory. `RUST_LOG` overrides the configured level.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogSettings, default_state_dir};

const LOG_FILE_NAME: &str = "encore.log";

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("no log directory: set logging.directory or $HOME")]
    NoDirectory,

    #[error("failed to create log directory {path:?}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Install the global subscriber.
///
/// Returns `None` when logging is disabled. Otherwise keep the guard alive for
/// the whole run; dropping it flushes pending lines.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    if !settings.enabled {
        return Ok(None);
    }

    let dir = log_directory(settings)?;
    std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDirectory {
        path: dir.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(&settings.level))
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    tracing::info!(path = %dir.join(LOG_FILE_NAME).display(), "logging started");
    Ok(Some(guard))
}

pub fn log_directory(settings: &LogSettings) -> Result<PathBuf, LoggingError> {
    match &settings.directory {
        Some(dir) => Ok(dir.clone()),
        None => default_state_dir().ok_or(LoggingError::NoDirectory),
    }
}

/// `RUST_LOG` first, then the configured level, then plain "info".
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
